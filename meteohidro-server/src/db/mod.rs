//! Database layer - connection pool, row mapping and fixed queries
//!
//! # Design Principles
//!
//! - One bounded pool per process, injected through router state
//! - Search path applied on every checkout, nothing else is reset
//! - One statement per request, no transactions
//! - No retries: errors propagate to the handler

pub mod error;
pub mod pool;
pub mod probe;
pub mod repos;
pub mod row;

pub use error::DbError;
pub use pool::{Checkout, InitMode, PoolError, PoolManager, PoolStats};
pub use repos::*;
