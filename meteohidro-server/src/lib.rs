//! meteohidro-server: read-only HTTP API over the readings database
//!
//! Serves the latest meteorological and hydrological station readings
//! as JSON. Every request borrows one connection from a bounded
//! [`PoolManager`], runs a single fixed statement and gives it back.

pub mod config;
pub mod db;
pub mod http;
pub mod models;

pub use config::{ConfigError, DbConfig, SearchPath};
pub use db::{PoolError, PoolManager};
pub use http::{run_server, ServerConfig};
