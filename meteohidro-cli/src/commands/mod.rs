//! Command implementations for the meteohidro CLI

pub mod check;
pub mod db_args;
pub mod serve;

pub use check::run_check;
pub use serve::run_serve;
