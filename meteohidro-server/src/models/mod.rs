//! Request-level value types, validated at construction
//!
//! Invalid input returns ValidationError, not panic.

pub mod limit;
pub mod params;
pub mod station;
pub mod validation;

pub use limit::ReadingLimit;
pub use params::LatestParams;
pub use station::StationCode;
pub use validation::ValidationError;
