//! Fixed read-only queries
//!
//! Each repository borrows one checked-out connection and runs a single
//! statement. Table names are unqualified and resolve through the
//! session search path.

pub mod hydro;
pub mod measurements;

pub use hydro::{HydroRepo, HYDRO_COLUMNS};
pub use measurements::{MeasurementRepo, MEASUREMENT_COLUMNS};
