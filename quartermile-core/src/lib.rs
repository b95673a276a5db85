//! Crate containing models for time-stepped simulation of a vehicle's standing
//! quarter-mile acceleration run
//! # Features:
//! - logging: emit `log` records from the integrator (default)
//! - resources: compile the bundled car database into the crate (default)

#[macro_use]
pub mod macros;

pub mod error;
pub mod garage;
pub mod imports;
pub mod params;
pub mod prelude;
pub mod report;
#[cfg(feature = "resources")]
pub mod resources;
pub mod simdrive;
pub mod telemetry;
pub mod torque;
pub mod traits;
pub mod units;
pub mod utils;
pub mod vehicle;
