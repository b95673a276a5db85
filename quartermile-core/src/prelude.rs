//! Convenience module for exposing commonly used structs

pub use crate::error::SimError;
pub use crate::garage::Garage;
pub use crate::params::{SimParams, TopGearLimit};
pub use crate::simdrive::{run, run_many, QuarterMileSim};
pub use crate::telemetry::{SimulationResult, TelemetrySample, TelemetrySampleHistoryVec};
pub use crate::torque::{torque_at, TorqueModel};
pub use crate::traits::{ApproxEq, Format, SerdeAPI};
pub use crate::utils::interp::{Extrapolate, Strategy};
pub use crate::vehicle::VehicleSpec;
