//! Errors raised by a single simulation run

use thiserror::Error;

/// Reasons a quarter-mile run can fail. A failed run never yields a partial
/// [`SimulationResult`](crate::telemetry::SimulationResult).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Vehicle parameters violate an invariant, detected before integration starts
    #[error("invalid vehicle spec: {0}")]
    InvalidSpec(String),

    /// Torque lookup requested outside the sampled rpm range of the torque curve
    #[error(
        "engine speed {rpm:.1} rpm is outside the torque curve domain [{min_rpm:.1}, {max_rpm:.1}] rpm"
    )]
    InterpolationDomain {
        rpm: f64,
        min_rpm: f64,
        max_rpm: f64,
    },

    /// Target distance not reached within the step budget
    #[error(
        "did not finish: {reason} after {steps} steps ({elapsed_s:.2} s) at {distance_m:.3} of {target_m:.3} m"
    )]
    NonConvergence {
        reason: &'static str,
        steps: usize,
        elapsed_s: f64,
        distance_m: f64,
        target_m: f64,
    },
}

impl SimError {
    /// Wraps any displayable validation failure as [`SimError::InvalidSpec`]
    pub(crate) fn invalid_spec<E: std::fmt::Display>(err: E) -> Self {
        Self::InvalidSpec(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = SimError::InterpolationDomain {
            rpm: 7000.0,
            min_rpm: 0.0,
            max_rpm: 6500.0,
        };
        assert_eq!(
            err.to_string(),
            "engine speed 7000.0 rpm is outside the torque curve domain [0.0, 6500.0] rpm"
        );
        let err = SimError::NonConvergence {
            reason: "vehicle stalled",
            steps: 1,
            elapsed_s: 0.01,
            distance_m: 0.0,
            target_m: 402.336,
        };
        assert!(err.to_string().starts_with("did not finish: vehicle stalled"));
    }
}
