//! Engine torque lookup over a sparse (rpm, Nm) table

use crate::imports::*;
use crate::utils::interp::{Extrapolate, Interp1D, Strategy};
use std::f64::consts::PI;

/// Interpolated engine torque curve
#[derive(Clone, Debug, PartialEq)]
pub struct TorqueModel {
    interp: Interp1D,
}

impl TorqueModel {
    pub fn new(
        curve: &[(f64, f64)],
        strategy: Strategy,
        extrapolate: Extrapolate,
    ) -> Result<Self, SimError> {
        let (rpm, torque): (Vec<f64>, Vec<f64>) = curve.iter().copied().unzip();
        let interp =
            Interp1D::new(rpm, torque, strategy, extrapolate).map_err(SimError::invalid_spec)?;
        Ok(Self { interp })
    }

    /// Sampled rpm range, `(min, max)`
    pub fn domain(&self) -> (f64, f64) {
        self.interp.domain()
    }

    /// Engine torque at `rpm`, $N \cdot m$
    pub fn torque_at(&self, rpm: f64) -> Result<f64, SimError> {
        let (min_rpm, max_rpm) = self.domain();
        let domain_err = || SimError::InterpolationDomain {
            rpm,
            min_rpm,
            max_rpm,
        };
        if !rpm.is_finite() {
            return Err(domain_err());
        }
        self.interp.interpolate(rpm).map_err(|_| domain_err())
    }

    /// Engine power at `rpm`, $W$
    pub fn power_at(&self, rpm: f64) -> Result<f64, SimError> {
        Ok(torque_to_power(self.torque_at(rpm)?, rpm))
    }

    /// Highest power over the sampled points, $W$
    pub fn peak_sampled_power_w(&self) -> f64 {
        let power: Array1<f64> = self
            .interp
            .x()
            .iter()
            .zip(self.interp.f_x())
            .map(|(rpm, nm)| torque_to_power(*nm, *rpm))
            .collect();
        utils::ndarrmax(&power)
    }
}

/// Torque at `rpm` using the default strategy and extrapolation policy
pub fn torque_at(curve: &[(f64, f64)], rpm: f64) -> Result<f64, SimError> {
    TorqueModel::new(curve, Strategy::default(), Extrapolate::default())?.torque_at(rpm)
}

/// Shaft power delivered by `torque_nm` at `rpm`, $W$
pub fn torque_to_power(torque_nm: f64, rpm: f64) -> f64 {
    torque_nm * rpm * 2.0 * PI / 60.0
}
