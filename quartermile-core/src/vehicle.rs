//! Module containing the vehicle parameter record and the road-load force model.

use crate::imports::*;
use itertools::Itertools;
use std::f64::consts::PI;
use validator::Validate;

/// Static description of a car, everything a quarter-mile run needs.
/// Field aliases accept the keys of the legacy `cars.json` database.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ApproxEq, Validate)]
pub struct VehicleSpec {
    /// Vehicle name, used as the key in a [`Garage`](crate::garage::Garage)
    #[serde(alias = "Name")]
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    /// Model year
    #[serde(default, alias = "Year", skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    /// Drive layout, e.g. "FF", "FR", "AWD"
    #[serde(default, alias = "Drive Layout", skip_serializing_if = "Option::is_none")]
    pub drive_layout: Option<String>,
    /// Engine description, e.g. "2.0L I4 Turbo"
    #[serde(default, alias = "Engine", skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
    /// Vehicle mass, $kg$
    #[serde(alias = "W")]
    #[validate(range(min = 0.0))]
    pub mass_kg: f64,
    /// Rated (peak) engine power, $W$
    #[serde(alias = "P")]
    #[validate(range(min = 0.0))]
    pub rated_power_w: f64,
    /// Aerodynamic drag coefficient
    #[serde(alias = "Cd")]
    #[validate(range(min = 0.0))]
    pub drag_coef: f64,
    /// Frontal area, $m^2$
    #[serde(alias = "A")]
    #[validate(range(min = 0.0))]
    pub frontal_area_m2: f64,
    /// Rolling resistance coefficient
    #[serde(alias = "Crr")]
    #[validate(range(min = 0.0))]
    pub rolling_resistance_coef: f64,
    /// Tire-road friction coefficient
    #[serde(alias = "mu")]
    #[validate(range(min = 0.0))]
    pub tire_friction_coef: f64,
    /// Total number of wheels
    #[serde(alias = "Wheels")]
    #[validate(range(min = 1))]
    pub num_wheels: u32,
    /// Number of driven wheels
    #[serde(alias = "Driven Wheels")]
    #[validate(range(min = 1))]
    pub num_driven_wheels: u32,
    /// Tire outer diameter, $m$
    #[serde(alias = "tire_diameter")]
    pub tire_diameter_m: f64,
    /// Final drive ratio
    #[serde(alias = "final_drive")]
    pub final_drive_ratio: f64,
    /// Transmission ratios, 1st gear first
    #[validate(length(min = 1, message = "at least one gear ratio is required"))]
    pub gear_ratios: Vec<f64>,
    /// Engine redline, rpm
    #[serde(alias = "redline")]
    pub redline_rpm: f64,
    /// Engine torque curve as (rpm, Nm) pairs with strictly increasing rpm
    #[validate(length(min = 2, message = "at least two torque samples are required"))]
    pub torque_curve: Vec<(f64, f64)>,
}

impl SerdeAPI for VehicleSpec {
    fn init(&mut self) -> anyhow::Result<()> {
        self.validate_spec()
            .with_context(|| format!("vehicle {:?}", self.name))?;
        Ok(())
    }
}

impl VehicleSpec {
    /// Checks every invariant the integrator relies on
    pub fn validate_spec(&self) -> Result<(), SimError> {
        self.validate().map_err(SimError::invalid_spec)?;
        let positive = [
            ("mass_kg", self.mass_kg),
            ("tire_diameter_m", self.tire_diameter_m),
            ("final_drive_ratio", self.final_drive_ratio),
            ("redline_rpm", self.redline_rpm),
            ("tire_friction_coef", self.tire_friction_coef),
        ];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(SimError::InvalidSpec(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }
        let non_negative = [
            ("rated_power_w", self.rated_power_w),
            ("drag_coef", self.drag_coef),
            ("frontal_area_m2", self.frontal_area_m2),
            ("rolling_resistance_coef", self.rolling_resistance_coef),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(SimError::InvalidSpec(format!(
                    "{name} must be non-negative and finite, got {value}"
                )));
            }
        }
        if self.num_driven_wheels > self.num_wheels {
            return Err(SimError::InvalidSpec(format!(
                "{} driven wheels exceeds {} wheels",
                self.num_driven_wheels, self.num_wheels
            )));
        }
        if let Some((i, ratio)) = self
            .gear_ratios
            .iter()
            .enumerate()
            .find(|(_, r)| !(**r > 0.0 && r.is_finite()))
        {
            return Err(SimError::InvalidSpec(format!(
                "gear {} ratio must be positive and finite, got {ratio}",
                i + 1
            )));
        }
        if self
            .torque_curve
            .iter()
            .any(|(rpm, nm)| !rpm.is_finite() || !nm.is_finite())
        {
            return Err(SimError::InvalidSpec(
                "torque curve samples must be finite".into(),
            ));
        }
        if let Some((a, b)) = self
            .torque_curve
            .iter()
            .tuple_windows()
            .find(|(a, b)| a.0 >= b.0)
        {
            return Err(SimError::InvalidSpec(format!(
                "torque curve rpm must be strictly increasing: {} rpm followed by {} rpm",
                a.0, b.0
            )));
        }
        Ok(())
    }

    pub fn num_gears(&self) -> usize {
        self.gear_ratios.len()
    }

    /// Ratio of the 1-based `gear`
    pub fn gear_ratio(&self, gear: usize) -> Option<f64> {
        gear.checked_sub(1)
            .and_then(|i| self.gear_ratios.get(i))
            .copied()
    }

    /// Share of the vehicle weight resting on driven wheels
    pub fn driven_wheel_frac(&self) -> f64 {
        self.num_driven_wheels as f64 / self.num_wheels as f64
    }

    /// Wheel speed at road speed `speed_mps`, rpm
    pub fn wheel_rpm(&self, speed_mps: f64) -> f64 {
        speed_mps / (self.tire_diameter_m * PI) * 60.0
    }

    /// Engine speed at road speed `speed_mps` in the 1-based `gear`, rpm
    pub fn engine_rpm(&self, speed_mps: f64, gear: usize) -> Option<f64> {
        self.gear_ratio(gear)
            .map(|ratio| self.wheel_rpm(speed_mps) * ratio * self.final_drive_ratio)
    }

    /// Road speed at which each gear reaches the redline, $m/s$
    pub fn redline_speeds_mps(&self) -> Vec<f64> {
        self.gear_ratios
            .iter()
            .map(|ratio| {
                let wheel_rpm = self.redline_rpm / ratio / self.final_drive_ratio;
                wheel_rpm / 60.0 * self.tire_diameter_m * PI
            })
            .collect()
    }

    /// Aerodynamic drag, $N$
    pub fn drag_force_n(&self, speed_mps: f64, air_density_kg_per_m3: f64) -> f64 {
        0.5 * self.drag_coef * self.frontal_area_m2 * air_density_kg_per_m3 * speed_mps.powi(2)
    }

    /// Rolling resistance, $N$
    pub fn rolling_resistance_n(&self, a_grav_mps2: f64) -> f64 {
        self.rolling_resistance_coef * self.mass_kg * a_grav_mps2
    }

    /// Largest force the driven tires can put on the road, $N$
    pub fn traction_limit_n(&self, a_grav_mps2: f64) -> f64 {
        self.tire_friction_coef * self.mass_kg * a_grav_mps2 * self.driven_wheel_frac()
    }

    /// 2024 Honda Accord 2.0T with its 6-speed gearing
    pub fn mock_vehicle() -> Self {
        Self {
            name: String::from("Honda Accord"),
            year: Some(2024),
            drive_layout: Some(String::from("FF")),
            engine: Some(String::from("2.0L I4 Turbo")),
            mass_kg: 1611.0,
            rated_power_w: crate::units::hp_to_watt(192.0),
            drag_coef: 0.27,
            frontal_area_m2: 2.24,
            rolling_resistance_coef: 0.015,
            tire_friction_coef: 0.7,
            num_wheels: 4,
            num_driven_wheels: 2,
            tire_diameter_m: 0.668,
            final_drive_ratio: 4.11,
            gear_ratios: vec![3.36, 2.13, 1.51, 1.13, 0.81, 0.67],
            redline_rpm: 6500.0,
            torque_curve: vec![
                (0.0, 0.0),
                (1000.0, 165.0),
                (1600.0, 260.0),
                (5200.0, 260.0),
                (6000.0, 226.0),
                (6500.0, 180.0),
            ],
        }
    }
}
