//! Module containing simulation parameters.

use crate::imports::*;
use crate::units::MPS_PER_MPH;
use crate::utils::interp::{Extrapolate, Strategy};

/// Standing quarter mile, m
pub const QUARTER_MILE_M: f64 = 402.336;
/// 60 mph, m/s
pub const SIXTY_MPH_MPS: f64 = 60.0 * MPS_PER_MPH;
/// Velocity floor used when converting wheel power to tractive force at a standstill, m/s
pub const LAUNCH_SPEED_FLOOR_MPS: f64 = 0.01;
/// Shifts are instantaneous unless configured otherwise
pub const DEFAULT_SHIFT_TIME_S: f64 = 0.0;

/// Engine speed used for the torque lookup once no higher gear is available
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TopGearLimit {
    /// Hold the engine at the shift point, `redline - shift_margin_rpm`
    #[default]
    ShiftPoint,
    /// Hold the engine at the redline
    Redline,
}

/// Solver and environment parameters for a quarter-mile run
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ApproxEq)]
#[serde(default)]
pub struct SimParams {
    /// Air density, $kg/m^3$
    pub air_density_kg_per_m3: f64, // = 1.225, sea level ISA
    /// Gravitational acceleration, $m/s^2$
    pub a_grav_mps2: f64, // = 9.81
    /// Distance at which the run ends, $m$
    pub target_distance_m: f64,
    /// Integration time step, $s$
    pub dt_s: f64,
    /// Minimum engine speed in 1st gear used for torque lookup, rpm. 0 disables launch control.
    pub launch_rpm: f64,
    /// An upshift happens once engine speed exceeds `redline - shift_margin_rpm`
    pub shift_margin_rpm: f64,
    /// Time with the clutch open per upshift, $s$
    pub shift_time_s: f64,
    /// Fraction of engine power lost between crank and wheels
    pub drivetrain_loss_frac: f64,
    /// Time budget after which the run is declared not finished, $s$
    pub max_time_s: f64,
    #[approx_eq(skip)]
    pub torque_interp: Strategy,
    #[approx_eq(skip)]
    pub torque_extrapolate: Extrapolate,
    #[approx_eq(skip)]
    pub top_gear_limit: TopGearLimit,
}

impl SerdeAPI for SimParams {
    fn init(&mut self) -> anyhow::Result<()> {
        self.validate()
    }
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            air_density_kg_per_m3: 1.225,
            a_grav_mps2: 9.81,
            target_distance_m: QUARTER_MILE_M,
            dt_s: 0.01,
            launch_rpm: 2500.0,
            shift_margin_rpm: 300.0,
            shift_time_s: DEFAULT_SHIFT_TIME_S,
            drivetrain_loss_frac: 0.0,
            max_time_s: 120.0,
            torque_interp: Strategy::default(),
            torque_extrapolate: Extrapolate::default(),
            top_gear_limit: TopGearLimit::default(),
        }
    }
}

impl SimParams {
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.dt_s > 0.0 && self.dt_s.is_finite(),
            "{}",
            format_dbg!(self.dt_s)
        );
        ensure!(
            self.target_distance_m > 0.0,
            "{}",
            format_dbg!(self.target_distance_m)
        );
        ensure!(
            self.max_time_s >= self.dt_s,
            "time budget must cover at least one step: {}",
            format_dbg!((self.max_time_s, self.dt_s))
        );
        ensure!(
            self.air_density_kg_per_m3 >= 0.0 && self.a_grav_mps2 > 0.0,
            "{}",
            format_dbg!((self.air_density_kg_per_m3, self.a_grav_mps2))
        );
        ensure!(
            (0.0..1.0).contains(&self.drivetrain_loss_frac),
            "{}",
            format_dbg!(self.drivetrain_loss_frac)
        );
        ensure!(
            self.launch_rpm >= 0.0 && self.shift_margin_rpm >= 0.0 && self.shift_time_s >= 0.0,
            "{}",
            format_dbg!((self.launch_rpm, self.shift_margin_rpm, self.shift_time_s))
        );
        Ok(())
    }

    /// Largest number of integration steps allowed by `max_time_s`
    pub fn max_steps(&self) -> usize {
        (self.max_time_s / self.dt_s).ceil() as usize
    }
}
