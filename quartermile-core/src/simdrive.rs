//! Module containing the time-stepped quarter-mile integrator.

use crate::imports::*;
use crate::params::*;
use crate::telemetry::{SimulationResult, TelemetrySample, TelemetrySampleHistoryVec};
use crate::torque::TorqueModel;
use crate::vehicle::VehicleSpec;
use rayon::prelude::*;

/// What the drivetrain is doing during a time step
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrivePhase {
    /// Clutch closed, engine drives the wheels
    #[default]
    Accelerating,
    /// Clutch open during an upshift, no engine force
    Shifting,
}

/// Mutable state of a run, owned by the integrator
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ApproxEq)]
pub struct SimulationState {
    /// Time step counter
    pub i: usize,
    /// Elapsed time, $s$
    pub time_s: f64,
    /// Velocity, $m/s$
    pub velocity_mps: f64,
    /// Distance travelled, $m$
    pub distance_m: f64,
    /// Gear in use, 1-based
    pub gear: usize,
    /// Time at which 60 mph was first reached
    pub zero_to_sixty_s: Option<f64>,
    #[approx_eq(skip)]
    pub phase: DrivePhase,
    /// Clutch-open time left in the current shift, $s$
    pub shift_time_remaining_s: f64,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self {
            i: 0,
            time_s: 0.0,
            velocity_mps: 0.0,
            distance_m: 0.0,
            gear: 1,
            zero_to_sixty_s: None,
            phase: DrivePhase::default(),
            shift_time_remaining_s: 0.0,
        }
    }
}

impl SimulationState {
    pub fn reached_sixty(&self) -> bool {
        self.zero_to_sixty_s.is_some()
    }
}

/// Standing-start acceleration run of one vehicle
#[derive(Clone, Debug, PartialEq)]
pub struct QuarterMileSim {
    pub veh: VehicleSpec,
    pub sim_params: SimParams,
    torque: TorqueModel,
}

impl QuarterMileSim {
    /// Validates `veh` and `sim_params` (defaults if `None`) and builds the torque lookup
    pub fn new(veh: VehicleSpec, sim_params: Option<SimParams>) -> Result<Self, SimError> {
        let sim_params = sim_params.unwrap_or_default();
        sim_params
            .validate()
            .map_err(|err| SimError::InvalidSpec(format!("simulation parameters: {err}")))?;
        veh.validate_spec()?;
        let torque = TorqueModel::new(
            &veh.torque_curve,
            sim_params.torque_interp,
            sim_params.torque_extrapolate,
        )?;
        Ok(Self {
            veh,
            sim_params,
            torque,
        })
    }

    /// Engine speed at which an upshift is triggered, rpm
    pub fn shift_point_rpm(&self) -> f64 {
        self.veh.redline_rpm - self.sim_params.shift_margin_rpm
    }

    /// Integrates until the target distance is covered
    pub fn run(&self) -> Result<SimulationResult, SimError> {
        #[cfg(feature = "logging")]
        log::info!(
            "starting run for {:?}: {} gears, dt = {} s",
            self.veh.name,
            self.veh.num_gears(),
            self.sim_params.dt_s
        );
        let target_m = self.sim_params.target_distance_m;
        let max_steps = self.sim_params.max_steps();
        let mut state = SimulationState::default();
        let mut history = TelemetrySampleHistoryVec::new();

        while state.distance_m < target_m {
            if state.i >= max_steps {
                return Err(self.non_convergence("time budget exhausted", &state));
            }
            state.i += 1;
            // a step that ends a shift was still unpowered
            let clutch_closed = state.phase == DrivePhase::Accelerating;
            let sample = self.solve_step(&mut state)?;
            history.push(sample);
            if clutch_closed
                && state.phase == DrivePhase::Accelerating
                && state.velocity_mps == 0.0
                && sample.accel_mps2 <= 0.0
            {
                return Err(self.non_convergence("vehicle stalled", &state));
            }
        }

        #[cfg(feature = "logging")]
        log::info!(
            "{:?} finished in {:.2} s at {:.2} m/s",
            self.veh.name,
            state.time_s,
            state.velocity_mps
        );
        Ok(SimulationResult {
            quarter_time_s: state.time_s,
            trap_speed_mps: state.velocity_mps,
            zero_to_sixty_s: state.zero_to_sixty_s,
            final_gear: state.gear,
            telemetry: history,
        })
    }

    /// Advances `state` by one time step and returns the recorded sample
    pub fn solve_step(&self, state: &mut SimulationState) -> Result<TelemetrySample, SimError> {
        let p = &self.sim_params;
        let dt = p.dt_s;
        let speed = state.velocity_mps;

        if state.phase == DrivePhase::Accelerating {
            self.upshift(state);
        }
        let (engine_rpm, wheel_power_w) = match state.phase {
            DrivePhase::Accelerating => {
                let rpm = self.lookup_rpm(state);
                let curve_power_w = self.torque.power_at(rpm)?;
                let wheel_power_w = (curve_power_w.min(self.veh.rated_power_w)
                    * (1.0 - p.drivetrain_loss_frac))
                    .max(0.0);
                (rpm, wheel_power_w)
            }
            DrivePhase::Shifting => {
                state.shift_time_remaining_s -= dt;
                if state.shift_time_remaining_s <= dt * 1e-6 {
                    state.shift_time_remaining_s = 0.0;
                    state.phase = DrivePhase::Accelerating;
                }
                (self.raw_rpm(speed, state.gear), 0.0)
            }
        };

        let f_engine = wheel_power_w / speed.max(LAUNCH_SPEED_FLOOR_MPS);
        let f_drag = self.veh.drag_force_n(speed, p.air_density_kg_per_m3);
        let f_roll = self.veh.rolling_resistance_n(p.a_grav_mps2);
        let f_net = (f_engine - f_drag - f_roll).min(self.veh.traction_limit_n(p.a_grav_mps2));
        let accel_mps2 = f_net / self.veh.mass_kg;

        state.velocity_mps = (speed + accel_mps2 * dt).max(0.0);
        state.distance_m += state.velocity_mps * dt;
        state.time_s = state.i as f64 * dt;

        if !state.reached_sixty() && state.velocity_mps >= SIXTY_MPH_MPS {
            state.zero_to_sixty_s = Some(state.time_s);
            #[cfg(feature = "logging")]
            log::debug!("60 mph reached at {:.2} s", state.time_s);
        }

        Ok(TelemetrySample {
            time_s: state.time_s,
            accel_mps2,
            velocity_mps: state.velocity_mps,
            distance_m: state.distance_m,
            wheel_power_w,
            engine_rpm,
            gear: state.gear,
        })
    }

    fn raw_rpm(&self, speed_mps: f64, gear: usize) -> f64 {
        // `gear` is kept within 1..=num_gears by `upshift`
        self.veh.engine_rpm(speed_mps, gear).unwrap_or(0.0)
    }

    /// Steps up through the gearbox while the engine is above the shift point.
    /// Starts a shift when `shift_time_s` is positive.
    fn upshift(&self, state: &mut SimulationState) {
        let start_gear = state.gear;
        while state.gear < self.veh.num_gears()
            && self.raw_rpm(state.velocity_mps, state.gear) > self.shift_point_rpm()
        {
            state.gear += 1;
        }
        if state.gear != start_gear {
            #[cfg(feature = "logging")]
            log::debug!(
                "upshift {} -> {} at {:.2} s, {:.2} m/s",
                start_gear,
                state.gear,
                state.time_s,
                state.velocity_mps
            );
            if self.sim_params.shift_time_s > 0.0 {
                state.phase = DrivePhase::Shifting;
                state.shift_time_remaining_s = self.sim_params.shift_time_s;
            }
        }
    }

    /// Engine speed used for the torque lookup, after the launch floor and the top-gear limit
    fn lookup_rpm(&self, state: &SimulationState) -> f64 {
        let p = &self.sim_params;
        let mut rpm = self.raw_rpm(state.velocity_mps, state.gear);
        if state.gear == 1 {
            rpm = rpm.max(p.launch_rpm);
        }
        if state.gear == self.veh.num_gears() {
            let limit = match p.top_gear_limit {
                TopGearLimit::ShiftPoint => self.shift_point_rpm(),
                TopGearLimit::Redline => self.veh.redline_rpm,
            };
            if rpm > limit {
                #[cfg(feature = "logging")]
                log::debug!("{}", format_dbg!((rpm, limit)));
                rpm = limit;
            }
        }
        rpm
    }

    fn non_convergence(&self, reason: &'static str, state: &SimulationState) -> SimError {
        #[cfg(feature = "logging")]
        log::warn!("{:?}: {reason} at step {}", self.veh.name, state.i);
        SimError::NonConvergence {
            reason,
            steps: state.i,
            elapsed_s: state.time_s,
            distance_m: state.distance_m,
            target_m: self.sim_params.target_distance_m,
        }
    }
}

/// Runs `veh` with default parameters
pub fn run(veh: &VehicleSpec) -> Result<SimulationResult, SimError> {
    QuarterMileSim::new(veh.clone(), None)?.run()
}

/// Runs every vehicle in parallel with the same parameters.
/// Results are returned in the order of `vehs`.
pub fn run_many(
    vehs: &[VehicleSpec],
    sim_params: &SimParams,
) -> Vec<Result<SimulationResult, SimError>> {
    vehs.par_iter()
        .map(|veh| QuarterMileSim::new(veh.clone(), Some(sim_params.clone()))?.run())
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::units::hp_to_watt;

    /// Reference car with only the first gear of its gearbox
    pub(crate) fn single_gear_veh() -> VehicleSpec {
        let mut veh = VehicleSpec::mock_vehicle();
        veh.rated_power_w = 143_000.0;
        veh.gear_ratios.truncate(1);
        veh
    }

    fn check_invariants(veh: &VehicleSpec, params: &SimParams, res: &SimulationResult) {
        let hist = &res.telemetry;
        let dt = params.dt_s;
        assert!(!hist.is_empty());
        assert!(utils::is_non_decreasing(&hist.velocity_mps) || params.shift_time_s > 0.0);
        assert!(utils::is_non_decreasing(&hist.distance_m));
        assert!(utils::is_non_decreasing(&hist.gear));
        assert!(hist.gear.iter().all(|g| (1..=veh.num_gears()).contains(g)));
        for (i, t) in hist.time_s.iter().enumerate() {
            assert!(t.approx_eq(&((i + 1) as f64 * dt), 1e-9), "step {i}: {t}");
        }
        let limit = veh.traction_limit_n(params.a_grav_mps2);
        for accel in &hist.accel_mps2 {
            assert!(accel * veh.mass_kg <= limit * (1.0 + 1e-12));
        }
        let final_distance = *hist.distance_m.last().unwrap();
        assert!(final_distance >= params.target_distance_m);
        assert!(
            final_distance - params.target_distance_m <= res.trap_speed_mps * dt + 1e-9,
            "overshoot {}",
            final_distance - params.target_distance_m
        );
        assert_eq!(res.quarter_time_s, *hist.time_s.last().unwrap());
        assert_eq!(res.final_gear, *hist.gear.last().unwrap());
        if let Some(t60) = res.zero_to_sixty_s {
            assert!(t60 <= res.quarter_time_s);
            let idx = utils::first_geq(&hist.velocity_mps, SIXTY_MPH_MPS).unwrap();
            assert_eq!(hist.time_s[idx], t60);
        } else {
            assert!(utils::first_geq(&hist.velocity_mps, SIXTY_MPH_MPS).is_none());
        }
    }

    #[test]
    fn test_reference_scenario() {
        let veh = single_gear_veh();
        let res = run(&veh).unwrap();
        check_invariants(&veh, &SimParams::default(), &res);
        assert!(
            (13.0..=17.0).contains(&res.quarter_time_s),
            "{}",
            res.quarter_time_s
        );
        let t60 = res.zero_to_sixty_s.unwrap();
        assert!((5.0..=8.0).contains(&t60), "{t60}");
        assert_eq!(res.final_gear, 1);
    }

    #[test]
    fn test_six_speed() {
        let veh = VehicleSpec::mock_vehicle();
        let res = run(&veh).unwrap();
        check_invariants(&veh, &SimParams::default(), &res);
        assert!(res.final_gear > 1);
        assert!((13.0..=18.0).contains(&res.quarter_time_s));
        assert!(res.zero_to_sixty_s.unwrap() < 9.0);
        // upshifts keep the engine at or below the shift point
        let sim = QuarterMileSim::new(veh, None).unwrap();
        assert!(res
            .telemetry
            .engine_rpm
            .iter()
            .all(|rpm| *rpm <= sim.shift_point_rpm() + 1e-9));
    }

    #[test]
    fn test_launch_floor() {
        let res = run(&VehicleSpec::mock_vehicle()).unwrap();
        let first = res.telemetry.get(0).unwrap();
        assert_eq!(first.engine_rpm, 2500.0);
        assert_eq!(first.gear, 1);
        assert!(first.wheel_power_w > 0.0);
    }

    #[test]
    fn test_zero_power_does_not_converge() {
        let mut veh = single_gear_veh();
        veh.rated_power_w = 0.0;
        match run(&veh) {
            Err(SimError::NonConvergence { reason, steps, .. }) => {
                assert_eq!(reason, "vehicle stalled");
                assert_eq!(steps, 1);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_time_budget() {
        let params = SimParams {
            max_time_s: 2.0,
            ..Default::default()
        };
        let err = QuarterMileSim::new(VehicleSpec::mock_vehicle(), Some(params))
            .unwrap()
            .run()
            .unwrap_err();
        assert!(matches!(
            err,
            SimError::NonConvergence {
                reason: "time budget exhausted",
                steps: 200,
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_inputs() {
        let mut veh = VehicleSpec::mock_vehicle();
        veh.mass_kg = -1.0;
        assert!(matches!(run(&veh), Err(SimError::InvalidSpec(_))));
        let params = SimParams {
            dt_s: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            QuarterMileSim::new(VehicleSpec::mock_vehicle(), Some(params)),
            Err(SimError::InvalidSpec(_))
        ));
    }

    #[test]
    fn test_torque_domain_error() {
        let mut veh = VehicleSpec::mock_vehicle();
        // curve starting above the launch floor cannot serve a standing start
        veh.torque_curve = vec![(3000.0, 200.0), (6500.0, 200.0)];
        assert!(matches!(
            run(&veh),
            Err(SimError::InterpolationDomain { rpm, .. }) if rpm == 2500.0
        ));
        let params = SimParams {
            torque_extrapolate: crate::utils::interp::Extrapolate::Clamp,
            ..Default::default()
        };
        assert!(QuarterMileSim::new(veh, Some(params)).unwrap().run().is_ok());
    }

    #[test]
    fn test_shift_time() {
        let veh = VehicleSpec::mock_vehicle();
        let instant = run(&veh).unwrap();
        let params = SimParams {
            shift_time_s: 0.3,
            ..Default::default()
        };
        let res = QuarterMileSim::new(veh.clone(), Some(params.clone()))
            .unwrap()
            .run()
            .unwrap();
        check_invariants(&veh, &params, &res);
        assert!(res.quarter_time_s > instant.quarter_time_s);
        // 30 clutch-open steps per upshift
        let unpowered = res
            .telemetry
            .wheel_power_w
            .iter()
            .filter(|p| **p == 0.0)
            .count();
        // the finish line may fall inside the last shift
        assert!(unpowered <= 30 * (res.final_gear - 1));
        assert!(unpowered > 30 * (res.final_gear - 2));
    }

    #[test]
    fn test_stall_checked_after_shift_ends() {
        let mut veh = VehicleSpec::mock_vehicle();
        // enough rolling resistance to coast to a standstill well short of the line
        veh.rolling_resistance_coef = 0.3;
        let instant = run(&veh).unwrap();
        let gears = &instant.telemetry.gear;
        let first_upshift_step = gears.iter().position(|g| *g > 1).unwrap() + 1;
        let params = SimParams {
            shift_time_s: 20.0,
            ..Default::default()
        };
        let shift_steps = (params.shift_time_s / params.dt_s).round() as usize;
        match QuarterMileSim::new(veh, Some(params)).unwrap().run() {
            Err(SimError::NonConvergence { reason, steps, .. }) => {
                assert_eq!(reason, "vehicle stalled");
                // 2nd gear at standstill gives no power on the first clutch-closed step
                assert_eq!(steps, first_upshift_step + shift_steps);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_top_gear_redline_limit() {
        let veh = single_gear_veh();
        let params = SimParams {
            top_gear_limit: TopGearLimit::Redline,
            ..Default::default()
        };
        let sim = QuarterMileSim::new(veh.clone(), Some(params.clone())).unwrap();
        let res = sim.run().unwrap();
        check_invariants(&veh, &params, &res);
        let rpm = &res.telemetry.engine_rpm;
        assert!(rpm.iter().all(|r| *r <= veh.redline_rpm));
        assert!(rpm.iter().any(|r| *r > sim.shift_point_rpm()));
        // torque falls off past the shift point
        let default = run(&veh).unwrap();
        assert!(res.quarter_time_s > default.quarter_time_s);
        assert!(res.zero_to_sixty_s.unwrap() > default.zero_to_sixty_s.unwrap());
    }

    #[test]
    fn test_drivetrain_loss_slows_car() {
        let veh = VehicleSpec::mock_vehicle();
        let params = SimParams {
            drivetrain_loss_frac: 0.15,
            ..Default::default()
        };
        let lossy = QuarterMileSim::new(veh.clone(), Some(params))
            .unwrap()
            .run()
            .unwrap();
        assert!(lossy.quarter_time_s > run(&veh).unwrap().quarter_time_s);
    }

    #[test]
    fn test_rated_power_caps_curve() {
        let mut veh = VehicleSpec::mock_vehicle();
        veh.rated_power_w = hp_to_watt(100.0);
        let res = run(&veh).unwrap();
        assert!(res.peak_wheel_power_w() <= veh.rated_power_w);
    }

    #[test]
    fn test_run_many_keeps_order() {
        let mut slow = VehicleSpec::mock_vehicle();
        slow.name = String::from("slow");
        slow.mass_kg = 2500.0;
        let mut broken = VehicleSpec::mock_vehicle();
        broken.gear_ratios.clear();
        let vehs = vec![VehicleSpec::mock_vehicle(), slow.clone(), broken];
        let results = run_many(&vehs, &SimParams::default());
        assert_eq!(results.len(), 3);
        assert_eq!(
            results[0].as_ref().unwrap(),
            &run(&VehicleSpec::mock_vehicle()).unwrap()
        );
        assert_eq!(results[1].as_ref().unwrap(), &run(&slow).unwrap());
        assert!(matches!(results[2], Err(SimError::InvalidSpec(_))));
    }

    #[test]
    fn test_deterministic() {
        let veh = VehicleSpec::mock_vehicle();
        assert_eq!(run(&veh).unwrap(), run(&veh).unwrap());
    }
}
