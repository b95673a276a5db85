//! Module containing per-step telemetry and the outcome of a quarter-mile run.

use crate::imports::*;
use crate::units;
use std::io::Write;

/// State of the vehicle at the end of one integration step
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, HistoryVec, ApproxEq)]
pub struct TelemetrySample {
    /// Elapsed time, $s$
    pub time_s: f64,
    /// Acceleration, $m/s^2$
    pub accel_mps2: f64,
    /// Velocity, $m/s$
    pub velocity_mps: f64,
    /// Distance travelled, $m$
    pub distance_m: f64,
    /// Power delivered to the driven wheels, $W$
    pub wheel_power_w: f64,
    /// Engine speed used for the torque lookup, rpm
    pub engine_rpm: f64,
    /// Gear in use, 1-based
    pub gear: usize,
}

/// Outcome of a completed run
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ApproxEq)]
pub struct SimulationResult {
    /// Time at which the target distance was reached, $s$
    pub quarter_time_s: f64,
    /// Velocity at the target distance, $m/s$
    pub trap_speed_mps: f64,
    /// Time at which 60 mph was first reached, `None` if it never was
    pub zero_to_sixty_s: Option<f64>,
    /// Gear engaged at the finish line
    pub final_gear: usize,
    pub telemetry: TelemetrySampleHistoryVec,
}

impl SerdeAPI for SimulationResult {}

/// CSV header row, display units
const CSV_HEADER: [&str; 7] = [
    "time_s",
    "accel_g",
    "speed_mph",
    "distance_ft",
    "wheel_power_hp",
    "engine_rpm",
    "gear",
];

impl SimulationResult {
    /// 0-60 time, or the total run time when 60 mph was never reached
    pub fn zero_to_sixty_or_total(&self) -> f64 {
        self.zero_to_sixty_s.unwrap_or(self.quarter_time_s)
    }

    /// Number of recorded time steps
    pub fn len(&self) -> usize {
        self.telemetry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.telemetry.is_empty()
    }

    /// Time at which `speed_mps` was first reached, e.g. for 0-100 km/h
    pub fn time_to_speed_s(&self, speed_mps: f64) -> Option<f64> {
        utils::first_geq(&self.telemetry.velocity_mps, speed_mps)
            .map(|i| self.telemetry.time_s[i])
    }

    pub fn peak_wheel_power_w(&self) -> f64 {
        utils::ndarrmax(&Array1::from_vec(self.telemetry.wheel_power_w.clone()))
    }

    pub fn peak_accel_mps2(&self) -> f64 {
        utils::ndarrmax(&Array1::from_vec(self.telemetry.accel_mps2.clone()))
    }

    /// Writes one row per time step in display units (g, mph, ft, hp)
    pub fn write_telemetry_csv<W: Write>(&self, wtr: W) -> anyhow::Result<()> {
        let mut wtr = csv::Writer::from_writer(wtr);
        wtr.write_record(CSV_HEADER)?;
        for sample in self.telemetry.iter() {
            wtr.write_record(&[
                format!("{:.2}", sample.time_s),
                format!("{:.4}", units::mps2_to_g(sample.accel_mps2)),
                format!("{:.3}", units::mps_to_mph(sample.velocity_mps)),
                format!("{:.3}", units::m_to_ft(sample.distance_m)),
                format!("{:.2}", units::watt_to_hp(sample.wheel_power_w)),
                format!("{:.0}", sample.engine_rpm),
                sample.gear.to_string(),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Writes [`write_telemetry_csv`](Self::write_telemetry_csv) output to `filepath`
    pub fn telemetry_to_csv_file<P: AsRef<Path>>(&self, filepath: P) -> anyhow::Result<()> {
        let filepath = filepath.as_ref();
        let file = File::create(filepath)
            .with_context(|| format!("Could not create telemetry file: {filepath:?}"))?;
        self.write_telemetry_csv(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(step: usize) -> TelemetrySample {
        let t = step as f64 * 0.01;
        TelemetrySample {
            time_s: t,
            accel_mps2: 4.0 - t,
            velocity_mps: 4.0 * t,
            distance_m: 2.0 * t * t,
            wheel_power_w: 1000.0 * step as f64,
            engine_rpm: 2500.0,
            gear: 1,
        }
    }

    fn result() -> SimulationResult {
        let mut telemetry = TelemetrySampleHistoryVec::new();
        for step in 1..=3 {
            telemetry.push(sample(step));
        }
        SimulationResult {
            quarter_time_s: 0.03,
            trap_speed_mps: 0.12,
            zero_to_sixty_s: None,
            final_gear: 1,
            telemetry,
        }
    }

    #[test]
    fn test_history_vec() {
        let mut hist = TelemetrySampleHistoryVec::new();
        assert!(hist.is_empty());
        hist.push(sample(1));
        hist.push(sample(2));
        assert_eq!(hist.len(), 2);
        assert_eq!(hist.velocity_mps, vec![0.04, 0.08]);
        assert_eq!(hist.get(1), Some(sample(2)));
        assert_eq!(hist.get(2), None);
        assert_eq!(hist.last(), Some(sample(2)));
        assert_eq!(hist.pop(), Some(sample(2)));
        assert_eq!(hist.iter().collect::<Vec<_>>(), vec![sample(1)]);
        hist.clear();
        assert!(hist.is_empty());
    }

    #[test]
    fn test_summary_accessors() {
        let mut res = result();
        assert_eq!(res.len(), 3);
        assert_eq!(res.zero_to_sixty_or_total(), 0.03);
        res.zero_to_sixty_s = Some(0.02);
        assert_eq!(res.zero_to_sixty_or_total(), 0.02);
        assert_eq!(res.peak_wheel_power_w(), 3000.0);
        assert!(res.peak_accel_mps2().approx_eq(&3.99, 1e-12));
        assert_eq!(res.time_to_speed_s(0.08), Some(0.02));
        assert_eq!(res.time_to_speed_s(1.0), None);
    }

    #[test]
    fn test_csv() {
        let mut buf = Vec::new();
        result().write_telemetry_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "time_s,accel_g,speed_mph,distance_ft,wheel_power_hp,engine_rpm,gear"
        );
        assert!(lines[1].starts_with("0.01,"));
        assert!(lines[3].ends_with(",2500,1"));
    }

    #[test]
    fn test_serde() {
        let res = result();
        let json = res.to_json().unwrap();
        assert!(json.contains("\"zero_to_sixty_s\":null"));
        let back = SimulationResult::from_json(json).unwrap();
        assert!(back.approx_eq(&res, 1e-12));
        let bin = SimulationResult::from_bincode(&res.to_bincode().unwrap()).unwrap();
        assert_eq!(bin, res);
    }
}
