//! Console summaries of vehicles and run results, imperial units first

use crate::telemetry::SimulationResult;
use crate::torque::TorqueModel;
use crate::units::*;
use crate::utils::interp::{Extrapolate, Strategy};
use crate::vehicle::VehicleSpec;

/// Name, weight and power of `veh`
pub fn car_info(veh: &VehicleSpec) -> String {
    let title = match veh.year {
        Some(year) => format!("{year} {}", veh.name),
        None => veh.name.clone(),
    };
    let mut out = format!("Car:\t\t\t{title}\n");
    if let Some(engine) = &veh.engine {
        out.push_str(&format!("Engine:\t\t\t{engine}\n"));
    }
    out.push_str(&format!(
        "Weight:\t\t\t{:.2} lb,\t{:.2} kg\n",
        kg_to_lb(veh.mass_kg),
        veh.mass_kg
    ));
    out.push_str(&format!(
        "Power:\t\t\t{:.2} hp,\t{:.2} watts\n",
        watt_to_hp(veh.rated_power_w),
        veh.rated_power_w
    ));
    // an unusable curve is reported by the run itself
    let torque = TorqueModel::new(&veh.torque_curve, Strategy::default(), Extrapolate::default());
    if let Ok(torque) = torque {
        let peak_w = torque.peak_sampled_power_w();
        out.push_str(&format!(
            "Curve peak:\t\t{:.2} hp,\t{:.2} watts\n",
            watt_to_hp(peak_w),
            peak_w
        ));
    }
    out
}

/// Elapsed time, trap speed and 0-60 time of a run
pub fn simulation_info(res: &SimulationResult) -> String {
    let zero_to_sixty = match res.zero_to_sixty_s {
        Some(t) => format!("{t:.2} seconds"),
        None => String::from("not reached"),
    };
    format!(
        "Time:\t\t\t{:.2} seconds\n\
         Speed:\t\t\t{:.2} mph,\t{:.2} m/s\n\
         0-60 mph:\t\t{zero_to_sixty}\n\
         Final gear:\t\t{}\n",
        res.quarter_time_s,
        mps_to_mph(res.trap_speed_mps),
        res.trap_speed_mps,
        res.final_gear
    )
}

/// Road speed at the redline in every gear
pub fn top_speeds_info(veh: &VehicleSpec) -> String {
    veh.redline_speeds_mps()
        .iter()
        .enumerate()
        .map(|(i, speed)| {
            format!(
                "Gear {}:\t\t\t{:.2} mph,\t{:.2} m/s\n",
                i + 1,
                mps_to_mph(*speed),
                speed
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::TelemetrySampleHistoryVec;

    #[test]
    fn test_car_info() {
        let text = car_info(&VehicleSpec::mock_vehicle());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Car:\t\t\t2024 Honda Accord");
        assert_eq!(lines[1], "Engine:\t\t\t2.0L I4 Turbo");
        assert_eq!(lines[2], "Weight:\t\t\t3551.64 lb,\t1611.00 kg");
        assert_eq!(lines[3], "Power:\t\t\t192.00 hp,\t143174.40 watts");
        // 226 Nm at 6000 rpm
        assert_eq!(lines[4], "Curve peak:\t\t190.43 hp,\t141999.99 watts");
        assert_eq!(lines.len(), 5);

        let mut veh = VehicleSpec::mock_vehicle();
        veh.torque_curve.truncate(1);
        assert_eq!(car_info(&veh).lines().count(), 4);
    }

    #[test]
    fn test_simulation_info() {
        let mut res = SimulationResult {
            quarter_time_s: 16.154,
            trap_speed_mps: 40.0,
            zero_to_sixty_s: Some(7.99),
            final_gear: 4,
            telemetry: TelemetrySampleHistoryVec::new(),
        };
        let text = simulation_info(&res);
        assert!(text.starts_with("Time:\t\t\t16.15 seconds\n"));
        assert!(text.contains("Speed:\t\t\t89.48 mph,\t40.00 m/s\n"));
        assert!(text.contains("0-60 mph:\t\t7.99 seconds\n"));
        assert!(text.ends_with("Final gear:\t\t4\n"));
        res.zero_to_sixty_s = None;
        assert!(simulation_info(&res).contains("0-60 mph:\t\tnot reached\n"));
    }

    #[test]
    fn test_top_speeds() {
        let text = top_speeds_info(&VehicleSpec::mock_vehicle());
        assert_eq!(text.lines().count(), 6);
        assert!(text.starts_with("Gear 1:\t\t\t"));
    }
}
