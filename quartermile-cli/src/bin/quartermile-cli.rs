use anyhow::{bail, Context};
use clap::{ArgGroup, Parser, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use quartermile_core::prelude::*;
use quartermile_core::report;

/// Car used when no vehicle is selected
const DEFAULT_CAR: &str = "Honda Accord";

/// Standing quarter-mile simulator.
/// After running `cargo build --release`, run with
/// ```bash
/// ./target/release/quartermile-cli --car "Mazda RX-7"
/// ```
/// or, for every car of a garage file in parallel,
/// ```bash
/// ./target/release/quartermile-cli --garage-file cars.yaml --all --res-fmt json
/// ```
/// Set `RUST_LOG=debug` to follow gear shifts.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
#[clap(group(
    ArgGroup::new("vehicle")
    .args(&["car", "veh", "veh-file", "all"])
))]
struct QuarterMileApi {
    /// Name of a car in the garage
    #[clap(long, value_parser)]
    car: Option<String>,
    /// Path to a garage file (yaml or json), replaces the built-in garage
    #[clap(long, value_parser)]
    garage_file: Option<PathBuf>,
    /// Vehicle as json string
    #[clap(long, value_parser)]
    veh: Option<String>,
    /// Path to vehicle file (yaml, json or bin)
    #[clap(long, value_parser)]
    veh_file: Option<PathBuf>,
    /// Path to simulation parameter file (yaml, json or bin)
    #[clap(long, value_parser)]
    params_file: Option<PathBuf>,
    /// How to print results
    #[clap(long, value_enum, default_value = "summary")]
    res_fmt: ResFmt,
    /// Write per-step telemetry of the run to this csv file
    #[clap(long, value_parser)]
    telemetry_file: Option<PathBuf>,
    /// Run every car of the garage
    #[clap(long, action)]
    all: bool,
    /// Print the names of the cars in the garage and exit
    #[clap(long, action)]
    list: bool,
    /// Print the redline speed in every gear instead of running
    #[clap(long, action)]
    top_speeds: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ResFmt {
    Summary,
    Json,
    Yaml,
}

/// Headline numbers of one run
#[derive(Debug, Serialize)]
struct RunSummary {
    name: String,
    quarter_time_s: f64,
    trap_speed_mps: f64,
    zero_to_sixty_s: Option<f64>,
    final_gear: usize,
}

impl RunSummary {
    fn new(veh: &VehicleSpec, res: &SimulationResult) -> Self {
        Self {
            name: veh.name.clone(),
            quarter_time_s: res.quarter_time_s,
            trap_speed_mps: res.trap_speed_mps,
            zero_to_sixty_s: res.zero_to_sixty_s,
            final_gear: res.final_gear,
        }
    }
}

fn load_garage(api: &QuarterMileApi) -> anyhow::Result<Garage> {
    match &api.garage_file {
        Some(path) => Garage::from_file(path)
            .with_context(|| format!("failed to load garage {path:?}")),
        None => Garage::builtin().context("failed to load built-in garage"),
    }
}

fn select_vehicles(api: &QuarterMileApi) -> anyhow::Result<Vec<VehicleSpec>> {
    Ok(if let Some(veh_json) = &api.veh {
        vec![VehicleSpec::from_json(veh_json).context("failed to parse --veh")?]
    } else if let Some(path) = &api.veh_file {
        vec![VehicleSpec::from_file(path)
            .with_context(|| format!("failed to load vehicle {path:?}"))?]
    } else {
        let garage = load_garage(api)?;
        if api.all {
            garage.cars
        } else {
            let name = api.car.as_deref().unwrap_or(DEFAULT_CAR);
            vec![garage.get(name)?.clone()]
        }
    })
}

pub fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let api = QuarterMileApi::parse();
    tracing::debug!(?api);

    if api.list {
        for name in load_garage(&api)?.names() {
            println!("{name}");
        }
        return Ok(());
    }

    let vehs = select_vehicles(&api)?;

    if api.top_speeds {
        for veh in &vehs {
            println!("{}{}", report::car_info(veh), report::top_speeds_info(veh));
        }
        return Ok(());
    }

    if api.telemetry_file.is_some() && vehs.len() != 1 {
        bail!("--telemetry-file needs exactly one vehicle, got {}", vehs.len());
    }

    let sim_params = match &api.params_file {
        Some(path) => SimParams::from_file(path)
            .with_context(|| format!("failed to load simulation parameters {path:?}"))?,
        None => SimParams::default(),
    };

    tracing::info!(cars = vehs.len(), "running quarter-mile simulation");
    let mut results = Vec::with_capacity(vehs.len());
    for (veh, res) in vehs.iter().zip(run_many(&vehs, &sim_params)) {
        let res = res.with_context(|| format!("simulation of {:?} failed", veh.name))?;
        results.push(res);
    }

    if let Some(path) = &api.telemetry_file {
        results[0].telemetry_to_csv_file(path)?;
        tracing::info!(path = %path.display(), "telemetry written");
    }

    match api.res_fmt {
        ResFmt::Summary => {
            let blocks: Vec<String> = vehs
                .iter()
                .zip(&results)
                .map(|(veh, res)| {
                    format!("{}{}", report::car_info(veh), report::simulation_info(res))
                })
                .collect();
            print!("{}", blocks.join("\n"));
        }
        ResFmt::Json | ResFmt::Yaml => {
            let summaries: Vec<RunSummary> = vehs
                .iter()
                .zip(&results)
                .map(|(veh, res)| RunSummary::new(veh, res))
                .collect();
            let out = match (api.res_fmt, summaries.as_slice()) {
                (ResFmt::Json, [single]) => serde_json::to_string(single)?,
                (ResFmt::Json, _) => serde_json::to_string(&summaries)?,
                (_, [single]) => serde_yaml::to_string(single)?,
                (_, _) => serde_yaml::to_string(&summaries)?,
            };
            println!("{}", out.trim_end());
        }
    }
    Ok(())
}
