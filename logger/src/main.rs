use std::process::ExitCode;

use anyhow::Context;
use clap::Parser as _;
use log::{error, info};
use speedtest_influx::InfluxDatabase;
use speedtest_logger::logging;
use speedtest_logger::prelude::*;

const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> ExitCode {
    let args = CliArgs::parse();

    if let Err(e) = logging::init() {
        eprintln!("Failed to initialise logging: {e}");
        return ExitCode::FAILURE;
    }

    info!("Speedtest CLI Data Logger to InfluxDB started");
    info!("{CRATE_NAME} {CRATE_VERSION}");

    let mut orchestrator = match setup(&args) {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            error!("{e:#}");
            return ExitCode::FAILURE;
        }
    };

    let limit = if args.service { None } else { Some(1) };
    match orchestrator.run_cycles(limit) {
        Ok(_) => {
            info!("Speedtest CLI Data Logger to InfluxDB completed");
            ExitCode::SUCCESS
        }
        // Already logged by the orchestrator.
        Err(_) => ExitCode::FAILURE,
    }
}

fn setup(args: &CliArgs) -> anyhow::Result<Orchestrator<InfluxDatabase, Speedtest>> {
    let settings = match &args.config {
        Some(path) => {
            info!("Using config file: {}", path.display());
            Settings::from_file(path)
        }
        None => Settings::from_env(),
    }
    .context("Invalid configuration")?
    .with_verbose(args.verbose);

    info!(
        "Using InfluxDB at {} with database {}",
        settings.connection.url(),
        settings.database_name
    );

    let database = InfluxDatabase::connect(settings.connection.clone())
        .context("Failed to create InfluxDB client")?;
    let tool = Speedtest::new(&settings.speedtest_binary);

    Ok(Orchestrator::new(settings, database, tool))
}
