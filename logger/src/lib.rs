//! Run a speedtest and store the result as a point in InfluxDB.

#[macro_use]
extern crate log;

pub mod cli;
pub mod config;
pub mod cycle;
pub mod error;
pub mod logging;
pub mod runner;

pub mod prelude {
    pub use crate::cli::CliArgs;
    pub use crate::config::{ConfigError, Settings};
    pub use crate::cycle::{CycleState, Orchestrator, Stage};
    pub use crate::error::CycleError;
    pub use crate::runner::{MeasurementOutput, MeasurementTool, Speedtest};
}
