use crate::config::Settings;
use crate::cycle::Stage;
use speedtest_influx::DatabaseError;
use speedtest_model::DecodeError;
use std::time::Duration;

/// Why a measurement cycle stopped.
#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    #[error("Unable to initialize the database: {0}")]
    Connection(#[source] DatabaseError),
    #[error("Failed to start speedtest: {0}")]
    Launch(#[source] std::io::Error),
    #[error("Speedtest exited with code {exit_code}")]
    Measurement {
        exit_code: i32,
        stdout: String,
        stderr: String,
    },
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("Data write to DB failed: {0}")]
    Write(#[source] DatabaseError),
}

impl CycleError {
    /// The stage of the cycle that failed.
    pub fn stage(&self) -> Stage {
        match self {
            CycleError::Connection(_) => Stage::Init,
            CycleError::Launch(_) | CycleError::Measurement { .. } => Stage::Measuring,
            CycleError::Decode(_) => Stage::Mapping,
            CycleError::Write(_) => Stage::Writing,
        }
    }

    /// How long a supervisor is expected to wait before starting the logger again.
    ///
    /// The logger exits on the first failure and never sleeps on these intervals itself.
    pub fn retry_after(&self, settings: &Settings) -> Duration {
        match self.stage() {
            Stage::Init => settings.db_retry_interval,
            _ => settings.test_fail_interval,
        }
    }
}
