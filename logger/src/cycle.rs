use crate::config::Settings;
use crate::error::CycleError;
use crate::runner::MeasurementTool;
use speedtest_influx::{ensure_database, Database};
use speedtest_model::MetricPoint;

/// A step of the measurement cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Stage {
    Init,
    Measuring,
    Mapping,
    Writing,
}

/// Where the orchestrator is in its current cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    /// No cycle has started yet.
    Ready,
    Active(Stage),
    Done,
    /// The cycle stopped at this stage. Nothing is written after a failure.
    Failed(Stage),
}

/// Runs measurement cycles: initialise the database, measure, map the report and write it.
///
/// Any failure ends the cycle and is reported to the caller, which is expected to exit. The
/// database is only initialised by the first cycle of an orchestrator.
pub struct Orchestrator<D, M> {
    settings: Settings,
    database: D,
    tool: M,
    initialized: bool,
    state: CycleState,
}

impl<D, M> Orchestrator<D, M>
where
    D: Database,
    M: MeasurementTool,
{
    pub fn new(settings: Settings, database: D, tool: M) -> Self {
        Self {
            settings,
            database,
            tool,
            initialized: false,
            state: CycleState::Ready,
        }
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn database(&self) -> &D {
        &self.database
    }

    pub fn tool(&self) -> &M {
        &self.tool
    }

    /// Run one full cycle and return the point that was written.
    ///
    /// The error has already been logged when this returns.
    pub fn run_cycle(&mut self) -> Result<MetricPoint, CycleError> {
        match self.try_cycle() {
            Ok(point) => {
                self.state = CycleState::Done;
                info!("Speedtest cycle completed");
                Ok(point)
            }
            Err(e) => {
                self.state = CycleState::Failed(e.stage());
                self.log_failure(&e);
                Err(e)
            }
        }
    }

    /// Run cycles back to back, sleeping for the test interval between them.
    ///
    /// Stops after `limit` successful cycles, or at the first failure. Without a limit this only
    /// returns on failure.
    pub fn run_cycles(&mut self, limit: Option<usize>) -> Result<usize, CycleError> {
        let mut completed = 0;
        loop {
            self.run_cycle()?;
            completed += 1;

            if limit.is_some_and(|limit| completed >= limit) {
                return Ok(completed);
            }

            info!(
                "Next speedtest in {} seconds",
                self.settings.test_interval.as_secs()
            );
            std::thread::sleep(self.settings.test_interval);
        }
    }

    fn try_cycle(&mut self) -> Result<MetricPoint, CycleError> {
        if !self.initialized {
            self.state = CycleState::Active(Stage::Init);
            info!("Initializing DB");
            ensure_database(&mut self.database, &self.settings.database_name)
                .map_err(CycleError::Connection)?;
            info!("DB initialization complete");
            self.initialized = true;
        }

        self.state = CycleState::Active(Stage::Measuring);
        info!("Running speedtest");
        let output = self
            .tool
            .run(self.settings.server_id.as_deref(), self.settings.verbose)
            .map_err(CycleError::Launch)?;
        if !output.success() {
            return Err(CycleError::Measurement {
                exit_code: output.exit_code,
                stdout: output.stdout_lossy().into_owned(),
                stderr: output.stderr_lossy().into_owned(),
            });
        }

        self.state = CycleState::Active(Stage::Mapping);
        let point = speedtest_model::decode(&output.stdout)?;
        info!("Speedtest successful");
        if self.settings.verbose {
            match serde_json::to_string(&point) {
                Ok(json) => info!("{json}"),
                Err(_) => info!("{point:?}"),
            }
        }

        self.state = CycleState::Active(Stage::Writing);
        info!("Writing data to DB");
        self.database
            .write_point(&point)
            .map_err(CycleError::Write)?;
        info!("Data written to DB successfully");

        Ok(point)
    }

    fn log_failure(&self, e: &CycleError) {
        if let CycleError::Measurement { stdout, stderr, .. } = e {
            error!("Speedtest failed");
            error!("{}", stderr.trim_end());
            info!("{}", stdout.trim_end());
        }

        error!(
            "{} failed: {}. Exiting, retry in {} seconds",
            e.stage(),
            e,
            e.retry_after(&self.settings).as_secs()
        );
    }
}
