use std::borrow::Cow;
use std::path::PathBuf;
use std::process::Command;

/// What one run of the measurement tool produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasurementOutput {
    /// Exit code of the tool, or `-1` if it was killed by a signal.
    pub exit_code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl MeasurementOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    pub fn stdout_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }

    pub fn stderr_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stderr)
    }
}

/// Something that can take a speed measurement.
pub trait MeasurementTool {
    /// Run a single measurement and wait for it to finish.
    ///
    /// Only fails if the tool could not be started, the exit code is left for the caller to judge.
    fn run(&self, server_id: Option<&str>, verbose: bool) -> std::io::Result<MeasurementOutput>;
}

/// The Ookla `speedtest` CLI, run as a subprocess.
pub struct Speedtest {
    binary: PathBuf,
}

impl Speedtest {
    pub fn new<P>(binary: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Speedtest {
            binary: binary.into(),
        }
    }

    /// The command for a non-interactive run with JSON output.
    pub fn command(&self, server_id: Option<&str>) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .arg("--accept-license")
            .arg("--accept-gdpr")
            .arg("-f")
            .arg("json");
        if let Some(server_id) = server_id {
            command.arg("-s").arg(server_id);
        }
        command
    }
}

impl MeasurementTool for Speedtest {
    fn run(&self, server_id: Option<&str>, verbose: bool) -> std::io::Result<MeasurementOutput> {
        let mut command = self.command(server_id);
        if verbose {
            info!("Executing {command:?}");
        }

        let output = command.output()?;
        debug!("Speedtest process finished with status: {}", output.status);

        Ok(MeasurementOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}
