use speedtest_influx::ConnectionOptions;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_DB_ADDRESS: &str = "db_hostname.network";
pub const DEFAULT_DB_PORT: u16 = 8086;
pub const DEFAULT_DB_USER: &str = "db_username";
pub const DEFAULT_DB_PASSWORD: &str = "db_password";
pub const DEFAULT_DB_DATABASE: &str = "speedtest_db";
pub const DEFAULT_DB_RETRY_INTERVAL_S: u64 = 60;
pub const DEFAULT_TEST_INTERVAL_S: u64 = 1800;
pub const DEFAULT_TEST_FAIL_INTERVAL_S: u64 = 60;
pub const DEFAULT_TEST_SERVER_ID: &str = "41817";
pub const DEFAULT_SPEEDTEST_BINARY: &str = "speedtest";

/// Settings for the logger, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub connection: ConnectionOptions,
    pub database_name: String,
    /// How long a supervisor should wait before restarting after the database was unavailable.
    pub db_retry_interval: Duration,
    /// Time between measurements when running as a service.
    pub test_interval: Duration,
    /// How long a supervisor should wait before restarting after a failed measurement or write.
    pub test_fail_interval: Duration,
    /// Speedtest server to measure against. `None` lets the tool pick the closest server.
    pub server_id: Option<String>,
    pub speedtest_binary: PathBuf,
    /// Log every point before it is written.
    pub verbose: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value `{value}` for `{key}`: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error(
        "Failed to read config file {} (expected `KEY=value` lines without sections): {source}",
        path.display()
    )]
    File {
        path: PathBuf,
        #[source]
        source: dotenv::Error,
    },
}

impl Settings {
    /// Resolve settings through `lookup`, which returns the raw value for a key if it is set.
    ///
    /// Where a setting has two accepted keys, the first one listed wins.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let connection = ConnectionOptions {
            address: value(&lookup, &["DB_ADDRESS", "DB_HOST"], DEFAULT_DB_ADDRESS),
            port: parse(&lookup, "DB_PORT", DEFAULT_DB_PORT)?,
            username: value(&lookup, &["DB_USER", "DB_USERNAME"], DEFAULT_DB_USER),
            password: value(&lookup, &["DB_PASSWORD"], DEFAULT_DB_PASSWORD),
        };

        let server_id = match lookup("TEST_SERVER_ID") {
            Some(id) if id.trim().is_empty() => None,
            Some(id) => Some(id.trim().to_string()),
            None => Some(DEFAULT_TEST_SERVER_ID.to_string()),
        };

        Ok(Self {
            connection,
            database_name: value(&lookup, &["DB_DATABASE"], DEFAULT_DB_DATABASE),
            db_retry_interval: seconds(
                &lookup,
                "DB_RETRY_INVERVAL",
                DEFAULT_DB_RETRY_INTERVAL_S,
            )?,
            test_interval: seconds(&lookup, "TEST_INTERVAL", DEFAULT_TEST_INTERVAL_S)?,
            test_fail_interval: seconds(
                &lookup,
                "TEST_FAIL_INTERVAL",
                DEFAULT_TEST_FAIL_INTERVAL_S,
            )?,
            server_id,
            speedtest_binary: value(&lookup, &["SPEEDTEST_BINARY"], DEFAULT_SPEEDTEST_BINARY)
                .into(),
            verbose: false,
        })
    }

    /// Read settings from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings from a `KEY=value` file.
    ///
    /// Keys missing from the file fall back to the environment, then to the defaults.
    pub fn from_file<P>(path: P) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let file_error = |source| ConfigError::File {
            path: path.to_path_buf(),
            source,
        };

        let values = dotenv::from_path_iter(path)
            .map_err(file_error)?
            .collect::<Result<HashMap<String, String>, _>>()
            .map_err(file_error)?;
        log::debug!("Read {} settings from {}", values.len(), path.display());

        Self::from_lookup(|key| {
            values
                .get(key)
                .cloned()
                .or_else(|| std::env::var(key).ok())
        })
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

fn value<F>(lookup: &F, keys: &[&str], default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    keys.iter()
        .find_map(|&key| lookup(key))
        .unwrap_or_else(|| default.to_string())
}

fn parse<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn seconds<F>(lookup: &F, key: &'static str, default: u64) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    parse(lookup, key, default).map(Duration::from_secs)
}
