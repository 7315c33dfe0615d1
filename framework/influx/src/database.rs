use chrono::{DateTime, Utc};
use speedtest_model::MetricPoint;

/// The operations the logger needs from a time-series database.
///
/// Calls block until the database responds. Implementations are used from a single thread, one
/// call at a time.
pub trait Database {
    /// Names of all databases on the server.
    fn list_databases(&mut self) -> Result<Vec<String>, DatabaseError>;

    fn create_database(&mut self, name: &str) -> Result<(), DatabaseError>;

    /// Make `name` the target for subsequent writes.
    fn use_database(&mut self, name: &str) -> Result<(), DatabaseError>;

    fn write_point(&mut self, point: &MetricPoint) -> Result<(), DatabaseError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("InfluxDB request failed: {0}")]
    Request(#[from] influxdb::Error),
    #[error("InfluxDB returned an error: {0}")]
    Server(String),
    #[error("Unexpected response from InfluxDB: {0}")]
    Response(String),
    #[error("No database selected for writing")]
    NoDatabase,
    #[error("Timestamp {0} is outside the range InfluxDB can store")]
    Timestamp(DateTime<Utc>),
    #[error("Failed to start the database client runtime: {0}")]
    Runtime(#[from] std::io::Error),
}
