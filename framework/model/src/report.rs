use chrono::{DateTime, Utc};
use serde::Deserialize;

/// The JSON report printed by `speedtest --format json`.
///
/// Only the parts of the report that end up in a [MetricPoint](crate::MetricPoint) are modelled.
/// Everything else the tool prints, such as the result URL or the interface MAC address, is
/// ignored while decoding.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MeasurementReport {
    /// When the measurement was taken, as an ISO-8601 instant.
    pub timestamp: DateTime<Utc>,
    pub ping: Ping,
    pub download: Transfer,
    pub upload: Transfer,
    /// Percentage of packets lost during the test.
    ///
    /// The tool leaves this out when it could not measure any loss.
    #[serde(rename = "packetLoss", default)]
    pub packet_loss: Option<f64>,
    pub isp: String,
    pub interface: Interface,
    pub server: Server,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Ping {
    pub jitter: f64,
    pub latency: f64,
}

/// One direction of the bandwidth test.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Transfer {
    /// Bytes per second.
    pub bandwidth: f64,
    /// Total bytes transferred.
    pub bytes: u64,
    /// Duration of the transfer in milliseconds.
    pub elapsed: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Interface {
    pub name: String,
}

/// The test server the measurement ran against.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Server {
    pub id: i64,
    pub name: String,
    pub host: String,
    pub ip: String,
    pub location: String,
    pub country: String,
}

impl MeasurementReport {
    /// Decode a report from the raw stdout of the measurement tool.
    pub fn from_json(json: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(json)
    }
}
