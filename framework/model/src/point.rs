use chrono::{DateTime, Utc};
use serde::Serialize;

/// The measurement name every speedtest point is written under.
pub const MEASUREMENT_NAME: &str = "speedtest";

/// The number of fields in a [SpeedtestFields] set.
pub const FIELD_COUNT: usize = 17;

/// A single time-series point, ready to be written to the database.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricPoint {
    measurement: &'static str,
    pub timestamp: DateTime<Utc>,
    pub fields: SpeedtestFields,
}

impl MetricPoint {
    pub fn new(timestamp: DateTime<Utc>, fields: SpeedtestFields) -> Self {
        Self {
            measurement: MEASUREMENT_NAME,
            timestamp,
            fields,
        }
    }

    pub fn measurement(&self) -> &'static str {
        self.measurement
    }
}

/// The fixed field set of a speedtest point.
///
/// Serialized names match the field keys stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SpeedtestFields {
    pub download_bandwidth: f64,
    pub download_bytes: u64,
    pub download_elapsed: u64,
    pub upload_bandwidth: f64,
    pub upload_bytes: u64,
    pub upload_elapsed: u64,
    pub jitter: f64,
    pub latency: f64,
    #[serde(rename = "packetloss")]
    pub packet_loss: f64,
    pub interface_name: String,
    pub testserver_id: i64,
    pub testserver_name: String,
    pub testserver_host: String,
    pub testserver_ip: String,
    pub testserver_location: String,
    pub testserver_country: String,
    pub isp: String,
}

/// A typed field value, borrowed from a [SpeedtestFields].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Float(f64),
    UnsignedInteger(u64),
    SignedInteger(i64),
    Text(&'a str),
}

impl SpeedtestFields {
    /// All fields as `(key, value)` pairs, in schema order.
    pub fn entries(&self) -> [(&'static str, FieldValue<'_>); FIELD_COUNT] {
        use FieldValue::*;

        [
            ("download-bandwidth", Float(self.download_bandwidth)),
            ("download-bytes", UnsignedInteger(self.download_bytes)),
            ("download-elapsed", UnsignedInteger(self.download_elapsed)),
            ("upload-bandwidth", Float(self.upload_bandwidth)),
            ("upload-bytes", UnsignedInteger(self.upload_bytes)),
            ("upload-elapsed", UnsignedInteger(self.upload_elapsed)),
            ("jitter", Float(self.jitter)),
            ("latency", Float(self.latency)),
            ("packetloss", Float(self.packet_loss)),
            ("interface-name", Text(&self.interface_name)),
            ("testserver-id", SignedInteger(self.testserver_id)),
            ("testserver-name", Text(&self.testserver_name)),
            ("testserver-host", Text(&self.testserver_host)),
            ("testserver-ip", Text(&self.testserver_ip)),
            ("testserver-location", Text(&self.testserver_location)),
            ("testserver-country", Text(&self.testserver_country)),
            ("isp", Text(&self.isp)),
        ]
    }
}
