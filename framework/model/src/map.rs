use crate::point::{MetricPoint, SpeedtestFields};
use crate::report::MeasurementReport;

/// Bandwidth is reported in bytes per second. The database stores megabits per second, which is
/// `bytes * 8 / 1_000_000`, or `bytes / 125_000`.
pub const BANDWIDTH_DIVISOR: f64 = 125_000.0;

/// Failed to turn the tool's output into a [MetricPoint].
///
/// Raised for malformed JSON, a missing required key, or a value of the wrong type.
#[derive(Debug, thiserror::Error)]
#[error("Invalid speedtest report: {0}")]
pub struct DecodeError(#[from] serde_json::Error);

/// Convert a bandwidth in bytes per second to the Mbps value stored in the database.
pub fn bandwidth_to_mbps(bytes_per_second: f64) -> f64 {
    bytes_per_second / BANDWIDTH_DIVISOR
}

/// Map a decoded report onto the fixed speedtest schema.
pub fn map(report: MeasurementReport) -> MetricPoint {
    let fields = SpeedtestFields {
        download_bandwidth: bandwidth_to_mbps(report.download.bandwidth),
        download_bytes: report.download.bytes,
        download_elapsed: report.download.elapsed,
        upload_bandwidth: bandwidth_to_mbps(report.upload.bandwidth),
        upload_bytes: report.upload.bytes,
        upload_elapsed: report.upload.elapsed,
        jitter: report.ping.jitter,
        latency: report.ping.latency,
        packet_loss: report.packet_loss.unwrap_or(0.0),
        interface_name: report.interface.name,
        testserver_id: report.server.id,
        testserver_name: report.server.name,
        testserver_host: report.server.host,
        testserver_ip: report.server.ip,
        testserver_location: report.server.location,
        testserver_country: report.server.country,
        isp: report.isp,
    };

    MetricPoint::new(report.timestamp, fields)
}

/// Decode the raw tool output and map it in one step.
///
/// Nothing is produced unless the whole report decodes.
pub fn decode(json: &[u8]) -> Result<MetricPoint, DecodeError> {
    Ok(map(MeasurementReport::from_json(json)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::{FieldValue, FIELD_COUNT};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn sample_report() -> Value {
        json!({
            "type": "result",
            "timestamp": "2024-03-01T10:00:00Z",
            "ping": { "jitter": 0.5, "latency": 8.25, "low": 8.5, "high": 9.9 },
            "download": { "bandwidth": 12_500_000, "bytes": 150_123_456, "elapsed": 12_008 },
            "upload": { "bandwidth": 2_500_000, "bytes": 30_456_789, "elapsed": 11_500 },
            "packetLoss": 0.5,
            "isp": "Example ISP",
            "interface": {
                "internalIp": "192.168.1.20",
                "name": "eth0",
                "macAddr": "00:11:22:33:44:55",
                "isVpn": false,
                "externalIp": "198.51.100.7"
            },
            "server": {
                "id": 41817,
                "host": "speedtest.example.net",
                "port": 8080,
                "name": "Example Networks",
                "location": "Amsterdam",
                "country": "Netherlands",
                "ip": "192.0.2.10"
            },
            "result": { "id": "abc", "url": "https://www.speedtest.net/result/c/abc", "persisted": true }
        })
    }

    fn decode_value(value: &Value) -> Result<MetricPoint, DecodeError> {
        decode(&serde_json::to_vec(value).unwrap())
    }

    #[test]
    fn bandwidth_divisor_converts_to_mbps() {
        assert_eq!(bandwidth_to_mbps(125_000.0), 1.0);
        assert_eq!(bandwidth_to_mbps(12_500_000.0), 100.0);
        assert_eq!(bandwidth_to_mbps(0.0), 0.0);
    }

    #[test]
    fn maps_complete_report() {
        let point = decode_value(&sample_report()).unwrap();

        assert_eq!(point.measurement(), "speedtest");
        assert_eq!(point.timestamp.to_rfc3339(), "2024-03-01T10:00:00+00:00");

        let fields = point.fields;
        assert_eq!(fields.download_bandwidth, 100.0);
        assert_eq!(fields.upload_bandwidth, 20.0);
        assert_eq!(fields.download_bytes, 150_123_456);
        assert_eq!(fields.download_elapsed, 12_008);
        assert_eq!(fields.upload_bytes, 30_456_789);
        assert_eq!(fields.upload_elapsed, 11_500);
        assert_eq!(fields.jitter, 0.5);
        assert_eq!(fields.latency, 8.25);
        assert_eq!(fields.packet_loss, 0.5);
        assert_eq!(fields.interface_name, "eth0");
        assert_eq!(fields.testserver_id, 41817);
        assert_eq!(fields.testserver_name, "Example Networks");
        assert_eq!(fields.testserver_host, "speedtest.example.net");
        assert_eq!(fields.testserver_ip, "192.0.2.10");
        assert_eq!(fields.testserver_location, "Amsterdam");
        assert_eq!(fields.testserver_country, "Netherlands");
        assert_eq!(fields.isp, "Example ISP");
    }

    #[test]
    fn produces_all_fields() {
        let point = decode_value(&sample_report()).unwrap();
        let entries = point.fields.entries();

        assert_eq!(entries.len(), FIELD_COUNT);
        assert_eq!(entries[0], ("download-bandwidth", FieldValue::Float(100.0)));
        assert_eq!(entries[16], ("isp", FieldValue::Text("Example ISP")));
    }

    #[test]
    fn missing_packet_loss_defaults_to_zero() {
        let mut report = sample_report();
        report.as_object_mut().unwrap().remove("packetLoss");

        let point = decode_value(&report).unwrap();
        assert_eq!(point.fields.packet_loss, 0.0);
    }

    #[test]
    fn integer_ping_values_become_floats() {
        let mut report = sample_report();
        report["ping"] = json!({ "jitter": 1, "latency": 9 });

        let point = decode_value(&report).unwrap();
        assert_eq!(point.fields.jitter, 1.0);
        assert_eq!(point.fields.latency, 9.0);
    }

    #[test]
    fn missing_required_key_fails() {
        for key in [
            "download",
            "upload",
            "ping",
            "server",
            "interface",
            "isp",
            "timestamp",
        ] {
            let mut report = sample_report();
            report.as_object_mut().unwrap().remove(key);

            assert!(
                decode_value(&report).is_err(),
                "report without `{key}` should not decode"
            );
        }
    }

    #[test]
    fn missing_nested_key_fails() {
        let mut report = sample_report();
        report["interface"].as_object_mut().unwrap().remove("name");
        assert!(decode_value(&report).is_err());

        let mut report = sample_report();
        report["server"].as_object_mut().unwrap().remove("country");
        assert!(decode_value(&report).is_err());

        let mut report = sample_report();
        report["download"].as_object_mut().unwrap().remove("bandwidth");
        assert!(decode_value(&report).is_err());
    }

    #[test]
    fn malformed_json_fails() {
        let err = decode(b"{\"timestamp\": ").unwrap_err();
        assert!(err.to_string().starts_with("Invalid speedtest report"));

        assert!(decode(b"").is_err());
        assert!(decode(b"[1, 2, 3]").is_err());
    }

    #[test]
    fn invalid_timestamp_fails() {
        let mut report = sample_report();
        report["timestamp"] = json!("yesterday");

        assert!(decode_value(&report).is_err());
    }
}
