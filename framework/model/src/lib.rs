//! Types for the speedtest report and the point it becomes in the time-series database.

mod map;
mod point;
mod report;

pub use map::{bandwidth_to_mbps, decode, map, DecodeError, BANDWIDTH_DIVISOR};
pub use point::{FieldValue, MetricPoint, SpeedtestFields, FIELD_COUNT, MEASUREMENT_NAME};
pub use report::{Interface, MeasurementReport, Ping, Server, Transfer};
