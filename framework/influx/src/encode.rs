use crate::DatabaseError;
use influxdb::{InfluxDbWriteable, Timestamp, WriteQuery};
use speedtest_model::{FieldValue, MetricPoint};

/// Build the write query for a single point, stamped with the time of the measurement.
pub(crate) fn into_write_query(point: &MetricPoint) -> Result<WriteQuery, DatabaseError> {
    let nanos = point
        .timestamp
        .timestamp_nanos_opt()
        .and_then(|n| u128::try_from(n).ok())
        .ok_or(DatabaseError::Timestamp(point.timestamp))?;

    let mut query = Timestamp::Nanoseconds(nanos).into_query(point.measurement());
    for (key, value) in point.fields.entries() {
        query = query.add_field(key, value.into_type());
    }

    Ok(query)
}

trait FieldValueExt {
    fn into_type(self) -> influxdb::Type;
}

impl FieldValueExt for FieldValue<'_> {
    fn into_type(self) -> influxdb::Type {
        match self {
            FieldValue::Float(f) => influxdb::Type::Float(f),
            FieldValue::SignedInteger(i) => influxdb::Type::SignedInteger(i),
            FieldValue::UnsignedInteger(u) => influxdb::Type::UnsignedInteger(u),
            FieldValue::Text(s) => influxdb::Type::Text(s.to_string()),
        }
    }
}
