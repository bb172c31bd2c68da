//! Timestamp fields as the backend sends them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A raw timestamp value: an ISO-8601 string or epoch milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimestampValue {
    Millis(i64),
    Text(String),
}

impl TimestampValue {
    /// Resolve to a UTC instant, `None` if the value is unparseable
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            TimestampValue::Millis(ms) => classgate_util::from_epoch_millis(*ms),
            TimestampValue::Text(s) => classgate_util::parse_timestamp(s),
        }
    }
}

impl From<DateTime<Utc>> for TimestampValue {
    fn from(dt: DateTime<Utc>) -> Self {
        TimestampValue::Text(dt.to_rfc3339())
    }
}

impl From<&str> for TimestampValue {
    fn from(s: &str) -> Self {
        TimestampValue::Text(s.to_string())
    }
}

/// Deserialize an optional timestamp field without ever failing the record.
///
/// Nulls, booleans, objects and other shapes become `None`.
pub fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<TimestampValue>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(TimestampValue::Text(s)),
        serde_json::Value::Number(n) => n.as_i64().map(TimestampValue::Millis),
        _ => None,
    })
}

/// Resolve an optional raw timestamp to a UTC instant
pub fn resolve_timestamp(value: Option<&TimestampValue>) -> Option<DateTime<Utc>> {
    value.and_then(TimestampValue::to_datetime)
}
