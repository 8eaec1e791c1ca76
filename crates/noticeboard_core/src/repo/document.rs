//! Typed document values.
//!
//! # Responsibility
//! - Define the schema-flexible document shape stored in collections.
//! - Provide the backend-native `Timestamp` representation.
//!
//! # Invariants
//! - `Timestamp::nanos` is always a whole number of microseconds when built
//!   from a `DateTime`; the store keeps microsecond precision.
//! - Document ids are assigned by the repository, never by callers.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Store-assigned document identifier.
pub type DocumentId = Uuid;

/// Field map of one document, keyed by field name.
pub type DocumentFields = BTreeMap<String, FieldValue>;

const NANOS_PER_MICRO: u32 = 1_000;
const MICROS_PER_SECOND: i64 = 1_000_000;

/// Backend-native point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    /// Whole seconds since the Unix epoch.
    pub seconds: i64,
    /// Sub-second part, `0..1_000_000_000`.
    pub nanos: u32,
}

impl Timestamp {
    /// Converts a zoned date-time into a store timestamp, truncating to
    /// microseconds.
    pub fn from_datetime<Tz: TimeZone>(value: &DateTime<Tz>) -> Self {
        let utc = value.with_timezone(&Utc);
        Self {
            seconds: utc.timestamp(),
            nanos: utc.timestamp_subsec_micros() * NANOS_PER_MICRO,
        }
    }

    /// Converts back into a UTC date-time.
    ///
    /// Returns `None` when the stored value is outside chrono's range or
    /// carries an out-of-range `nanos` component.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.seconds, self.nanos)
    }

    /// Microseconds since the Unix epoch, the unit range filters compare in.
    pub fn as_micros(self) -> i64 {
        self.seconds
            .saturating_mul(MICROS_PER_SECOND)
            .saturating_add(i64::from(self.nanos / NANOS_PER_MICRO))
    }
}

/// One typed field value.
///
/// Range filters only match values of the same variant as the bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValue {
    Null,
    Boolean(bool),
    Integer(i64),
    String(String),
    Timestamp(Timestamp),
}

impl FieldValue {
    /// Returns the string payload for `String` values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Stable type label used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::String(_) => "string",
            Self::Timestamp(_) => "timestamp",
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<Timestamp> for FieldValue {
    fn from(value: Timestamp) -> Self {
        Self::Timestamp(value)
    }
}

/// A stored document: store-assigned id plus its typed fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: DocumentId,
    pub fields: DocumentFields,
}

impl Document {
    /// Looks up one field by name.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldValue, Timestamp};
    use chrono::{TimeZone, Utc};

    #[test]
    fn timestamp_truncates_to_microseconds() {
        let value = Utc
            .timestamp_opt(1_709_251_200, 123_456_789)
            .single()
            .expect("valid instant");
        let ts = Timestamp::from_datetime(&value);
        assert_eq!(ts.seconds, 1_709_251_200);
        assert_eq!(ts.nanos, 123_456_000);
        assert_eq!(ts.as_micros(), 1_709_251_200_123_456);
    }

    #[test]
    fn timestamp_micros_are_monotonic_before_epoch() {
        let earlier = Timestamp {
            seconds: -2,
            nanos: 999_999_000,
        };
        let later = Timestamp {
            seconds: -1,
            nanos: 0,
        };
        assert!(earlier.as_micros() < later.as_micros());
    }

    #[test]
    fn field_values_serialize_with_type_tags() {
        let encoded = serde_json::to_string(&FieldValue::from("hello")).unwrap();
        assert_eq!(encoded, r#"{"string":"hello"}"#);

        let ts = FieldValue::Timestamp(Timestamp {
            seconds: 10,
            nanos: 0,
        });
        let encoded = serde_json::to_string(&ts).unwrap();
        assert_eq!(encoded, r#"{"timestamp":{"seconds":10,"nanos":0}}"#);
    }
}
