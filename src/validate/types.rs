//! Validation outcome types

use crate::types::JsonObject;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Keys every log record must carry
pub const REQUIRED_FIELDS: [&str; 3] = ["timestamp", "user_id", "action"];

/// Why a line was rejected
///
/// Variants are listed in the order the validator checks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectionReason {
    /// The line is not valid JSON
    #[serde(rename = "Invalid JSON")]
    InvalidJson,
    /// One or more required keys are absent
    #[serde(rename = "Missing fields")]
    MissingFields,
    /// `timestamp` is not `YYYY-MM-DDTHH:MM:SSZ`
    #[serde(rename = "Invalid timestamp format")]
    InvalidTimestampFormat,
}

impl RejectionReason {
    /// All reasons, in check order
    pub const ALL: [RejectionReason; 3] = [
        RejectionReason::InvalidJson,
        RejectionReason::MissingFields,
        RejectionReason::InvalidTimestampFormat,
    ];

    /// The message written to the error journal
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::InvalidJson => "Invalid JSON",
            RejectionReason::MissingFields => "Missing fields",
            RejectionReason::InvalidTimestampFormat => "Invalid timestamp format",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A log record that passed validation
///
/// `timestamp` always holds the canonical `YYYY-MM-DD HH:MM:SS` form and
/// `day_of_week` always names the weekday of that timestamp. Other keys keep
/// the order and values they had in the source line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NormalizedRecord {
    fields: JsonObject,
}

impl NormalizedRecord {
    /// Only the validator builds records, so the timestamp invariant holds.
    pub(super) fn from_validated(fields: JsonObject) -> Self {
        Self { fields }
    }

    /// Canonical timestamp (`YYYY-MM-DD HH:MM:SS`, UTC)
    pub fn timestamp(&self) -> &str {
        self.str_field("timestamp")
    }

    /// Full English weekday name of the timestamp
    pub fn day_of_week(&self) -> &str {
        self.str_field("day_of_week")
    }

    /// The `user_id` value as it appeared in the source
    pub fn user_id(&self) -> &Value {
        self.fields.get("user_id").unwrap_or(&Value::Null)
    }

    /// The `action` value as it appeared in the source
    pub fn action(&self) -> &Value {
        self.fields.get("action").unwrap_or(&Value::Null)
    }

    /// Look up any field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// All fields in source order
    pub fn fields(&self) -> &JsonObject {
        &self.fields
    }

    /// Convert into a plain JSON object value
    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    fn str_field(&self, key: &str) -> &str {
        self.fields.get(key).and_then(Value::as_str).unwrap_or_default()
    }
}

impl From<NormalizedRecord> for Value {
    fn from(record: NormalizedRecord) -> Self {
        record.into_value()
    }
}
