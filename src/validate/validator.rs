//! Line validator

use super::types::{NormalizedRecord, RejectionReason, REQUIRED_FIELDS};
use chrono::{NaiveDateTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Accepted input timestamp layout (UTC, `Z` suffix only)
pub const INPUT_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Layout written back into valid records
pub const CANONICAL_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// chrono alone accepts unpadded fields and signed years
static TIMESTAMP_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}Z$").expect("valid timestamp regex")
});

/// Parse a strict `YYYY-MM-DDTHH:MM:SSZ` timestamp
///
/// Returns `None` for any other shape, for impossible calendar values, and
/// for leap seconds.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    if !TIMESTAMP_SHAPE.is_match(value) {
        return None;
    }
    let parsed = NaiveDateTime::parse_from_str(value, INPUT_TIMESTAMP_FORMAT).ok()?;
    if parsed.nanosecond() >= 1_000_000_000 {
        return None;
    }
    Some(parsed)
}

/// Validate and normalize a single raw line
///
/// Deterministic and total: every input yields exactly one outcome.
pub fn validate(line: &str) -> Result<NormalizedRecord, RejectionReason> {
    let value: Value = serde_json::from_str(line).map_err(|_| RejectionReason::InvalidJson)?;

    // Valid JSON that is not an object has no keys to find
    let Value::Object(mut fields) = value else {
        return Err(RejectionReason::MissingFields);
    };

    if !REQUIRED_FIELDS.iter().all(|key| fields.contains_key(*key)) {
        return Err(RejectionReason::MissingFields);
    }

    let parsed = fields
        .get("timestamp")
        .and_then(Value::as_str)
        .and_then(parse_timestamp)
        .ok_or(RejectionReason::InvalidTimestampFormat)?;

    fields.insert(
        "timestamp".to_string(),
        Value::String(parsed.format(CANONICAL_TIMESTAMP_FORMAT).to_string()),
    );
    fields.insert(
        "day_of_week".to_string(),
        Value::String(parsed.format("%A").to_string()),
    );

    Ok(NormalizedRecord::from_validated(fields))
}
