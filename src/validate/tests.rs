//! Tests for validate module

use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

// ============================================================================
// Accepted Lines
// ============================================================================

#[test]
fn test_valid_login_record() {
    let record =
        validate(r#"{"timestamp":"2025-09-07T10:01:15Z","user_id":"U1","action":"login"}"#)
            .unwrap();

    assert_eq!(
        record.into_value(),
        json!({
            "timestamp": "2025-09-07 10:01:15",
            "user_id": "U1",
            "action": "login",
            "day_of_week": "Sunday"
        })
    );
}

#[test]
fn test_accessors() {
    let record =
        validate(r#"{"timestamp":"2024-02-29T23:59:59Z","user_id":42,"action":"logout"}"#)
            .unwrap();

    assert_eq!(record.timestamp(), "2024-02-29 23:59:59");
    assert_eq!(record.day_of_week(), "Thursday");
    assert_eq!(record.user_id(), &json!(42));
    assert_eq!(record.action(), &json!("logout"));
}

#[test]
fn test_extra_fields_pass_through_in_order() {
    let record = validate(
        r#"{"ip":"10.0.0.1","timestamp":"2025-01-01T00:00:00Z","user_id":"U9","action":"view","meta":{"page":3}}"#,
    )
    .unwrap();

    let keys: Vec<&str> = record.fields().keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec!["ip", "timestamp", "user_id", "action", "meta", "day_of_week"]
    );
    assert_eq!(record.get("meta"), Some(&json!({"page": 3})));
    assert_eq!(record.day_of_week(), "Wednesday");
}

#[test]
fn test_existing_day_of_week_is_overwritten() {
    let record = validate(
        r#"{"timestamp":"2025-09-08T08:00:00Z","user_id":"U1","action":"login","day_of_week":"Funday"}"#,
    )
    .unwrap();
    assert_eq!(record.day_of_week(), "Monday");
    assert_eq!(record.fields().len(), 4);
}

#[test]
fn test_surrounding_whitespace_is_tolerated() {
    let record =
        validate("  {\"timestamp\":\"2025-09-07T10:01:15Z\",\"user_id\":\"U1\",\"action\":\"login\"}\r")
            .unwrap();
    assert_eq!(record.timestamp(), "2025-09-07 10:01:15");
}

#[test]
fn test_null_user_id_counts_as_present() {
    let record =
        validate(r#"{"timestamp":"2025-09-07T10:01:15Z","user_id":null,"action":"login"}"#)
            .unwrap();
    assert_eq!(record.user_id(), &serde_json::Value::Null);
}

#[test]
fn test_validate_is_deterministic() {
    let line = r#"{"timestamp":"2025-09-07T10:01:15Z","user_id":"U1","action":"login"}"#;
    assert_eq!(validate(line), validate(line));
}

// ============================================================================
// Rejected Lines
// ============================================================================

#[test_case("not json" ; "plain text")]
#[test_case("{\"timestamp\":" ; "truncated object")]
#[test_case("{'timestamp':'2025-09-07T10:01:15Z'}" ; "single quotes")]
#[test_case("{} {}" ; "trailing content")]
fn test_invalid_json(line: &str) {
    assert_eq!(validate(line), Err(RejectionReason::InvalidJson));
}

#[test_case(r#"{"user_id":"U3","action":"login"}"# ; "no timestamp")]
#[test_case(r#"{"timestamp":"2025-09-07T10:01:15Z","action":"login"}"# ; "no user_id")]
#[test_case(r#"{"timestamp":"2025-09-07T10:01:15Z","user_id":"U1"}"# ; "no action")]
#[test_case(r#"{}"# ; "empty object")]
#[test_case(r#"["timestamp","user_id","action"]"# ; "array")]
#[test_case(r#""timestamp""# ; "string")]
#[test_case("42" ; "number")]
fn test_missing_fields(line: &str) {
    assert_eq!(validate(line), Err(RejectionReason::MissingFields));
}

#[test_case("invalid" ; "free text")]
#[test_case("2025-09-07 10:01:15" ; "already canonical")]
#[test_case("2025-09-07T10:01:15" ; "no zone")]
#[test_case("2025-09-07T10:01:15+00:00" ; "numeric offset")]
#[test_case("2025-09-07T10:01:15.123Z" ; "fractional seconds")]
#[test_case("2025-9-7T10:01:15Z" ; "unpadded date")]
#[test_case("2025-02-30T10:01:15Z" ; "impossible date")]
#[test_case("2025-09-07T24:00:00Z" ; "hour out of range")]
#[test_case("2025-12-31T23:59:60Z" ; "leap second")]
#[test_case("" ; "empty")]
fn test_invalid_timestamp(timestamp: &str) {
    let line = json!({"timestamp": timestamp, "user_id": "U2", "action": "logout"}).to_string();
    assert_eq!(validate(&line), Err(RejectionReason::InvalidTimestampFormat));
}

#[test]
fn test_non_string_timestamp_is_invalid_format() {
    let line = r#"{"timestamp":1757239275,"user_id":"U2","action":"logout"}"#;
    assert_eq!(validate(line), Err(RejectionReason::InvalidTimestampFormat));
}

#[test]
fn test_missing_fields_checked_before_timestamp() {
    let line = r#"{"timestamp":"invalid","action":"logout"}"#;
    assert_eq!(validate(line), Err(RejectionReason::MissingFields));
}

// ============================================================================
// Helpers
// ============================================================================

#[test]
fn test_parse_timestamp() {
    let parsed = parse_timestamp("2025-09-07T10:01:15Z").unwrap();
    assert_eq!(
        parsed.format(CANONICAL_TIMESTAMP_FORMAT).to_string(),
        "2025-09-07 10:01:15"
    );
    assert!(parse_timestamp("+2025-09-07T10:01:15Z").is_none());
}

#[test]
fn test_rejection_reason_strings() {
    assert_eq!(RejectionReason::InvalidJson.to_string(), "Invalid JSON");
    assert_eq!(RejectionReason::MissingFields.to_string(), "Missing fields");
    assert_eq!(
        RejectionReason::InvalidTimestampFormat.to_string(),
        "Invalid timestamp format"
    );
    for reason in RejectionReason::ALL {
        assert_eq!(
            serde_json::to_value(reason).unwrap(),
            json!(reason.as_str())
        );
    }
}
