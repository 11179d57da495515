//! Verify the date helpers against JSON test vectors stored in `test-vectors/`.
//!
//! Each case names an input literal and either the expected calendar fields,
//! `null` for the absent value, or the expected error kind. Successful cases
//! must also re-format to the identical literal, and every case must read
//! through the optional helpers without raising an error.

use chrono::{NaiveDate, NaiveDateTime};
use hawksoft_core::dateutil::{
    date_from_optional, date_time_from_optional, format_date, format_date_time, parse_date,
    parse_date_time,
};
use hawksoft_core::DateParseError;

fn vectors() -> serde_json::Value {
    let raw = include_str!("../../test-vectors/dates.json");
    serde_json::from_str(raw).unwrap()
}

fn fields(value: &serde_json::Value) -> Vec<u32> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_u64().unwrap() as u32)
        .collect()
}

fn assert_error_kind(name: &str, err: &DateParseError, expected: &str) {
    match expected {
        "Malformed" => assert!(matches!(err, DateParseError::Malformed { .. }), "{name}: {err}"),
        "OutOfRange" => assert!(matches!(err, DateParseError::OutOfRange { .. }), "{name}: {err}"),
        other => panic!("{name}: unknown expected error: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Date-time
// ---------------------------------------------------------------------------

#[test]
fn date_time_test_vectors() {
    let vectors = vectors();
    for case in vectors["date_time"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = case["input"].as_str().unwrap();
        let result = parse_date_time(input);

        if let Some(expected_error) = case.get("error") {
            let err = result.unwrap_err();
            assert_error_kind(name, &err, expected_error.as_str().unwrap());
            assert_eq!(date_time_from_optional(Some(input)), None, "{name}: optional");
            continue;
        }

        let parsed = result.unwrap();
        let expected: Option<NaiveDateTime> = if case["expected"].is_null() {
            None
        } else {
            let f = fields(&case["expected"]);
            NaiveDate::from_ymd_opt(f[0] as i32, f[1], f[2])
                .and_then(|d| d.and_hms_opt(f[3], f[4], f[5]))
        };
        assert_eq!(parsed, expected, "{name}: parsed");
        assert_eq!(format_date_time(parsed), input, "{name}: re-format");
        assert_eq!(date_time_from_optional(Some(input)), expected, "{name}: optional");
    }
}

// ---------------------------------------------------------------------------
// Date
// ---------------------------------------------------------------------------

#[test]
fn date_test_vectors() {
    let vectors = vectors();
    for case in vectors["date"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = case["input"].as_str().unwrap();
        let result = parse_date(input);

        if let Some(expected_error) = case.get("error") {
            let err = result.unwrap_err();
            assert_error_kind(name, &err, expected_error.as_str().unwrap());
            assert_eq!(date_from_optional(Some(input)), None, "{name}: optional");
            continue;
        }

        let parsed = result.unwrap();
        let expected: Option<NaiveDate> = if case["expected"].is_null() {
            None
        } else {
            let f = fields(&case["expected"]);
            NaiveDate::from_ymd_opt(f[0] as i32, f[1], f[2])
        };
        assert_eq!(parsed, expected, "{name}: parsed");
        assert_eq!(format_date(parsed), input, "{name}: re-format");
        assert_eq!(date_from_optional(Some(input)), expected, "{name}: optional");
    }
}
