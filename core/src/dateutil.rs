//! Date and date-time conversions for the partner API's wire formats.
//!
//! # Design
//! The API mixes three date conventions:
//!
//! - timezone-less date-times such as `2024-10-08T00:00:00`
//!   ([`DATE_TIME_FORMAT`]), used by most record fields;
//! - date-only values such as `2024-10-08` ([`DATE_FORMAT`]), used by invoices;
//! - RFC3339 with a trailing `Z`, used only for request timestamps.
//!
//! The absent value is `None`. Two error policies coexist: the `parse_*`
//! functions surface malformed input as a [`DateParseError`], while the
//! `*_from_optional` helpers coerce absent, empty, and malformed values alike
//! to `None` so one garbled optional field never aborts a whole record.
//!
//! Parsing checks the fixed-width shape of the literal before handing it to
//! chrono, which on its own would also accept unpadded fields like `2024-1-8`
//! and a leap second `:60`.
//!
//! Only years 0000 through 9999 fit the four-digit wire year. Values outside
//! that range still format, but the result cannot be parsed back, so the
//! optional writers refuse them.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, SecondsFormat, Timelike, Utc};

use crate::error::DateParseError;

/// chrono pattern for date-time fields without timezone: `2024-10-08T00:00:00`.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// chrono pattern for date-only fields: `2024-10-08`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Literal shapes; `d` stands for an ASCII digit, everything else must match
/// byte for byte.
const DATE_TIME_SHAPE: &str = "dddd-dd-ddTdd:dd:dd";
const DATE_SHAPE: &str = "dddd-dd-dd";

fn matches_shape(input: &str, shape: &str) -> bool {
    input.len() == shape.len()
        && input.bytes().zip(shape.bytes()).all(|(b, s)| match s {
            b'd' => b.is_ascii_digit(),
            literal => b == literal,
        })
}

/// Parse a date-time literal like `2024-10-08T00:00:00`.
///
/// An empty string is not an error and yields `Ok(None)`.
pub fn parse_date_time(input: &str) -> Result<Option<NaiveDateTime>, DateParseError> {
    if input.is_empty() {
        return Ok(None);
    }
    if !matches_shape(input, DATE_TIME_SHAPE) {
        return Err(DateParseError::Malformed {
            input: input.to_string(),
            expected: "YYYY-MM-DDTHH:MM:SS",
        });
    }
    let t = NaiveDateTime::parse_from_str(input, DATE_TIME_FORMAT).map_err(|source| {
        DateParseError::OutOfRange {
            input: input.to_string(),
            reason: source.to_string(),
        }
    })?;
    // chrono reads second 60 as a leap second; the wire clock stops at 59.
    if t.nanosecond() >= 1_000_000_000 {
        return Err(DateParseError::OutOfRange {
            input: input.to_string(),
            reason: "second must be below 60".to_string(),
        });
    }
    Ok(Some(t))
}

/// Parse a date literal like `2024-10-08`.
///
/// An empty string is not an error and yields `Ok(None)`.
pub fn parse_date(input: &str) -> Result<Option<NaiveDate>, DateParseError> {
    if input.is_empty() {
        return Ok(None);
    }
    if !matches_shape(input, DATE_SHAPE) {
        return Err(DateParseError::Malformed {
            input: input.to_string(),
            expected: "YYYY-MM-DD",
        });
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .map(Some)
        .map_err(|source| DateParseError::OutOfRange {
            input: input.to_string(),
            reason: source.to_string(),
        })
}

fn has_wire_year(year: i32) -> bool {
    (0..=9999).contains(&year)
}

/// Format a date-time in the API's timezone-less form. `None` formats as `""`.
///
/// Sub-second precision is dropped. Years outside 0000-9999 format with a
/// sign or a fifth digit that [`parse_date_time`] rejects.
pub fn format_date_time(value: Option<NaiveDateTime>) -> String {
    match value {
        Some(t) => t.format(DATE_TIME_FORMAT).to_string(),
        None => String::new(),
    }
}

/// Format a date in the API's date-only form. `None` formats as `""`.
///
/// Same year range caveat as [`format_date_time`].
pub fn format_date(value: Option<NaiveDate>) -> String {
    match value {
        Some(d) => d.format(DATE_FORMAT).to_string(),
        None => String::new(),
    }
}

/// Convert a date-time into an optional wire string for a nullable field.
///
/// A year outside 0000-9999 has no wire form and yields `None`.
pub fn optional_from_date_time(value: Option<NaiveDateTime>) -> Option<String> {
    value
        .filter(|t| has_wire_year(t.year()))
        .map(|t| format_date_time(Some(t)))
}

/// Convert a date into an optional wire string for a nullable field.
///
/// A year outside 0000-9999 has no wire form and yields `None`.
pub fn optional_from_date(value: Option<NaiveDate>) -> Option<String> {
    value
        .filter(|d| has_wire_year(d.year()))
        .map(|d| format_date(Some(d)))
}

/// Read a nullable date-time field. Absent, empty, and malformed values all
/// become `None`.
pub fn date_time_from_optional(value: Option<&str>) -> Option<NaiveDateTime> {
    let raw = value.filter(|s| !s.is_empty())?;
    match parse_date_time(raw) {
        Ok(t) => t,
        Err(err) => {
            tracing::debug!("ignoring unparseable date-time field: {err}");
            None
        }
    }
}

/// Read a nullable date field. Absent, empty, and malformed values all
/// become `None`.
pub fn date_from_optional(value: Option<&str>) -> Option<NaiveDate> {
    let raw = value.filter(|s| !s.is_empty())?;
    match parse_date(raw) {
        Ok(d) => d,
        Err(err) => {
            tracing::debug!("ignoring unparseable date field: {err}");
            None
        }
    }
}

/// Format a request timestamp as RFC3339 with whole seconds and a `Z` suffix:
/// `2024-10-08T00:00:00Z`.
pub fn format_rfc3339(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Serde adapter for `DateTime<Utc>` request fields, written with
/// [`format_rfc3339`] and read with any RFC3339 offset.
pub mod rfc3339 {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_rfc3339(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|t| t.with_timezone(&Utc))
            .map_err(de::Error::custom)
    }
}
