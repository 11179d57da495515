//! Error types for the HawkSoft partner API client.
//!
//! # Design
//! `NotFound` and `Unauthorized` get dedicated variants because callers
//! routinely branch on "the record does not exist" and "the credentials were
//! rejected." All other unexpected statuses land in `HttpError` with the raw
//! status code and body for debugging.
//!
//! Date parsing has its own error type since the date helpers are used by
//! model accessors with no HTTP round-trip involved.

use thiserror::Error;

/// Errors returned by `HawkSoftClient` build and parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404: the agency or client does not exist or is
    /// not subscribed.
    #[error("resource not found")]
    NotFound,

    /// The server returned 401: missing or rejected Basic credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// The server returned a status other than the expected one, 401 or 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),
}

/// A wire date or date-time literal that could not be parsed.
#[derive(Debug, Error)]
pub enum DateParseError {
    /// The literal does not have the fixed-width shape of the format.
    #[error("malformed date {input:?}: expected {expected}")]
    Malformed {
        input: String,
        expected: &'static str,
    },

    /// The literal is well-shaped but names an impossible calendar value,
    /// such as month 13, February 30 or second 60.
    #[error("date {input:?} out of range: {reason}")]
    OutOfRange { input: String, reason: String },
}
