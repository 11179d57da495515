//! Synchronous client core for the HawkSoft partner API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip, making the core fully deterministic and testable.
//!
//! # Design
//! - `HawkSoftClient` is stateless: it holds only the base URL, credentials
//!   and API version.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - `dateutil` owns the API's date wire formats; models expose typed date
//!   accessors on top of their raw wire strings.

pub mod client;
pub mod dateutil;
pub mod error;
pub mod http;
pub mod types;

pub use client::{HawkSoftClient, DEFAULT_API_VERSION, DEFAULT_BASE_URL};
pub use error::{ApiError, DateParseError};
pub use http::{BasicAuth, HttpMethod, HttpRequest, HttpResponse};
pub use types::{
    Claim, ClientData, ClientDetails, Contact, Invoice, Lob, LogNote, Office, Person, Policy,
    Receipt,
};
