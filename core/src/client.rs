//! Stateless HTTP request builder and response parser for the HawkSoft
//! partner API.
//!
//! # Design
//! `HawkSoftClient` holds only a base URL, the partner credentials and the
//! API version, and carries no mutable state between calls. Each operation
//! is split into a `build_*` method that produces an `HttpRequest` and a
//! `parse_*` method that consumes an `HttpResponse`. The caller executes the
//! actual HTTP round-trip, keeping the core deterministic and free of I/O
//! dependencies.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::dateutil::format_rfc3339;
use crate::error::ApiError;
use crate::http::{BasicAuth, HttpMethod, HttpRequest, HttpResponse};
use crate::types::{ClientData, LogNote, Office, Receipt};

/// Production endpoint of the partner API.
pub const DEFAULT_BASE_URL: &str = "https://partner.hawksoft.app/v3";

/// Value sent in the mandatory `version` query parameter.
pub const DEFAULT_API_VERSION: &str = "3.0";

/// Synchronous, stateless client for the HawkSoft partner API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. The caller is responsible for executing the HTTP
/// round-trip between `build_*` and `parse_*`.
#[derive(Debug, Clone)]
pub struct HawkSoftClient {
    base_url: String,
    auth: BasicAuth,
    version: String,
}

impl HawkSoftClient {
    pub fn new(base_url: &str, auth: BasicAuth) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
            version: DEFAULT_API_VERSION.to_string(),
        }
    }

    /// Override the `version` query parameter sent with every request.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // --- agencies ---

    /// List the ids of agencies subscribed to this partner.
    pub fn build_get_agencies(&self) -> HttpRequest {
        self.get("/vendor/agencies", &[])
    }

    pub fn parse_get_agencies(&self, response: HttpResponse) -> Result<Vec<i64>, ApiError> {
        parse_json(response, 200)
    }

    pub fn build_get_agency_offices(&self, agency_id: i64) -> HttpRequest {
        self.get(&format!("/vendor/agency/{agency_id}/offices"), &[])
    }

    pub fn parse_get_agency_offices(&self, response: HttpResponse) -> Result<Vec<Office>, ApiError> {
        parse_json(response, 200)
    }

    // --- clients ---

    /// List ids of clients changed since `as_of`, sent as RFC3339 with `Z`.
    pub fn build_get_changed_clients(&self, agency_id: i64, as_of: DateTime<Utc>) -> HttpRequest {
        self.get(
            &format!("/vendor/agency/{agency_id}/clients"),
            &[("asOf", format_rfc3339(as_of).as_str())],
        )
    }

    pub fn parse_get_changed_clients(&self, response: HttpResponse) -> Result<Vec<i64>, ApiError> {
        parse_json(response, 200)
    }

    pub fn build_get_client(&self, agency_id: i64, client_id: i64) -> HttpRequest {
        self.get(&format!("/vendor/agency/{agency_id}/client/{client_id}"), &[])
    }

    pub fn parse_get_client(&self, response: HttpResponse) -> Result<ClientData, ApiError> {
        parse_json(response, 200)
    }

    /// Fetch several clients at once by client number.
    pub fn build_get_client_list(
        &self,
        agency_id: i64,
        client_numbers: &[i64],
    ) -> Result<HttpRequest, ApiError> {
        self.post(&format!("/vendor/agency/{agency_id}/clients"), client_numbers)
    }

    pub fn parse_get_client_list(&self, response: HttpResponse) -> Result<Vec<ClientData>, ApiError> {
        parse_json(response, 200)
    }

    pub fn build_search_clients(&self, agency_id: i64, policy_number: &str) -> HttpRequest {
        self.get(
            &format!("/vendor/agency/{agency_id}/clients/search"),
            &[("policyNumber", policy_number)],
        )
    }

    pub fn parse_search_clients(&self, response: HttpResponse) -> Result<Vec<ClientData>, ApiError> {
        parse_json(response, 200)
    }

    // --- client writes ---

    pub fn build_create_log_note(
        &self,
        agency_id: i64,
        client_id: i64,
        note: &LogNote,
    ) -> Result<HttpRequest, ApiError> {
        self.post(&format!("/vendor/agency/{agency_id}/client/{client_id}/log"), note)
    }

    pub fn parse_create_log_note(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 200)
    }

    pub fn build_create_receipts(
        &self,
        agency_id: i64,
        client_id: i64,
        receipts: &[Receipt],
    ) -> Result<HttpRequest, ApiError> {
        self.post(
            &format!("/vendor/agency/{agency_id}/client/{client_id}/receipts"),
            receipts,
        )
    }

    pub fn parse_create_receipts(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 200)
    }

    // --- request plumbing ---

    fn url(&self, path: &str, query: &[(&str, &str)]) -> String {
        let mut url = format!(
            "{}{path}?version={}",
            self.base_url,
            urlencoding::encode(&self.version)
        );
        for (key, value) in query {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    fn base_headers(&self) -> Vec<(String, String)> {
        vec![
            ("accept".to_string(), "application/json".to_string()),
            ("authorization".to_string(), self.auth.header_value()),
        ]
    }

    fn get(&self, path: &str, query: &[(&str, &str)]) -> HttpRequest {
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: self.url(path, query),
            headers: self.base_headers(),
            body: None,
        };
        tracing::debug!(method = "GET", url = %request.url, "built request");
        request
    }

    fn post<T: Serialize + ?Sized>(&self, path: &str, payload: &T) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(payload).map_err(ApiError::Serialization)?;
        let mut headers = self.base_headers();
        headers.push(("content-type".to_string(), "application/json".to_string()));
        let request = HttpRequest {
            method: HttpMethod::Post,
            url: self.url(path, &[]),
            headers,
            body: Some(body),
        };
        tracing::debug!(method = "POST", url = %request.url, "built request");
        Ok(request)
    }
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse, expected: u16) -> Result<T, ApiError> {
    check_status(&response, expected)?;
    serde_json::from_str(&response.body).map_err(ApiError::Deserialization)
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    tracing::debug!(status = response.status, expected, "unexpected response status");
    match response.status {
        401 => Err(ApiError::Unauthorized),
        404 => Err(ApiError::NotFound),
        status => Err(ApiError::HttpError {
            status,
            body: response.body.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn client() -> HawkSoftClient {
        HawkSoftClient::new("http://localhost:3000", BasicAuth::new("partner", "secret"))
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_get_agencies_produces_correct_request() {
        let req = client().build_get_agencies();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/vendor/agencies?version=3.0");
        assert!(req.body.is_none());
        assert_eq!(req.header("accept"), Some("application/json"));
        assert_eq!(
            req.header("authorization"),
            Some(BasicAuth::new("partner", "secret").header_value().as_str())
        );
        assert_eq!(req.header("content-type"), None);
    }

    #[test]
    fn build_get_agency_offices_produces_correct_request() {
        let req = client().build_get_agency_offices(7);
        assert_eq!(req.url, "http://localhost:3000/vendor/agency/7/offices?version=3.0");
    }

    #[test]
    fn build_get_changed_clients_encodes_rfc3339_as_of() {
        let as_of = Utc.with_ymd_and_hms(2024, 10, 8, 0, 0, 0).unwrap();
        let req = client().build_get_changed_clients(7, as_of);
        assert_eq!(
            req.url,
            "http://localhost:3000/vendor/agency/7/clients?version=3.0&asOf=2024-10-08T00%3A00%3A00Z"
        );
    }

    #[test]
    fn build_get_client_produces_correct_request() {
        let req = client().build_get_client(7, 1001);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/vendor/agency/7/client/1001?version=3.0");
    }

    #[test]
    fn build_get_client_list_posts_client_numbers() {
        let req = client().build_get_client_list(7, &[1001, 1002]).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3000/vendor/agency/7/clients?version=3.0");
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.body.as_deref(), Some("[1001,1002]"));
    }

    #[test]
    fn build_search_clients_percent_encodes_policy_number() {
        let req = client().build_search_clients(7, "AUTO 12/34&x");
        assert_eq!(
            req.url,
            "http://localhost:3000/vendor/agency/7/clients/search?version=3.0&policyNumber=AUTO%2012%2F34%26x"
        );
    }

    #[test]
    fn build_create_log_note_serializes_payload() {
        let note = LogNote {
            note: "Renewal discussed".to_string(),
            action: Some("Phone".to_string()),
            ref_id: None,
            ts: Utc.with_ymd_and_hms(2024, 10, 8, 9, 0, 0).unwrap(),
        };
        let req = client().build_create_log_note(7, 1001, &note).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3000/vendor/agency/7/client/1001/log?version=3.0");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["note"], "Renewal discussed");
        assert_eq!(body["ts"], "2024-10-08T09:00:00Z");
        assert!(body.get("refId").is_none());
    }

    #[test]
    fn build_create_receipts_serializes_array() {
        let receipts = vec![Receipt {
            amount: 250.0,
            payment_method: Some("Check".to_string()),
            ref_id: None,
            memo: None,
            ts: Utc.with_ymd_and_hms(2024, 10, 8, 0, 0, 0).unwrap(),
        }];
        let req = client().build_create_receipts(7, 1001, &receipts).unwrap();
        assert_eq!(
            req.url,
            "http://localhost:3000/vendor/agency/7/client/1001/receipts?version=3.0"
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body[0]["amount"], 250.0);
        assert_eq!(body[0]["paymentMethod"], "Check");
    }

    #[test]
    fn with_version_overrides_query() {
        let req = client().with_version("3.1").build_get_agencies();
        assert_eq!(req.url, "http://localhost:3000/vendor/agencies?version=3.1");
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = HawkSoftClient::new("http://localhost:3000/", BasicAuth::new("a", "b"));
        assert_eq!(client.base_url(), "http://localhost:3000");
    }

    #[test]
    fn parse_get_agencies_success() {
        let ids = client().parse_get_agencies(response(200, "[1,2,3]")).unwrap();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn parse_get_client_success_with_dates() {
        let body = r#"{
            "clientNumber": 1001,
            "policies": [{
                "carrier": "Example Insurance Co",
                "effectiveDate": "2024-10-08T00:00:00",
                "LOBs": [],
                "status": "Active",
                "type": "Personal"
            }]
        }"#;
        let data = client().parse_get_client(response(200, body)).unwrap();
        assert_eq!(data.client_number, 1001);
        assert_eq!(
            data.policies[0].effective_date().map(|t| t.to_string()),
            Some("2024-10-08 00:00:00".to_string())
        );
    }

    #[test]
    fn parse_get_client_not_found() {
        let err = client().parse_get_client(response(404, "")).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_unauthorized() {
        let err = client().parse_get_agencies(response(401, "")).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[test]
    fn parse_unexpected_status_keeps_body() {
        let err = client()
            .parse_get_agency_offices(response(500, "internal error"))
            .unwrap_err();
        match err {
            ApiError::HttpError { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "internal error");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn parse_bad_json() {
        let err = client().parse_get_client_list(response(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn parse_write_operations() {
        assert!(client().parse_create_log_note(response(200, "")).is_ok());
        assert!(client().parse_create_receipts(response(200, "")).is_ok());
        let err = client().parse_create_receipts(response(400, "bad")).unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 400, .. }));
    }
}
