use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Office {
    pub office_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub office_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Lob {
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    pub carrier: String,
    pub policy_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    #[serde(rename = "LOBs")]
    pub lobs: Vec<Lob>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub premium: Option<f64>,
    pub status: String,
    #[serde(rename = "type")]
    pub policy_type: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub invoice_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub amount: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub client_number: i64,
    pub people: Vec<Person>,
    pub policies: Vec<Policy>,
    pub invoices: Vec<Invoice>,
    #[serde(skip)]
    pub modified: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogNote {
    pub note: String,
    pub action: Option<String>,
    pub ref_id: Option<String>,
    pub ts: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub amount: f64,
    pub payment_method: Option<String>,
    pub ref_id: Option<String>,
    pub memo: Option<String>,
    pub ts: String,
}

#[derive(Default)]
pub struct Agency {
    pub offices: Vec<Office>,
    pub clients: HashMap<i64, Client>,
    pub log_notes: HashMap<i64, Vec<LogNote>>,
    pub receipts: HashMap<i64, Vec<Receipt>>,
}

pub type Db = Arc<RwLock<HashMap<i64, Agency>>>;

/// Agency id that carries the seeded clients.
pub const SEED_AGENCY: i64 = 1001;
/// Subscribed agency without any clients.
pub const EMPTY_AGENCY: i64 = 1002;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(seed()));

    let vendor = Router::new()
        .route("/vendor/agencies", get(list_agencies))
        .route("/vendor/agency/{agency_id}/offices", get(list_offices))
        .route(
            "/vendor/agency/{agency_id}/clients",
            get(changed_clients).post(client_list),
        )
        .route("/vendor/agency/{agency_id}/clients/search", get(search_clients))
        .route("/vendor/agency/{agency_id}/client/{client_id}", get(get_client))
        .route(
            "/vendor/agency/{agency_id}/client/{client_id}/log",
            post(create_log_note),
        )
        .route(
            "/vendor/agency/{agency_id}/client/{client_id}/receipts",
            post(create_receipts),
        )
        .route_layer(middleware::from_fn(require_partner));

    let inspect = Router::new()
        .route("/_mock/agency/{agency_id}/client/{client_id}/log", get(recorded_log_notes))
        .route(
            "/_mock/agency/{agency_id}/client/{client_id}/receipts",
            get(recorded_receipts),
        );

    vendor.merge(inspect).with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("mock partner API listening on {addr}");
    }
    axum::serve(listener, app()).await
}

fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

fn seed() -> HashMap<i64, Agency> {
    let steady = Client {
        client_number: 1,
        people: vec![Person {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            date_of_birth: Some("1985-12-10T00:00:00".to_string()),
        }],
        policies: vec![Policy {
            carrier: "Example Insurance Co".to_string(),
            policy_number: "AUTO-100".to_string(),
            effective_date: Some("2024-10-08T00:00:00".to_string()),
            expiration_date: Some("2025-10-08T00:00:00".to_string()),
            lobs: vec![Lob { name: "Auto".to_string() }],
            premium: Some(1200.5),
            status: "Active".to_string(),
            policy_type: "Personal".to_string(),
        }],
        invoices: vec![Invoice {
            invoice_number: "INV-1".to_string(),
            invoice_date: Some("2024-10-08".to_string()),
            due_date: Some("2024-11-07".to_string()),
            amount: 100.25,
        }],
        modified: utc(2024, 1, 15),
    };

    // Partner feeds do send garbled and empty optional dates.
    let messy = Client {
        client_number: 2,
        people: Vec::new(),
        policies: vec![Policy {
            carrier: "Another Insurance Co".to_string(),
            policy_number: "HOME 7/B".to_string(),
            effective_date: Some("10/08/2024".to_string()),
            expiration_date: Some(String::new()),
            lobs: vec![Lob { name: "Home".to_string() }],
            premium: None,
            status: "Pending".to_string(),
            policy_type: "Commercial".to_string(),
        }],
        invoices: vec![Invoice {
            invoice_number: "INV-2".to_string(),
            invoice_date: Some(String::new()),
            due_date: Some("2024-1-8".to_string()),
            amount: 80.0,
        }],
        modified: utc(2024, 10, 8),
    };

    let seeded = Agency {
        offices: vec![
            Office {
                office_id: 1,
                office_description: Some("Main Street".to_string()),
                city: Some("Springfield".to_string()),
                state: Some("IL".to_string()),
            },
            Office {
                office_id: 2,
                office_description: Some("Downtown".to_string()),
                city: None,
                state: None,
            },
        ],
        clients: [(steady.client_number, steady), (messy.client_number, messy)]
            .into_iter()
            .collect(),
        ..Agency::default()
    };

    let mut agencies = HashMap::new();
    agencies.insert(SEED_AGENCY, seeded);
    agencies.insert(EMPTY_AGENCY, Agency::default());
    agencies
}

/// Reject requests lacking the `version` query parameter or Basic credentials.
async fn require_partner(req: Request, next: Next) -> Response {
    let has_version = req.uri().query().is_some_and(|q| {
        q.split('&')
            .any(|pair| pair.strip_prefix("version=").is_some_and(|v| !v.is_empty()))
    });
    if !has_version {
        return (StatusCode::BAD_REQUEST, "missing version query parameter").into_response();
    }

    let has_basic = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Basic "));
    if !has_basic {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    next.run(req).await
}

async fn list_agencies(State(db): State<Db>) -> Json<Vec<i64>> {
    let agencies = db.read().await;
    let mut ids: Vec<i64> = agencies.keys().copied().collect();
    ids.sort_unstable();
    Json(ids)
}

async fn list_offices(
    State(db): State<Db>,
    Path(agency_id): Path<i64>,
) -> Result<Json<Vec<Office>>, StatusCode> {
    let agencies = db.read().await;
    let agency = agencies.get(&agency_id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(agency.offices.clone()))
}

#[derive(Deserialize)]
pub struct ChangedParams {
    #[serde(rename = "asOf")]
    pub as_of: Option<String>,
}

async fn changed_clients(
    State(db): State<Db>,
    Path(agency_id): Path<i64>,
    Query(params): Query<ChangedParams>,
) -> Result<Json<Vec<i64>>, StatusCode> {
    let since = match params.as_of.as_deref() {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map_err(|_| StatusCode::BAD_REQUEST)?
            .with_timezone(&Utc),
        None => DateTime::<Utc>::MIN_UTC,
    };

    let agencies = db.read().await;
    let agency = agencies.get(&agency_id).ok_or(StatusCode::NOT_FOUND)?;
    let mut ids: Vec<i64> = agency
        .clients
        .values()
        .filter(|c| c.modified >= since)
        .map(|c| c.client_number)
        .collect();
    ids.sort_unstable();
    Ok(Json(ids))
}

async fn client_list(
    State(db): State<Db>,
    Path(agency_id): Path<i64>,
    Json(numbers): Json<Vec<i64>>,
) -> Result<Json<Vec<Client>>, StatusCode> {
    let agencies = db.read().await;
    let agency = agencies.get(&agency_id).ok_or(StatusCode::NOT_FOUND)?;
    let found = numbers
        .iter()
        .filter_map(|n| agency.clients.get(n).cloned())
        .collect();
    Ok(Json(found))
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(rename = "policyNumber")]
    pub policy_number: String,
}

async fn search_clients(
    State(db): State<Db>,
    Path(agency_id): Path<i64>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Client>>, StatusCode> {
    let agencies = db.read().await;
    let agency = agencies.get(&agency_id).ok_or(StatusCode::NOT_FOUND)?;
    let mut found: Vec<Client> = agency
        .clients
        .values()
        .filter(|c| c.policies.iter().any(|p| p.policy_number == params.policy_number))
        .cloned()
        .collect();
    found.sort_by_key(|c| c.client_number);
    Ok(Json(found))
}

async fn get_client(
    State(db): State<Db>,
    Path((agency_id, client_id)): Path<(i64, i64)>,
) -> Result<Json<Client>, StatusCode> {
    let agencies = db.read().await;
    agencies
        .get(&agency_id)
        .and_then(|a| a.clients.get(&client_id))
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn create_log_note(
    State(db): State<Db>,
    Path((agency_id, client_id)): Path<(i64, i64)>,
    Json(note): Json<LogNote>,
) -> StatusCode {
    if note.note.trim().is_empty() {
        return StatusCode::BAD_REQUEST;
    }
    let mut agencies = db.write().await;
    let Some(agency) = agencies.get_mut(&agency_id) else {
        return StatusCode::NOT_FOUND;
    };
    if !agency.clients.contains_key(&client_id) {
        return StatusCode::NOT_FOUND;
    }
    tracing::info!(agency_id, client_id, "recorded log note");
    agency.log_notes.entry(client_id).or_default().push(note);
    StatusCode::OK
}

async fn create_receipts(
    State(db): State<Db>,
    Path((agency_id, client_id)): Path<(i64, i64)>,
    Json(receipts): Json<Vec<Receipt>>,
) -> StatusCode {
    if receipts.is_empty() || receipts.iter().any(|r| r.amount <= 0.0) {
        return StatusCode::BAD_REQUEST;
    }
    let mut agencies = db.write().await;
    let Some(agency) = agencies.get_mut(&agency_id) else {
        return StatusCode::NOT_FOUND;
    };
    if !agency.clients.contains_key(&client_id) {
        return StatusCode::NOT_FOUND;
    }
    tracing::info!(agency_id, client_id, count = receipts.len(), "recorded receipts");
    agency.receipts.entry(client_id).or_default().extend(receipts);
    StatusCode::OK
}

async fn recorded_log_notes(
    State(db): State<Db>,
    Path((agency_id, client_id)): Path<(i64, i64)>,
) -> Json<Vec<LogNote>> {
    let agencies = db.read().await;
    let notes = agencies
        .get(&agency_id)
        .and_then(|a| a.log_notes.get(&client_id))
        .cloned()
        .unwrap_or_default();
    Json(notes)
}

async fn recorded_receipts(
    State(db): State<Db>,
    Path((agency_id, client_id)): Path<(i64, i64)>,
) -> Json<Vec<Receipt>> {
    let agencies = db.read().await;
    let receipts = agencies
        .get(&agency_id)
        .and_then(|a| a.receipts.get(&client_id))
        .cloned()
        .unwrap_or_default();
    Json(receipts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_serializes_wire_field_names() {
        let policy = Policy {
            carrier: "Test".to_string(),
            policy_number: "P-1".to_string(),
            effective_date: Some("2024-10-08T00:00:00".to_string()),
            expiration_date: None,
            lobs: vec![Lob { name: "Auto".to_string() }],
            premium: None,
            status: "Active".to_string(),
            policy_type: "Personal".to_string(),
        };
        let json = serde_json::to_value(&policy).unwrap();
        assert_eq!(json["effectiveDate"], "2024-10-08T00:00:00");
        assert_eq!(json["LOBs"][0]["name"], "Auto");
        assert_eq!(json["type"], "Personal");
        assert!(json.get("expirationDate").is_none());
        assert!(json.get("premium").is_none());
    }

    #[test]
    fn client_hides_modified_timestamp() {
        let client = Client {
            client_number: 9,
            people: Vec::new(),
            policies: Vec::new(),
            invoices: Vec::new(),
            modified: utc(2024, 10, 8),
        };
        let json = serde_json::to_value(&client).unwrap();
        assert_eq!(json["clientNumber"], 9);
        assert!(json.get("modified").is_none());
    }

    #[test]
    fn seed_has_subscribed_agencies() {
        let agencies = seed();
        assert_eq!(agencies[&SEED_AGENCY].clients.len(), 2);
        assert!(agencies[&EMPTY_AGENCY].clients.is_empty());
    }

    #[test]
    fn log_note_requires_note_and_ts() {
        let result: Result<LogNote, _> = serde_json::from_str(r#"{"note":"hi"}"#);
        assert!(result.is_err());
        let note: LogNote =
            serde_json::from_str(r#"{"note":"hi","ts":"2024-10-08T00:00:00Z"}"#).unwrap();
        assert!(note.action.is_none());
    }
}
