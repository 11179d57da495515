//! Wire models for the HawkSoft partner API.
//!
//! # Design
//! Field names follow the API's camelCase JSON. Date-time fields stay
//! `Option<String>` exactly as they travel on the wire, and each gets a typed
//! getter and setter built on [`crate::dateutil`], so a garbled date on one
//! field reads as `None` instead of failing the whole record. Invoice dates
//! follow the same pattern with the date-only format. Request timestamps use
//! RFC3339 with a `Z` suffix.
//!
//! These types are defined independently from the mock-server crate;
//! integration tests catch schema drift.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dateutil::{
    self, date_from_optional, date_time_from_optional, optional_from_date, optional_from_date_time,
};

/// An agency office location.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Office {
    pub office_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub office_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_agency_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zipcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// A client record with everything attached to it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClientData {
    pub client_number: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ClientDetails>,
    #[serde(default)]
    pub people: Vec<Person>,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub policies: Vec<Policy>,
    #[serde(default)]
    pub claims: Vec<Claim>,
    #[serde(default)]
    pub invoices: Vec<Invoice>,
}

impl ClientData {
    /// Policies whose status is `Active`, compared case-insensitively.
    pub fn active_policies(&self) -> impl Iterator<Item = &Policy> {
        self.policies
            .iter()
            .filter(|p| p.status.eq_ignore_ascii_case("active"))
    }
}

/// Business details for a client.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClientDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub office_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dba_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub producer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_since: Option<String>,
}

impl ClientDetails {
    pub fn client_since(&self) -> Option<NaiveDateTime> {
        date_time_from_optional(self.client_since.as_deref())
    }

    pub fn set_client_since(&mut self, value: Option<NaiveDateTime>) {
        self.client_since = optional_from_date_time(value);
    }
}

/// A person associated with a client.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
}

impl Person {
    pub fn date_of_birth(&self) -> Option<NaiveDateTime> {
        date_time_from_optional(self.date_of_birth.as_deref())
    }

    pub fn set_date_of_birth(&mut self, value: Option<NaiveDateTime>) {
        self.date_of_birth = optional_from_date_time(value);
    }

    /// First and last name joined by a space, skipping missing parts.
    pub fn display_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A phone number, email address, or similar contact point.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(rename = "type")]
    pub contact_type: String,
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A line of business on a policy (Auto, Home, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Lob {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// An insurance policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    pub carrier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    #[serde(rename = "LOBs", default)]
    pub lobs: Vec<Lob>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub premium: Option<f64>,
    pub status: String,
    #[serde(rename = "type")]
    pub policy_type: String,
}

impl Policy {
    pub fn effective_date(&self) -> Option<NaiveDateTime> {
        date_time_from_optional(self.effective_date.as_deref())
    }

    pub fn set_effective_date(&mut self, value: Option<NaiveDateTime>) {
        self.effective_date = optional_from_date_time(value);
    }

    pub fn expiration_date(&self) -> Option<NaiveDateTime> {
        date_time_from_optional(self.expiration_date.as_deref())
    }

    pub fn set_expiration_date(&mut self, value: Option<NaiveDateTime>) {
        self.expiration_date = optional_from_date_time(value);
    }

    /// Whole days from `now` until expiration, negative once expired.
    /// `None` when the expiration date is missing or unreadable.
    pub fn days_until_expiration(&self, now: NaiveDateTime) -> Option<i64> {
        self.expiration_date().map(|exp| (exp - now).num_days())
    }
}

/// An insurance claim.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loss_date: Option<String>,
}

impl Claim {
    pub fn loss_date(&self) -> Option<NaiveDateTime> {
        date_time_from_optional(self.loss_date.as_deref())
    }

    pub fn set_loss_date(&mut self, value: Option<NaiveDateTime>) {
        self.loss_date = optional_from_date_time(value);
    }
}

/// A billing invoice. Its dates are date-only (`YYYY-MM-DD`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Invoice {
    pub fn invoice_date(&self) -> Option<NaiveDate> {
        date_from_optional(self.invoice_date.as_deref())
    }

    pub fn set_invoice_date(&mut self, value: Option<NaiveDate>) {
        self.invoice_date = optional_from_date(value);
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        date_from_optional(self.due_date.as_deref())
    }

    pub fn set_due_date(&mut self, value: Option<NaiveDate>) {
        self.due_date = optional_from_date(value);
    }
}

/// Request payload for attaching a log note to a client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LogNote {
    pub note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_id: Option<String>,
    #[serde(with = "dateutil::rfc3339")]
    pub ts: DateTime<Utc>,
}

/// Request payload entry for recording a payment against a client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(with = "dateutil::rfc3339")]
    pub ts: DateTime<Utc>,
}
