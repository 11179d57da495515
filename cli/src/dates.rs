//! Offline walkthrough of the API's date conventions.
//!
//! Runs entirely against in-memory models, so it works without credentials.

use std::io::{self, Write};

use chrono::{Days, Months, NaiveDateTime};
use hawksoft_core::dateutil::{format_date_time, format_rfc3339};
use hawksoft_core::{Invoice, Lob, Policy};

fn sample_policy() -> Policy {
    Policy {
        carrier: "Example Insurance Co".to_string(),
        effective_date: Some("2024-10-08T00:00:00".to_string()),
        expiration_date: Some("2025-10-08T00:00:00".to_string()),
        lobs: vec![Lob {
            code: None,
            name: Some("Auto".to_string()),
        }],
        status: "Active".to_string(),
        policy_type: "Personal".to_string(),
        ..Policy::default()
    }
}

fn long_date(t: Option<NaiveDateTime>) -> String {
    t.map(|t| t.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|| "(not set)".to_string())
}

/// Write the walkthrough to `out`, treating `now` as the current time.
pub fn run(out: &mut impl Write, now: NaiveDateTime) -> io::Result<()> {
    writeln!(out, "=== Date Handling Examples ===")?;

    writeln!(out, "\n1. Parsing dates from API responses:")?;
    let policy = sample_policy();
    writeln!(out, "   Effective Date: {}", long_date(policy.effective_date()))?;
    writeln!(out, "   Expiration Date: {}", long_date(policy.expiration_date()))?;
    if let Some(days) = policy.days_until_expiration(now) {
        writeln!(out, "   Days until expiration: {days}")?;
    }

    writeln!(out, "\n2. Creating dates for API requests:")?;
    let next_year = now.checked_add_months(Months::new(12));
    writeln!(out, "   Current time as API format: {}", format_date_time(Some(now)))?;
    writeln!(out, "   One year from now: {}", format_date_time(next_year))?;

    writeln!(out, "\n3. Creating policy with dates:")?;
    let mut new_policy = Policy {
        carrier: "Another Insurance Co".to_string(),
        lobs: vec![Lob {
            code: None,
            name: Some("Home".to_string()),
        }],
        premium: Some(1200.50),
        status: "Active".to_string(),
        policy_type: "Personal".to_string(),
        ..Policy::default()
    };
    new_policy.set_effective_date(Some(now));
    new_policy.set_expiration_date(next_year);
    writeln!(
        out,
        "   Policy effective: {}",
        new_policy.effective_date.as_deref().unwrap_or_default()
    )?;
    writeln!(
        out,
        "   Policy expires: {}",
        new_policy.expiration_date.as_deref().unwrap_or_default()
    )?;

    writeln!(out, "\n4. Handling missing and garbled dates:")?;
    let empty = Policy {
        carrier: "Test".to_string(),
        status: "Pending".to_string(),
        policy_type: "Commercial".to_string(),
        ..Policy::default()
    };
    writeln!(out, "   Missing date is absent: {}", empty.effective_date().is_none())?;
    let garbled = Policy {
        effective_date: Some("10/08/2024".to_string()),
        ..empty
    };
    writeln!(out, "   Garbled date is absent: {}", garbled.effective_date().is_none())?;

    writeln!(out, "\n5. Invoice dates (date-only format):")?;
    let mut invoice = Invoice {
        invoice_number: Some("INV-1".to_string()),
        ..Invoice::default()
    };
    invoice.set_invoice_date(Some(now.date()));
    invoice.set_due_date(now.date().checked_add_days(Days::new(30)));
    let json = serde_json::to_string(&invoice).map_err(io::Error::other)?;
    writeln!(out, "   Serialized invoice: {json}")?;

    writeln!(out, "\nThe HawkSoft API uses three date formats:")?;
    writeln!(out, "  - DateTime fields: '2024-10-08T00:00:00' (no timezone)")?;
    writeln!(out, "  - Date fields: '2024-10-08' (invoices)")?;
    writeln!(
        out,
        "  - RFC3339 fields: '{}' (timestamps in requests)",
        format_rfc3339(now.and_utc())
    )?;
    Ok(())
}
