//! Fixed per-intent field schemas and record-key generation.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::Intent;

/// The five expected field names per classifiable intent. Never mutated at
/// runtime; the extractor validates model replies against this table.
pub const INTENT_SCHEMAS: [(Intent, [&str; 5]); 4] = [
    (
        Intent::Invoice,
        ["invoice_number", "date", "total_amount", "sender", "recipient"],
    ),
    (
        Intent::Rfq,
        ["requested_items", "quantity", "delivery_date", "budget", "contact_person"],
    ),
    (
        Intent::Complaint,
        ["customer_name", "issue_type", "product", "date_of_incident", "resolution_requested"],
    ),
    (
        Intent::Regulation,
        ["regulation_name", "effective_date", "issuing_authority", "scope", "compliance_deadline"],
    ),
];

/// Look up the expected fields for an intent. `Unknown` has no schema.
pub fn expected_fields(intent: Intent) -> Option<&'static [&'static str; 5]> {
    INTENT_SCHEMAS
        .iter()
        .find(|(i, _)| *i == intent)
        .map(|(_, fields)| fields)
}

/// Generate a fresh record key.
///
/// Keys keep the `log:<unix-seconds>` shape of the original log but carry a
/// random suffix so two documents ingested in the same second never share a
/// record.
pub fn record_key() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("log:{}-{}", secs, uuid::Uuid::new_v4().simple())
}
