//! Structured field extraction: one prompt-and-merge core, two entry points.
//!
//! The JSON entry point feeds the file's parsed JSON to the model and lets
//! it reassign the intent; the text entry point feeds extracted Email/PDF
//! text and keeps the intent the classifier chose. Both merge the validated
//! reply into the existing record, or leave it byte-for-byte untouched on
//! any failure.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::prompts::{extraction_prompt, IntentPolicy};
use flowbit_core::{expected_fields, DocumentFormat, Error, Intent, Result};
use flowbit_model::{strip_code_fence, GenerativeModel};
use flowbit_store::RecordStore;

/// Why an extraction step had nothing to do. Distinct from a failure: a
/// skip is a precondition miss, not an attempt that went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The source file no longer exists.
    MissingFile,
    /// The JSON entry point was handed a non-`.json` path.
    NotJson,
    /// The record's stored format has no text extraction handler.
    UnsupportedFormat(String),
    /// Text extraction produced nothing to send to the model.
    EmptyText,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingFile => write!(f, "source file missing"),
            SkipReason::NotJson => write!(f, "not a .json file"),
            SkipReason::UnsupportedFormat(format) => {
                write!(f, "stored format {format:?} is not extractable")
            }
            SkipReason::EmptyText => write!(f, "no text extracted"),
        }
    }
}

/// Result of a successful extraction attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The record was updated with the model's fields.
    Enriched,
    /// A precondition failed; the record was not touched.
    Skipped(SkipReason),
}

/// Shape expected of the model's extraction reply. Absent keys default to
/// empty containers rather than failing the decode.
#[derive(Debug, Deserialize)]
struct ExtractionReply {
    intent: Option<String>,
    #[serde(default)]
    fields: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    missing_fields: Vec<String>,
    #[serde(default)]
    entities: Vec<serde_json::Value>,
    comments: Option<String>,
}

/// Fills the five-field schema for a record's intent with one model call.
pub struct StructuredExtractor<'a> {
    model: &'a dyn GenerativeModel,
    store: &'a dyn RecordStore,
}

impl<'a> StructuredExtractor<'a> {
    pub fn new(model: &'a dyn GenerativeModel, store: &'a dyn RecordStore) -> Self {
        Self { model, store }
    }

    /// Extract from a JSON document. The model may reassign the intent.
    pub async fn extract_from_json(&self, path: &Path, key: &str) -> Result<Outcome> {
        if !path.exists() {
            info!("Skipping extraction for {}: {}", key, SkipReason::MissingFile);
            return Ok(Outcome::Skipped(SkipReason::MissingFile));
        }
        if path.extension().and_then(|e| e.to_str()).map(|e| e.to_lowercase())
            != Some("json".to_string())
        {
            info!("Skipping extraction for {}: {}", key, SkipReason::NotJson);
            return Ok(Outcome::Skipped(SkipReason::NotJson));
        }

        let raw = std::fs::read_to_string(path)?;
        let document: serde_json::Value = serde_json::from_str(&raw)?;
        let content = serde_json::to_string_pretty(&document)?;

        let intent = self.stored_intent(key)?;
        self.run(key, intent, &content, IntentPolicy::Reassign).await
    }

    /// Extract from an Email or PDF document's text. The record's stored
    /// format gates the step; the intent is preserved.
    pub async fn extract_from_text(&self, path: &Path, key: &str) -> Result<Outcome> {
        let hash = self.store.read_fields(key)?;
        let format_label = hash.get("format").cloned().unwrap_or_default();

        let text = match format_label.parse::<DocumentFormat>() {
            Ok(DocumentFormat::Pdf) => flowbit_ingest::extract_pdf_text(path),
            Ok(DocumentFormat::Email) => flowbit_ingest::extract_plain_text(path),
            _ => {
                let reason = SkipReason::UnsupportedFormat(format_label);
                info!("Skipping extraction for {}: {}", key, reason);
                return Ok(Outcome::Skipped(reason));
            }
        };

        if text.trim().is_empty() {
            info!("Skipping extraction for {}: {}", key, SkipReason::EmptyText);
            return Ok(Outcome::Skipped(SkipReason::EmptyText));
        }

        let intent = hash
            .get("intent")
            .and_then(|label| label.parse().ok())
            .unwrap_or(Intent::Unknown);
        self.run(key, intent, &text, IntentPolicy::Keep).await
    }

    fn stored_intent(&self, key: &str) -> Result<Intent> {
        let hash = self.store.read_fields(key)?;
        Ok(hash
            .get("intent")
            .and_then(|label| label.parse().ok())
            .unwrap_or(Intent::Unknown))
    }

    /// Shared prompt-and-merge core.
    async fn run(
        &self,
        key: &str,
        intent: Intent,
        content: &str,
        policy: IntentPolicy,
    ) -> Result<Outcome> {
        let prompt = extraction_prompt(intent, content, policy);
        let reply = self.model.generate(&prompt).await?;

        let cleaned = strip_code_fence(&reply);
        let parsed: ExtractionReply = serde_json::from_str(&cleaned).map_err(|e| {
            warn!("Extraction reply for {} is not valid JSON: {}", key, e);
            Error::UnexpectedReply(format!("reply is not valid JSON: {e}"))
        })?;

        // Fall back to the record's current intent when the reply omits one.
        let final_intent = match parsed.intent.as_deref() {
            Some(label) => label.parse::<Intent>()?,
            None => intent,
        };
        validate_fields(final_intent, &parsed.fields)?;

        let updates = vec![
            ("entities".to_string(), serde_json::to_string(&parsed.entities)?),
            ("fields".to_string(), serde_json::to_string(&parsed.fields)?),
            (
                "missing_fields".to_string(),
                serde_json::to_string(&parsed.missing_fields)?,
            ),
            ("comments".to_string(), parsed.comments.unwrap_or_default()),
            ("intent".to_string(), final_intent.to_string()),
        ];
        self.store.write_fields(key, &updates)?;

        info!(
            "Enriched {}: intent={}, {} fields, {} missing",
            key,
            final_intent,
            parsed.fields.len(),
            parsed.missing_fields.len()
        );
        Ok(Outcome::Enriched)
    }
}

/// Reject reply fields outside the intent's fixed schema.
fn validate_fields(
    intent: Intent,
    fields: &BTreeMap<String, serde_json::Value>,
) -> Result<()> {
    match expected_fields(intent) {
        Some(schema) => {
            for name in fields.keys() {
                if !schema.contains(&name.as_str()) {
                    return Err(Error::UnexpectedReply(format!(
                        "field {name:?} is not in the {intent} schema"
                    )));
                }
            }
            Ok(())
        }
        None => {
            if fields.is_empty() {
                Ok(())
            } else {
                Err(Error::UnexpectedReply(
                    "fields returned for Unknown intent".to_string(),
                ))
            }
        }
    }
}
