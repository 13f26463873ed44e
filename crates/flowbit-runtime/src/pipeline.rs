//! Pipeline orchestration: file → format → text → intent → record → fields.
//!
//! One file is processed start to finish per call; the model and store are
//! injected so the whole flow runs against test doubles.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use flowbit_agents::{IntentClassifier, Outcome, SkipReason, StructuredExtractor};
use flowbit_core::{record_key, DocumentFormat, Error, Intent, Record, Result};
use flowbit_model::GenerativeModel;
use flowbit_store::RecordStore;

/// Result of the classification stage: the only place records are created.
#[derive(Debug, Clone)]
pub struct Classification {
    pub format: DocumentFormat,
    pub intent: Intent,
    pub key: String,
}

/// How the extraction stage ended, with failures carried as data so the
/// pipeline itself never aborts on them.
#[derive(Debug, Clone)]
pub enum StepResult {
    Enriched,
    Skipped(SkipReason),
    Failed(String),
}

/// Full per-file processing report.
#[derive(Debug, Clone)]
pub struct ProcessReport {
    pub classification: Classification,
    pub extraction: StepResult,
}

/// Sequential document pipeline over an injected store and model.
pub struct Pipeline {
    store: Arc<dyn RecordStore>,
    model: Arc<dyn GenerativeModel>,
}

impl Pipeline {
    pub fn new(store: Arc<dyn RecordStore>, model: Arc<dyn GenerativeModel>) -> Self {
        Self { store, model }
    }

    /// Stage 1: detect format, classify intent, create the record.
    ///
    /// An unsupported format is the one hard error surfaced to the caller.
    /// JSON files skip text extraction (the JSON extraction agent reads the
    /// content itself) and are created with `Unknown` intent; empty
    /// extracted text also classifies as `Unknown` without a model call.
    pub async fn classify_file(&self, path: &Path) -> Result<Classification> {
        let format = DocumentFormat::from_path(path);
        if !format.is_supported() {
            return Err(Error::UnsupportedFormat(path.display().to_string()));
        }

        let text = flowbit_ingest::extract_text(path, format);
        let intent = if text.trim().is_empty() {
            Intent::Unknown
        } else {
            IntentClassifier::new(self.model.as_ref()).classify(&text).await
        };

        let key = record_key();
        let timestamp = chrono::Utc::now().to_rfc3339();
        self.store.write_fields(
            &key,
            &[
                ("source".to_string(), path.display().to_string()),
                ("format".to_string(), format.to_string()),
                ("intent".to_string(), intent.to_string()),
                ("timestamp".to_string(), timestamp),
            ],
        )?;

        info!("Classified {}: format={}, intent={}, key={}", path.display(), format, intent, key);

        Ok(Classification { format, intent, key })
    }

    /// Stage 2: run the extraction entry point matching the format.
    pub async fn enrich(&self, path: &Path, classification: &Classification) -> Result<Outcome> {
        let extractor = StructuredExtractor::new(self.model.as_ref(), self.store.as_ref());
        match classification.format {
            DocumentFormat::Json => extractor.extract_from_json(path, &classification.key).await,
            DocumentFormat::Email | DocumentFormat::Pdf => {
                extractor.extract_from_text(path, &classification.key).await
            }
            // classify_file rejects Unknown before a record exists.
            DocumentFormat::Unknown => Ok(Outcome::Skipped(SkipReason::UnsupportedFormat(
                classification.format.to_string(),
            ))),
        }
    }

    /// Process one file end to end. Extraction failures are logged and
    /// reported, never raised; the record keeps its classification state.
    pub async fn process(&self, path: &Path) -> Result<ProcessReport> {
        let classification = self.classify_file(path).await?;
        let extraction = match self.enrich(path, &classification).await {
            Ok(Outcome::Enriched) => StepResult::Enriched,
            Ok(Outcome::Skipped(reason)) => StepResult::Skipped(reason),
            Err(e) => {
                warn!("Extraction failed for {}: {}", classification.key, e);
                StepResult::Failed(e.to_string())
            }
        };
        Ok(ProcessReport { classification, extraction })
    }

    /// Read back the decoded record for a key.
    pub fn record(&self, key: &str) -> Result<Record> {
        let hash = self.store.read_fields(key)?;
        if hash.is_empty() {
            return Err(Error::NotFound(key.to_string()));
        }
        Record::from_hash(&hash)
    }
}
