//! End-to-end pipeline scenarios against injected store and model doubles.

use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;

use flowbit_agents::SkipReason;
use flowbit_core::{expected_fields, Intent};
use flowbit_model::ScriptedModel;
use flowbit_runtime::{Pipeline, StepResult};
use flowbit_store::{MemoryRecordStore, RecordStore};

fn pipeline() -> (Arc<MemoryRecordStore>, Arc<ScriptedModel>, Pipeline) {
    let store = Arc::new(MemoryRecordStore::new());
    let model = Arc::new(ScriptedModel::new());
    let pipeline = Pipeline::new(store.clone(), model.clone());
    (store, model, pipeline)
}

/// A `.json` upload: the JSON extraction agent reassigns the intent to
/// Invoice and every stored field key belongs to the Invoice schema.
#[tokio::test]
async fn json_invoice_fields_stay_within_schema() {
    let (store, model, pipeline) = pipeline();
    model.push_reply(
        r#"{
            "intent": "Invoice",
            "fields": {"invoice_number": "INV-2031", "total_amount": "1870.50", "sender": "Acme Corp"},
            "missing_fields": ["date", "recipient"],
            "entities": ["Acme Corp"],
            "comments": ""
        }"#,
    );

    let mut file = tempfile::NamedTempFile::with_suffix(".json").unwrap();
    write!(
        file,
        r#"{{"invoice_no": "INV-2031", "amount_due": 1870.50, "from": "Acme Corp"}}"#
    )
    .unwrap();

    let report = pipeline.process(file.path()).await.unwrap();
    assert!(matches!(report.extraction, StepResult::Enriched));

    let hash = store.read_fields(&report.classification.key).unwrap();
    assert_eq!(hash["intent"], "Invoice");

    let fields: BTreeMap<String, serde_json::Value> =
        serde_json::from_str(&hash["fields"]).unwrap();
    let schema = expected_fields(Intent::Invoice).unwrap();
    for key in fields.keys() {
        assert!(schema.contains(&key.as_str()), "{key} outside Invoice schema");
    }

    // The classifier never ran: only the extraction call reached the model.
    assert_eq!(model.call_count(), 1);
}

/// A `.txt` upload with content matching no intent: classified Unknown, and
/// the extractor is still invoked with that label.
#[tokio::test]
async fn unclassifiable_text_still_reaches_extractor() {
    let (store, model, pipeline) = pipeline();
    model.push_reply("Unknown");
    model.push_reply(r#"{"intent": "Unknown", "fields": {}, "missing_fields": [], "entities": []}"#);

    let mut file = tempfile::NamedTempFile::with_suffix(".txt").unwrap();
    write!(file, "Notes from the company picnic. Bring sunscreen.").unwrap();

    let report = pipeline.process(file.path()).await.unwrap();
    assert_eq!(report.classification.intent, Intent::Unknown);
    assert!(matches!(report.extraction, StepResult::Enriched));

    // Second model call is the extraction prompt, carrying the Unknown label.
    assert_eq!(model.call_count(), 2);
    assert!(model.prompts()[1].contains("INTENT: Unknown"));

    let hash = store.read_fields(&report.classification.key).unwrap();
    assert_eq!(hash["intent"], "Unknown");
}

/// A corrupt `.pdf`: text extraction degrades to empty, the intent is set to
/// Unknown without any model call, and extraction is skipped.
#[tokio::test]
async fn corrupt_pdf_never_calls_the_model() {
    let (store, model, pipeline) = pipeline();

    let mut file = tempfile::NamedTempFile::with_suffix(".pdf").unwrap();
    file.write_all(b"%PDF-1.4 this is not a parsable document").unwrap();

    let report = pipeline.process(file.path()).await.unwrap();
    assert_eq!(report.classification.intent, Intent::Unknown);
    assert!(matches!(
        report.extraction,
        StepResult::Skipped(SkipReason::EmptyText)
    ));
    assert_eq!(model.call_count(), 0);

    // The record still exists in its created state.
    let hash = store.read_fields(&report.classification.key).unwrap();
    assert_eq!(hash.len(), 4);
    assert_eq!(hash["format"], "PDF");
}

/// An extraction failure leaves the record in its classification state and
/// does not abort the pipeline.
#[tokio::test]
async fn malformed_extraction_reply_keeps_created_state() {
    let (store, model, pipeline) = pipeline();
    model.push_reply("Complaint");
    model.push_reply("Sorry, I can only answer in prose.");

    let mut file = tempfile::NamedTempFile::with_suffix(".txt").unwrap();
    write!(file, "My blender caught fire on the first use.").unwrap();

    let report = pipeline.process(file.path()).await.unwrap();
    assert!(matches!(report.extraction, StepResult::Failed(_)));

    let hash = store.read_fields(&report.classification.key).unwrap();
    assert_eq!(hash.len(), 4);
    assert_eq!(hash["intent"], "Complaint");
    assert!(!hash.contains_key("fields"));
}
