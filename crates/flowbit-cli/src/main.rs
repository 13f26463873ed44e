//! Flowbit — routes a document through classification and field extraction.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use flowbit_core::FlowbitConfig;
use flowbit_model::GeminiClient;
use flowbit_runtime::{Pipeline, StepResult};
use flowbit_store::{RecordStore, SqliteRecordStore};

fn resolve_data_dir() -> PathBuf {
    std::env::var("FLOWBIT_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"))
}

fn print_usage() {
    println!("Flowbit — document classification and extraction pipeline");
    println!();
    println!("Usage: flowbit <file>");
    println!();
    println!("Accepts .json, .txt, .eml, and .pdf files. The processed record");
    println!("is stored under a log key and printed on completion.");
    println!();
    println!("Environment:");
    println!("  GOOGLE_API_KEY     API key for the generative model (required)");
    println!("  FLOWBIT_MODEL      Model name (default: {})", FlowbitConfig::DEFAULT_MODEL);
    println!("  FLOWBIT_DATA_DIR   Data directory (default: data)");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let path = match args.get(1).map(String::as_str) {
        None | Some("--help") | Some("-h") | Some("help") => {
            print_usage();
            std::process::exit(if args.len() > 1 { 0 } else { 1 });
        }
        Some(arg) => PathBuf::from(arg),
    };

    if !path.exists() {
        eprintln!("Invalid file path: {}", path.display());
        std::process::exit(1);
    }

    let data_dir = resolve_data_dir();
    let config = FlowbitConfig::from_env(&data_dir)?;
    let api_key = config
        .api_key
        .clone()
        .ok_or_else(|| anyhow::anyhow!("GOOGLE_API_KEY is not set"))?;

    let store = Arc::new(SqliteRecordStore::open(&config.data_paths.records)?);
    let model = Arc::new(GeminiClient::new(api_key, config.model.clone()));
    let pipeline = Pipeline::new(store.clone(), model);

    let report = pipeline.process(&path).await?;
    let key = &report.classification.key;

    match &report.extraction {
        StepResult::Enriched => info!("Record {} enriched", key),
        StepResult::Skipped(reason) => info!("Extraction skipped for {}: {}", key, reason),
        StepResult::Failed(reason) => info!("Extraction failed for {}: {}", key, reason),
    }

    println!("{key}");
    print_record(store.as_ref(), key)?;

    Ok(())
}

/// Print the stored hash, pretty-printing values that are JSON-encoded and
/// leaving the rest as raw strings.
fn print_record(store: &dyn RecordStore, key: &str) -> anyhow::Result<()> {
    let hash: BTreeMap<String, String> = store.read_fields(key)?.into_iter().collect();
    for (field, value) in hash {
        match serde_json::from_str::<serde_json::Value>(&value) {
            Ok(parsed) if parsed.is_array() || parsed.is_object() => {
                println!("{}: {}", field, serde_json::to_string_pretty(&parsed)?);
            }
            _ => println!("{}: {}", field, value),
        }
    }
    Ok(())
}
