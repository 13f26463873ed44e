//! Configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Paths to all Flowbit data directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (e.g., `data/`).
    pub root: PathBuf,
    /// Record store database directory (`data/records/`).
    pub records: PathBuf,
    /// Files dropped for processing (`data/inbox/`).
    pub inbox: PathBuf,
}

impl DataPaths {
    /// Create data paths from a root directory. Creates directories if needed.
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        let paths = Self {
            records: root.join("records"),
            inbox: root.join("inbox"),
            root,
        };
        paths.ensure_dirs()?;
        Ok(paths)
    }

    fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.records)?;
        std::fs::create_dir_all(&self.inbox)?;
        Ok(())
    }
}

/// Top-level Flowbit configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowbitConfig {
    /// Data directory paths.
    pub data_paths: DataPaths,
    /// API key for the external generative model, if configured.
    pub api_key: Option<String>,
    /// Model identifier sent to the generative API.
    pub model: String,
}

impl FlowbitConfig {
    pub const DEFAULT_MODEL: &'static str = "gemini-1.5-flash";

    /// Create configuration from environment and defaults.
    ///
    /// Reads `GOOGLE_API_KEY` for the model credential and `FLOWBIT_MODEL`
    /// for a model-name override.
    pub fn from_env(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let api_key = std::env::var("GOOGLE_API_KEY").ok().filter(|k| !k.is_empty());
        let model =
            std::env::var("FLOWBIT_MODEL").unwrap_or_else(|_| Self::DEFAULT_MODEL.to_string());

        let data_paths = DataPaths::new(data_dir)?;

        Ok(Self {
            data_paths,
            api_key,
            model,
        })
    }
}
