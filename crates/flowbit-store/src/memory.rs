//! In-memory record store for tests and ephemeral runs.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::RecordStore;
use flowbit_core::Result;

/// Hash-per-key store held entirely in memory.
#[derive(Default)]
pub struct MemoryRecordStore {
    records: Mutex<HashMap<String, HashMap<String, String>>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All keys currently present, in no particular order.
    pub fn keys(&self) -> Vec<String> {
        self.records.lock().keys().cloned().collect()
    }
}

impl RecordStore for MemoryRecordStore {
    fn write_fields(&self, key: &str, fields: &[(String, String)]) -> Result<()> {
        let mut records = self.records.lock();
        let entry = records.entry(key.to_string()).or_default();
        for (field, value) in fields {
            entry.insert(field.clone(), value.clone());
        }
        Ok(())
    }

    fn read_fields(&self, key: &str) -> Result<HashMap<String, String>> {
        Ok(self.records.lock().get(key).cloned().unwrap_or_default())
    }
}
