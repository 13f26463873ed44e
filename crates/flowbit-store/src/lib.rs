//! Flowbit Store — flat hash-per-key record storage.
//!
//! A record is addressed by a string key and holds string fields; structured
//! values are stored as JSON-encoded text and decoded by readers. Writes are
//! field-level upserts with no transactions beyond a single statement.

pub mod memory;
pub mod schema;
pub mod sqlite;

use std::collections::HashMap;

use flowbit_core::Result;

pub use memory::MemoryRecordStore;
pub use sqlite::SqliteRecordStore;

/// Hash-per-key store. Implementations are injected into the pipeline so
/// tests can substitute an in-memory double.
pub trait RecordStore: Send + Sync {
    /// Upsert the given fields on a key, creating the record if absent.
    /// Existing fields not named are left untouched.
    fn write_fields(&self, key: &str, fields: &[(String, String)]) -> Result<()>;

    /// Read all fields for a key. An unknown key yields an empty map.
    fn read_fields(&self, key: &str) -> Result<HashMap<String, String>>;

    /// Whether any field exists for the key.
    fn exists(&self, key: &str) -> Result<bool> {
        Ok(!self.read_fields(key)?.is_empty())
    }
}
