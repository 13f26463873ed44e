//! SQLite-backed record store.
//!
//! Plays the role Redis hashes played in the original deployment: HSET is an
//! upsert over (key, field) rows, HGETALL is a select over the key.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rusqlite::{params, Connection};
use tracing::info;

use crate::schema::SCHEMA_SQL;
use crate::RecordStore;
use flowbit_core::{Error, Result};

/// Record store backed by a single SQLite file.
pub struct SqliteRecordStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl SqliteRecordStore {
    /// Open or create the store.
    ///
    /// `db_dir` is the directory (e.g., `data/records/`). The file will be
    /// `db_dir/flowbit.db`.
    pub fn open(db_dir: impl AsRef<Path>) -> Result<Self> {
        let db_dir = db_dir.as_ref();
        std::fs::create_dir_all(db_dir).map_err(|e| Error::Storage(e.to_string()))?;
        let db_path = db_dir.join("flowbit.db");

        let conn = Connection::open(&db_path).map_err(|e| Error::Database(e.to_string()))?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(|e| Error::Database(e.to_string()))?;
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| Error::Database(format!("Schema init failed: {}", e)))?;

        info!("SqliteRecordStore initialized: path={}", db_path.display());

        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

impl RecordStore for SqliteRecordStore {
    fn write_fields(&self, key: &str, fields: &[(String, String)]) -> Result<()> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "INSERT INTO records (key, field, value) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key, field) DO UPDATE SET value = excluded.value",
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        for (field, value) in fields {
            stmt.execute(params![key, field, value])
                .map_err(|e| Error::Database(e.to_string()))?;
        }
        Ok(())
    }

    fn read_fields(&self, key: &str) -> Result<HashMap<String, String>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached("SELECT field, value FROM records WHERE key = ?1")
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map(params![key], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(|e| Error::Database(e.to_string()))?;

        let mut map = HashMap::new();
        for row in rows {
            let (field, value) = row.map_err(|e| Error::Database(e.to_string()))?;
            map.insert(field, value);
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_store() -> (tempfile::TempDir, SqliteRecordStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteRecordStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_write_then_read() {
        let (_dir, store) = open_store();
        store
            .write_fields(
                "log:1",
                &[
                    ("intent".to_string(), "Invoice".to_string()),
                    ("source".to_string(), "/tmp/a.pdf".to_string()),
                ],
            )
            .unwrap();

        let hash = store.read_fields("log:1").unwrap();
        assert_eq!(hash.len(), 2);
        assert_eq!(hash["intent"], "Invoice");
    }

    #[test]
    fn test_upsert_overwrites_named_fields_only() {
        let (_dir, store) = open_store();
        store
            .write_fields(
                "log:1",
                &[
                    ("intent".to_string(), "Unknown".to_string()),
                    ("source".to_string(), "/tmp/a.pdf".to_string()),
                ],
            )
            .unwrap();
        store
            .write_fields("log:1", &[("intent".to_string(), "RFQ".to_string())])
            .unwrap();

        let hash = store.read_fields("log:1").unwrap();
        assert_eq!(hash["intent"], "RFQ");
        assert_eq!(hash["source"], "/tmp/a.pdf");
    }

    #[test]
    fn test_unknown_key_reads_empty() {
        let (_dir, store) = open_store();
        assert!(store.read_fields("log:missing").unwrap().is_empty());
        assert!(!store.exists("log:missing").unwrap());
    }
}
