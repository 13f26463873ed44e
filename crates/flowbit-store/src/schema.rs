//! Database schema SQL for the record log.

/// One row per (key, field) pair; the hash for a key is the set of its rows.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS records (
    key TEXT NOT NULL,
    field TEXT NOT NULL,
    value TEXT NOT NULL,
    PRIMARY KEY (key, field)
);

CREATE INDEX IF NOT EXISTS idx_records_key ON records(key);
"#;
