#![forbid(unsafe_code)]

use super::StoreError;
use rusqlite::Connection;

pub(super) const SCHEMA_VERSION: &str = "1";

const SQL: &str = r#"
        CREATE TABLE IF NOT EXISTS meta (
          key TEXT PRIMARY KEY,
          value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS taxonomies (
          name TEXT PRIMARY KEY,
          created_at_ms INTEGER NOT NULL
        );

        -- `parent` is NULL for top-level terms. `sort_order` is not unique; readers break ties by
        -- name, then id.
        CREATE TABLE IF NOT EXISTS terms (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          taxonomy TEXT NOT NULL,
          name TEXT NOT NULL,
          parent INTEGER,
          sort_order INTEGER NOT NULL DEFAULT 0,
          created_at_ms INTEGER NOT NULL,
          updated_at_ms INTEGER NOT NULL,
          FOREIGN KEY(taxonomy) REFERENCES taxonomies(name) ON DELETE CASCADE,
          CHECK(parent IS NULL OR parent <> id)
        );

        CREATE INDEX IF NOT EXISTS idx_terms_siblings
          ON terms(taxonomy, parent, sort_order, name, id);
"#;

pub(super) fn install_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(SQL)?;
    conn.execute(
        "INSERT OR IGNORE INTO meta(key, value) VALUES ('schema_version', ?1)",
        [SCHEMA_VERSION],
    )?;
    let stored: String = conn.query_row(
        "SELECT value FROM meta WHERE key='schema_version'",
        [],
        |row| row.get(0),
    )?;
    if stored != SCHEMA_VERSION {
        return Err(StoreError::SchemaMismatch {
            expected: SCHEMA_VERSION,
            stored,
        });
    }
    Ok(())
}
