#![forbid(unsafe_code)]

mod error;
mod requests;
mod schema;
mod term_store;
mod terms;

pub use error::StoreError;
pub use requests::*;

use rusqlite::{Connection, OptionalExtension, params};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use termorder_core::{Term, TermId, Taxonomy};

const DB_FILE: &str = "termorder.db";

/// SQLite-backed term store.
///
/// Resolver reads go through a cache keyed by `(taxonomy, id)` that lives for one batch:
/// `begin_batch` empties it and every order write drops the cached row. The inherent accessors
/// read through.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    storage_dir: PathBuf,
    cache: HashMap<(Taxonomy, TermId), Term>,
}

impl SqliteStore {
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let storage_dir = storage_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&storage_dir)?;

        let db_path = storage_dir.join(DB_FILE);
        let conn = Connection::open(&db_path)?;
        // Another process may hold the write lock briefly; rows are last-writer-wins.
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        schema::install_schema(&conn)?;
        tracing::debug!(path = %db_path.display(), "term store opened");

        Ok(Self {
            conn,
            storage_dir,
            cache: HashMap::new(),
        })
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    fn cached_term(&mut self, id: TermId, taxonomy: &Taxonomy) -> Result<Option<Term>, StoreError> {
        let key = (taxonomy.clone(), id);
        if let Some(term) = self.cache.get(&key) {
            return Ok(Some(term.clone()));
        }
        let Some(term) = self.load_term(id, taxonomy)? else {
            return Ok(None);
        };
        self.cache.insert(key, term.clone());
        Ok(Some(term))
    }

    fn load_term(&self, id: TermId, taxonomy: &Taxonomy) -> Result<Option<Term>, StoreError> {
        let Some(sql_id) = sql_id(id) else {
            return Ok(None);
        };
        let row = self
            .conn
            .query_row(
                "SELECT id, name, parent, sort_order FROM terms WHERE taxonomy=?1 AND id=?2",
                params![taxonomy.as_str(), sql_id],
                raw_term,
            )
            .optional()?;
        row.map(|raw| raw.into_term(taxonomy)).transpose()
    }

    fn invalidate(&mut self, id: TermId, taxonomy: &Taxonomy) {
        self.cache.remove(&(taxonomy.clone(), id));
    }

    fn write_order(&mut self, id: TermId, taxonomy: &Taxonomy, order: i64) -> Result<(), StoreError> {
        let sql_id = sql_id(id).ok_or(StoreError::UnknownTerm(id))?;
        let changed = self.conn.execute(
            "UPDATE terms SET sort_order=?1, updated_at_ms=?2 WHERE taxonomy=?3 AND id=?4",
            params![order, now_ms(), taxonomy.as_str(), sql_id],
        )?;
        self.invalidate(id, taxonomy);
        if changed == 0 {
            return Err(StoreError::UnknownTerm(id));
        }
        Ok(())
    }
}

/// Term ids are stored as SQLite integers; ids beyond `i64::MAX` cannot exist.
fn sql_id(id: TermId) -> Option<i64> {
    i64::try_from(id.get()).ok()
}

fn sql_parent(parent: Option<TermId>) -> Result<Option<i64>, StoreError> {
    match parent {
        Some(id) => sql_id(id).map(Some).ok_or(StoreError::UnknownParent(id)),
        None => Ok(None),
    }
}

struct RawTerm {
    id: i64,
    name: String,
    parent: Option<i64>,
    order: i64,
}

impl RawTerm {
    fn into_term(self, taxonomy: &Taxonomy) -> Result<Term, StoreError> {
        let id = term_id_from_sql(self.id).ok_or(StoreError::CorruptRow("term id"))?;
        let parent = match self.parent {
            Some(raw) => Some(term_id_from_sql(raw).ok_or(StoreError::CorruptRow("parent id"))?),
            None => None,
        };
        Ok(Term {
            id,
            taxonomy: taxonomy.clone(),
            name: self.name,
            parent,
            order: self.order,
        })
    }
}

fn term_id_from_sql(raw: i64) -> Option<TermId> {
    u64::try_from(raw).ok().and_then(TermId::new)
}

fn raw_term(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawTerm> {
    Ok(RawTerm {
        id: row.get(0)?,
        name: row.get(1)?,
        parent: row.get(2)?,
        order: row.get(3)?,
    })
}

fn taxonomy_known(conn: &Connection, taxonomy: &Taxonomy) -> Result<bool, StoreError> {
    let found = conn
        .query_row(
            "SELECT 1 FROM taxonomies WHERE name=?1",
            params![taxonomy.as_str()],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}
