#![forbid(unsafe_code)]

use super::*;
use std::collections::BTreeSet;
use termorder_core::{StoreFailure, TermStore};

impl TermStore for SqliteStore {
    fn begin_batch(&mut self) {
        if !self.cache.is_empty() {
            tracing::trace!(cached = self.cache.len(), "term cache dropped");
            self.cache.clear();
        }
    }

    fn taxonomy_exists(&mut self, taxonomy: &Taxonomy) -> Result<bool, StoreFailure> {
        Ok(taxonomy_known(&self.conn, taxonomy)?)
    }

    fn get_term(&mut self, id: TermId, taxonomy: &Taxonomy) -> Result<Option<Term>, StoreFailure> {
        Ok(self.cached_term(id, taxonomy)?)
    }

    fn get_parent_id(
        &mut self,
        id: TermId,
        taxonomy: &Taxonomy,
    ) -> Result<Option<Option<TermId>>, StoreFailure> {
        Ok(self.cached_term(id, taxonomy)?.map(|term| term.parent))
    }

    fn list_siblings(
        &mut self,
        parent: Option<TermId>,
        taxonomy: &Taxonomy,
        limit: usize,
        exclude: &BTreeSet<TermId>,
    ) -> Result<Vec<Term>, StoreFailure> {
        let siblings = self.select_children(taxonomy, parent, exclude, limit, 0)?;
        tracing::trace!(
            taxonomy = %taxonomy,
            parent = ?parent,
            fetched = siblings.len(),
            "siblings loaded"
        );
        Ok(siblings)
    }

    fn set_order(
        &mut self,
        id: TermId,
        taxonomy: &Taxonomy,
        order: i64,
    ) -> Result<(), StoreFailure> {
        Ok(self.write_order(id, taxonomy, order)?)
    }

    fn count_children(
        &mut self,
        id: TermId,
        taxonomy: &Taxonomy,
        limit: usize,
    ) -> Result<usize, StoreFailure> {
        let Some(sql_id) = sql_id(id) else {
            return Ok(0);
        };
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM (SELECT 1 FROM terms WHERE taxonomy=?1 AND parent=?2 LIMIT ?3)",
            params![taxonomy.as_str(), sql_id, limit],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}
