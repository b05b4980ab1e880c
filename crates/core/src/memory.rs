#![forbid(unsafe_code)]

//! In-memory term arena: terms keyed by `(taxonomy, id)` with parent pointers resolved by id
//! lookups. Records every order write, and can be told to fail a given write to exercise
//! partial-batch behavior.

use crate::ids::{TermId, Taxonomy};
use crate::model::Term;
use crate::store::{StoreFailure, TermStore};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, thiserror::Error)]
pub enum MemoryStoreError {
    #[error("write #{attempt} rejected")]
    InjectedWriteFailure { attempt: usize },
    #[error("injected read failure")]
    InjectedReadFailure,
    #[error("unknown term {0}")]
    UnknownTerm(TermId),
}

#[derive(Clone, Debug, Default)]
pub struct MemoryTermStore {
    taxonomies: BTreeSet<Taxonomy>,
    terms: BTreeMap<(Taxonomy, TermId), Term>,
    writes: Vec<(TermId, i64)>,
    write_attempts: usize,
    fail_write_at: Option<usize>,
    fail_sibling_reads: bool,
}

impl MemoryTermStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_taxonomy(&mut self, taxonomy: Taxonomy) {
        self.taxonomies.insert(taxonomy);
    }

    /// Inserts or replaces a term; its taxonomy is registered on the way.
    pub fn insert(&mut self, term: Term) {
        self.taxonomies.insert(term.taxonomy.clone());
        self.terms.insert((term.taxonomy.clone(), term.id), term);
    }

    pub fn term(&self, id: TermId, taxonomy: &Taxonomy) -> Option<&Term> {
        self.terms.get(&(taxonomy.clone(), id))
    }

    pub fn order_of(&self, id: TermId, taxonomy: &Taxonomy) -> Option<i64> {
        self.term(id, taxonomy).map(|term| term.order)
    }

    /// Children of `parent` in display order.
    pub fn children(&self, parent: Option<TermId>, taxonomy: &Taxonomy) -> Vec<Term> {
        let mut out = self
            .terms
            .values()
            .filter(|term| &term.taxonomy == taxonomy && term.parent == parent)
            .cloned()
            .collect::<Vec<_>>();
        sort_for_display(&mut out);
        out
    }

    /// Successful order writes, oldest first.
    pub fn writes(&self) -> &[(TermId, i64)] {
        &self.writes
    }

    /// Write calls seen since the last `fail_write_at`, including rejected ones.
    pub fn write_attempts(&self) -> usize {
        self.write_attempts
    }

    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }

    /// Fails the `attempt`-th write (1-based, counted from now) and every write after it.
    pub fn fail_write_at(&mut self, attempt: usize) {
        self.write_attempts = 0;
        self.fail_write_at = Some(attempt);
    }

    pub fn fail_sibling_reads(&mut self, fail: bool) {
        self.fail_sibling_reads = fail;
    }
}

pub(crate) fn sort_for_display(terms: &mut [Term]) {
    terms.sort_by(|a, b| {
        a.order
            .cmp(&b.order)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    });
}

impl TermStore for MemoryTermStore {
    fn taxonomy_exists(&mut self, taxonomy: &Taxonomy) -> Result<bool, StoreFailure> {
        Ok(self.taxonomies.contains(taxonomy))
    }

    fn get_term(&mut self, id: TermId, taxonomy: &Taxonomy) -> Result<Option<Term>, StoreFailure> {
        Ok(self.term(id, taxonomy).cloned())
    }

    fn get_parent_id(
        &mut self,
        id: TermId,
        taxonomy: &Taxonomy,
    ) -> Result<Option<Option<TermId>>, StoreFailure> {
        Ok(self.term(id, taxonomy).map(|term| term.parent))
    }

    fn list_siblings(
        &mut self,
        parent: Option<TermId>,
        taxonomy: &Taxonomy,
        limit: usize,
        exclude: &BTreeSet<TermId>,
    ) -> Result<Vec<Term>, StoreFailure> {
        if self.fail_sibling_reads {
            return Err(Box::new(MemoryStoreError::InjectedReadFailure));
        }
        let mut siblings = self.children(parent, taxonomy);
        siblings.retain(|term| !exclude.contains(&term.id));
        siblings.truncate(limit);
        Ok(siblings)
    }

    fn set_order(
        &mut self,
        id: TermId,
        taxonomy: &Taxonomy,
        order: i64,
    ) -> Result<(), StoreFailure> {
        self.write_attempts += 1;
        if let Some(fail_at) = self.fail_write_at
            && self.write_attempts >= fail_at
        {
            return Err(Box::new(MemoryStoreError::InjectedWriteFailure {
                attempt: self.write_attempts,
            }));
        }
        let Some(term) = self.terms.get_mut(&(taxonomy.clone(), id)) else {
            return Err(Box::new(MemoryStoreError::UnknownTerm(id)));
        };
        term.order = order;
        self.writes.push((id, order));
        Ok(())
    }

    fn count_children(
        &mut self,
        id: TermId,
        taxonomy: &Taxonomy,
        limit: usize,
    ) -> Result<usize, StoreFailure> {
        let count = self
            .terms
            .values()
            .filter(|term| &term.taxonomy == taxonomy && term.parent == Some(id))
            .take(limit)
            .count();
        Ok(count)
    }
}
