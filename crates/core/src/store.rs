#![forbid(unsafe_code)]

use crate::ids::{TermId, Taxonomy};
use crate::model::Term;
use std::collections::BTreeSet;

/// Error produced by a store backend.
pub type StoreFailure = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Read/write access to terms, consumed by the resolver.
///
/// Implementations own their caching. A cache may live for one batch at most: `begin_batch`
/// drops everything read before it. `set_order` must drop any cached read of the term it
/// writes before returning, so later reads in the same batch observe the new value.
pub trait TermStore {
    /// Called by the resolver before the first read of every batch.
    fn begin_batch(&mut self) {}

    fn taxonomy_exists(&mut self, taxonomy: &Taxonomy) -> Result<bool, StoreFailure>;

    fn get_term(&mut self, id: TermId, taxonomy: &Taxonomy) -> Result<Option<Term>, StoreFailure>;

    /// Outer `None` when the term does not exist; inner `None` for a top-level term.
    fn get_parent_id(
        &mut self,
        id: TermId,
        taxonomy: &Taxonomy,
    ) -> Result<Option<Option<TermId>>, StoreFailure>;

    /// Children of `parent` sorted by order, then name, then id.
    fn list_siblings(
        &mut self,
        parent: Option<TermId>,
        taxonomy: &Taxonomy,
        limit: usize,
        exclude: &BTreeSet<TermId>,
    ) -> Result<Vec<Term>, StoreFailure>;

    fn set_order(&mut self, id: TermId, taxonomy: &Taxonomy, order: i64)
    -> Result<(), StoreFailure>;

    fn count_children(
        &mut self,
        id: TermId,
        taxonomy: &Taxonomy,
        limit: usize,
    ) -> Result<usize, StoreFailure>;
}
