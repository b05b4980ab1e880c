#![forbid(unsafe_code)]

use crate::error::OrderError;
use crate::ids::{TermId, Taxonomy};
use crate::store::TermStore;
use std::collections::{HashMap, HashSet};

/// Longest parent chain accepted before it is treated as corrupt.
pub const MAX_DEPTH: usize = 256;

/// Per-batch memo of parent pointers and depths.
///
/// Depth is the number of ancestors above a term. Lookups walk parent ids iteratively; a
/// revisited id or a chain longer than [`MAX_DEPTH`] is reported as
/// [`OrderError::HierarchyCycle`].
#[derive(Debug)]
pub struct AncestorIndex<'t> {
    taxonomy: &'t Taxonomy,
    parents: HashMap<TermId, Option<TermId>>,
    depths: HashMap<TermId, usize>,
}

impl<'t> AncestorIndex<'t> {
    pub fn new(taxonomy: &'t Taxonomy) -> Self {
        Self {
            taxonomy,
            parents: HashMap::new(),
            depths: HashMap::new(),
        }
    }

    /// Seeds a parent pointer that is already known, e.g. from a fetched sibling row.
    pub fn remember(&mut self, id: TermId, parent: Option<TermId>) {
        self.parents.entry(id).or_insert(parent);
    }

    /// Parent of `id`; outer `None` when the term does not exist.
    pub fn parent_of<S: TermStore + ?Sized>(
        &mut self,
        store: &mut S,
        id: TermId,
    ) -> Result<Option<Option<TermId>>, OrderError> {
        if let Some(parent) = self.parents.get(&id) {
            return Ok(Some(*parent));
        }
        let looked_up = store
            .get_parent_id(id, self.taxonomy)
            .map_err(OrderError::StoreRead)?;
        if let Some(parent) = looked_up {
            self.parents.insert(id, parent);
        }
        Ok(looked_up)
    }

    pub fn depth_of<S: TermStore + ?Sized>(
        &mut self,
        store: &mut S,
        id: TermId,
    ) -> Result<usize, OrderError> {
        if let Some(depth) = self.depths.get(&id) {
            return Ok(*depth);
        }

        let mut chain = vec![id];
        let mut seen = HashSet::from([id]);
        let mut base = 0usize;
        let mut cursor = id;
        loop {
            let parent = match self.parent_of(store, cursor)? {
                Some(Some(parent)) => parent,
                // Top level, or a dangling parent pointer: the chain ends here.
                Some(None) | None => break,
            };
            if let Some(known) = self.depths.get(&parent) {
                base = known + 1;
                break;
            }
            if !seen.insert(parent) || chain.len() > MAX_DEPTH {
                return Err(OrderError::HierarchyCycle(id));
            }
            chain.push(parent);
            cursor = parent;
        }

        // `chain` runs from `id` up to the topmost term walked; fill depths top-down.
        let top = chain.len() - 1;
        if base + top > MAX_DEPTH {
            return Err(OrderError::HierarchyCycle(id));
        }
        for (index, term) in chain.iter().enumerate() {
            self.depths.insert(*term, base + (top - index));
        }
        Ok(base + top)
    }
}
