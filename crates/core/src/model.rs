#![forbid(unsafe_code)]

use crate::ids::{TermId, Taxonomy};
use std::collections::{BTreeMap, BTreeSet};

/// Order value of a freshly started move when the caller does not supply one.
pub const DEFAULT_START: i64 = 1;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Term {
    pub id: TermId,
    pub taxonomy: Taxonomy,
    pub name: String,
    pub parent: Option<TermId>,
    pub order: i64,
}

/// Position assigned to one term by a batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub order: i64,
    pub parent: Option<TermId>,
    pub depth: usize,
}

pub type Placements = BTreeMap<TermId, Placement>;

/// One unit of reorder work: place `term` relative to `prev`/`next`, starting the sibling
/// counter at `start` and skipping every id in `excluded`.
///
/// Continuations produced by the resolver use the same shape, so a client can resubmit them
/// verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveRequest {
    term: TermId,
    taxonomy: Taxonomy,
    prev: Option<TermId>,
    next: Option<TermId>,
    start: i64,
    excluded: BTreeSet<TermId>,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MoveRequestError {
    #[error("a move needs a previous or a next sibling")]
    MissingAnchor,
    #[error("term {0} cannot be its own anchor")]
    SelfAnchor(TermId),
}

impl MoveRequest {
    pub fn new(
        term: TermId,
        taxonomy: Taxonomy,
        prev: Option<TermId>,
        next: Option<TermId>,
    ) -> Result<Self, MoveRequestError> {
        if prev.is_none() && next.is_none() {
            return Err(MoveRequestError::MissingAnchor);
        }
        if prev == Some(term) || next == Some(term) {
            return Err(MoveRequestError::SelfAnchor(term));
        }
        let mut excluded = BTreeSet::new();
        excluded.insert(term);
        Ok(Self {
            term,
            taxonomy,
            prev,
            next,
            start: DEFAULT_START,
            excluded,
        })
    }

    pub fn with_start(mut self, start: i64) -> Self {
        self.start = start;
        self
    }

    /// Adds ids to skip when fetching siblings. The moved term always stays excluded.
    pub fn with_excluded(mut self, ids: impl IntoIterator<Item = TermId>) -> Self {
        self.excluded.extend(ids);
        self
    }

    pub(crate) fn continuation(
        &self,
        next: Option<TermId>,
        start: i64,
        placed: impl IntoIterator<Item = TermId>,
    ) -> Self {
        let mut excluded = self.excluded.clone();
        excluded.extend(placed);
        Self {
            term: self.term,
            taxonomy: self.taxonomy.clone(),
            prev: self.prev,
            next,
            start,
            excluded,
        }
    }

    pub fn term(&self) -> TermId {
        self.term
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn prev(&self) -> Option<TermId> {
        self.prev
    }

    pub fn next(&self) -> Option<TermId> {
        self.next
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn excluded(&self) -> &BTreeSet<TermId> {
        &self.excluded
    }
}

/// Result of one resolver batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchOutcome {
    pub placements: Placements,
    /// Request to resubmit when more siblings remain.
    pub next: Option<MoveRequest>,
    /// The move settled and the moved term has children, so incremental view patching is not
    /// enough.
    pub needs_full_refresh: bool,
    /// Number of `set_order` calls issued.
    pub writes: usize,
}
