#![forbid(unsafe_code)]

use crate::ids::{TermId, Taxonomy};
use crate::model::Placements;
use crate::store::StoreFailure;

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("taxonomy {0} does not support term ordering")]
    UnsupportedTaxonomy(Taxonomy),
    #[error("term {0} not found")]
    NotFound(TermId),
    #[error("anchors of term {0} do not resolve to a position")]
    InvalidPosition(TermId),
    #[error("start order {0} leaves no room for a batch")]
    InvalidStart(i64),
    #[error("parent chain of term {0} loops or exceeds the depth limit")]
    HierarchyCycle(TermId),
    #[error("failed to fetch siblings: {0}")]
    SiblingsFetchFailed(#[source] StoreFailure),
    #[error("store read failed: {0}")]
    StoreRead(#[source] StoreFailure),
    /// Placements in `applied` were already written; nothing after `term` was attempted.
    #[error("failed to write order of term {term}: {source}")]
    StoreWriteFailed {
        term: TermId,
        applied: Placements,
        #[source]
        source: StoreFailure,
    },
}
