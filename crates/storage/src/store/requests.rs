#![forbid(unsafe_code)]

use termorder_core::{TermId, Taxonomy};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateTermRequest {
    pub taxonomy: Taxonomy,
    pub name: String,
    pub parent: Option<TermId>,
    /// Initial order; terms created without one sort first (order 0) until reordered.
    pub order: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListTermsRequest {
    pub taxonomy: Taxonomy,
    pub parent: Option<TermId>,
    pub limit: usize,
    pub offset: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaxonomyRow {
    pub taxonomy: Taxonomy,
    pub term_count: u64,
    pub created_at_ms: i64,
}
