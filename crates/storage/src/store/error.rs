#![forbid(unsafe_code)]

use termorder_core::{TaxonomyError, TermId};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("invalid taxonomy: {0}")]
    InvalidTaxonomy(#[from] TaxonomyError),
    #[error("unknown taxonomy {0}")]
    UnknownTaxonomy(String),
    #[error("unknown term {0}")]
    UnknownTerm(TermId),
    #[error("unknown parent term {0}")]
    UnknownParent(TermId),
    #[error("taxonomy already exists")]
    TaxonomyAlreadyExists,
    #[error("schema version mismatch: expected={expected} stored={stored}")]
    SchemaMismatch {
        expected: &'static str,
        stored: String,
    },
    #[error("stored row is corrupt: {0}")]
    CorruptRow(&'static str),
}
