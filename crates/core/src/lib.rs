#![forbid(unsafe_code)]

//! Relative ordering of taxonomy terms.
//!
//! [`resolver::OrderResolver`] places one moved term among its siblings and rewrites the
//! minimal run of order values around it; [`pager::SiblingPager`] bounds that work per call and
//! hands back a continuation when a sibling group is larger than one batch.

mod error;
pub mod hierarchy;
pub mod ids;
pub mod memory;
pub mod model;
pub mod pager;
pub mod resolver;
pub mod store;

pub use error::OrderError;
pub use ids::{TermId, Taxonomy, TaxonomyError};
pub use model::{
    BatchOutcome, DEFAULT_START, MoveRequest, MoveRequestError, Placement, Placements, Term,
};
pub use pager::{MoveSession, PageStep, SessionState, SiblingPager};
pub use resolver::{
    DEFAULT_BATCH_LIMIT, MAX_BATCH_LIMIT, OrderResolver, ResolverConfig, TaxonomyScope,
};
pub use store::{StoreFailure, TermStore};
