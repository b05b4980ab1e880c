#![forbid(unsafe_code)]

mod session;

pub use session::{MoveSession, SessionState, drive};

use crate::error::OrderError;
use crate::model::{BatchOutcome, MoveRequest, Placements};
use crate::resolver::OrderResolver;
use crate::store::TermStore;

/// Output of one pager step: what was applied, and what to resubmit if anything.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageStep {
    pub applied: Placements,
    pub next: Option<MoveRequest>,
    pub needs_full_refresh: bool,
    pub writes: usize,
}

impl From<BatchOutcome> for PageStep {
    fn from(outcome: BatchOutcome) -> Self {
        Self {
            applied: outcome.placements,
            next: outcome.next,
            needs_full_refresh: outcome.needs_full_refresh,
            writes: outcome.writes,
        }
    }
}

/// Runs exactly one resolver batch per call. Looping over continuations is the caller's job.
#[derive(Clone, Debug, Default)]
pub struct SiblingPager {
    resolver: OrderResolver,
}

impl SiblingPager {
    pub fn new(resolver: OrderResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &OrderResolver {
        &self.resolver
    }

    pub fn advance<S: TermStore + ?Sized>(
        &self,
        store: &mut S,
        request: &MoveRequest,
    ) -> Result<PageStep, OrderError> {
        let step = PageStep::from(self.resolver.resolve(store, request)?);
        tracing::info!(
            term = %request.term(),
            taxonomy = %request.taxonomy(),
            start = request.start(),
            applied = step.applied.len(),
            writes = step.writes,
            continues = step.next.is_some(),
            "reorder step"
        );
        Ok(step)
    }
}
