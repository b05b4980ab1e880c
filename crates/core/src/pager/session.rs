#![forbid(unsafe_code)]

use super::{PageStep, SiblingPager};
use crate::error::OrderError;
use crate::model::{MoveRequest, Placements};
use crate::store::TermStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    /// `batch` steps have been applied and a continuation is pending.
    Moving { batch: usize },
    Settled,
    /// A step failed; placements from earlier steps are kept.
    Failed,
    /// Stopped by the caller before settling.
    Cancelled,
}

/// Client-side view of one move across its round trips.
#[derive(Clone, Debug)]
pub struct MoveSession {
    state: SessionState,
    pending: Option<MoveRequest>,
    placements: Placements,
    batches: usize,
    writes: usize,
    needs_full_refresh: bool,
}

impl MoveSession {
    pub fn new(request: MoveRequest) -> Self {
        Self {
            state: SessionState::Idle,
            pending: Some(request),
            placements: Placements::new(),
            batches: 0,
            writes: 0,
            needs_full_refresh: false,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Request to submit next; `None` once the session has stopped.
    pub fn pending(&self) -> Option<&MoveRequest> {
        self.pending.as_ref()
    }

    pub fn placements(&self) -> &Placements {
        &self.placements
    }

    pub fn batches(&self) -> usize {
        self.batches
    }

    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn needs_full_refresh(&self) -> bool {
        self.needs_full_refresh
    }

    pub fn record_step(&mut self, step: PageStep) {
        if self.pending.is_none() {
            return;
        }
        self.batches += 1;
        self.writes += step.writes;
        self.placements.extend(step.applied);
        self.needs_full_refresh = step.needs_full_refresh;
        self.pending = step.next;
        self.state = match self.pending {
            Some(_) => SessionState::Moving {
                batch: self.batches,
            },
            None => SessionState::Settled,
        };
    }

    pub fn record_failure(&mut self, applied: Option<&Placements>) {
        if let Some(applied) = applied {
            self.placements
                .extend(applied.iter().map(|(id, placement)| (*id, *placement)));
        }
        self.pending = None;
        self.state = SessionState::Failed;
    }

    /// Stops resubmitting. Nothing already applied is undone.
    pub fn cancel(&mut self) {
        self.pending = None;
        if matches!(self.state, SessionState::Idle | SessionState::Moving { .. }) {
            self.state = SessionState::Cancelled;
        }
    }
}

/// Submits pending steps until the session settles, fails, or `max_batches` steps ran.
///
/// This is the in-process form of the client loop, for tools and tests. Servers answer one
/// step per request.
pub fn drive<S: TermStore + ?Sized>(
    pager: &SiblingPager,
    store: &mut S,
    session: &mut MoveSession,
    max_batches: usize,
) -> Result<(), OrderError> {
    let mut ran = 0;
    while ran < max_batches {
        let Some(request) = session.pending().cloned() else {
            break;
        };
        match pager.advance(store, &request) {
            Ok(step) => session.record_step(step),
            Err(err) => {
                let applied = match &err {
                    OrderError::StoreWriteFailed { applied, .. } => Some(applied),
                    _ => None,
                };
                session.record_failure(applied);
                return Err(err);
            }
        }
        ran += 1;
    }
    Ok(())
}
