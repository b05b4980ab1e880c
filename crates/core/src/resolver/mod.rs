#![forbid(unsafe_code)]

mod parent;

pub use parent::{AnchorRef, EffectiveParent, infer_parent};

use crate::error::OrderError;
use crate::hierarchy::AncestorIndex;
use crate::ids::{TermId, Taxonomy};
use crate::model::{BatchOutcome, MoveRequest, Placement, Placements, Term};
use crate::store::TermStore;
use std::collections::BTreeSet;

pub const DEFAULT_BATCH_LIMIT: usize = 100;
pub const MAX_BATCH_LIMIT: usize = 1000;

/// Taxonomies the resolver agrees to reorder.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TaxonomyScope {
    /// Every taxonomy known to the store.
    #[default]
    All,
    Only(BTreeSet<Taxonomy>),
}

impl TaxonomyScope {
    pub fn allows(&self, taxonomy: &Taxonomy) -> bool {
        match self {
            Self::All => true,
            Self::Only(allowed) => allowed.contains(taxonomy),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Siblings processed per call. Clamped to `1..=MAX_BATCH_LIMIT`.
    pub batch_limit: usize,
    pub taxonomies: TaxonomyScope,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            batch_limit: DEFAULT_BATCH_LIMIT,
            taxonomies: TaxonomyScope::All,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct OrderResolver {
    config: ResolverConfig,
}

impl OrderResolver {
    pub fn new(mut config: ResolverConfig) -> Self {
        config.batch_limit = config.batch_limit.clamp(1, MAX_BATCH_LIMIT);
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Fails with `InvalidStart` unless a full batch counted up from `start` stays positive and
    /// within `i64`.
    pub fn check_start(&self, start: i64) -> Result<(), OrderError> {
        // One slot per sibling plus the moved term.
        let span = i64::try_from(self.config.batch_limit + 1).unwrap_or(i64::MAX);
        if start < 1 || start.checked_add(span).is_none() {
            return Err(OrderError::InvalidStart(start));
        }
        Ok(())
    }

    /// Fails with `UnsupportedTaxonomy` unless the store knows `taxonomy` and it is in scope.
    pub fn check_taxonomy<S: TermStore + ?Sized>(
        &self,
        store: &mut S,
        taxonomy: &Taxonomy,
    ) -> Result<(), OrderError> {
        if !self.config.taxonomies.allows(taxonomy) {
            return Err(OrderError::UnsupportedTaxonomy(taxonomy.clone()));
        }
        let exists = store
            .taxonomy_exists(taxonomy)
            .map_err(OrderError::StoreRead)?;
        if !exists {
            return Err(OrderError::UnsupportedTaxonomy(taxonomy.clone()));
        }
        Ok(())
    }

    /// Computes and writes one batch of order values for `request`.
    ///
    /// Writes land in the store one at a time as they are decided. On a write failure the
    /// batch stops; earlier writes stay and are reported in the error.
    pub fn resolve<S: TermStore + ?Sized>(
        &self,
        store: &mut S,
        request: &MoveRequest,
    ) -> Result<BatchOutcome, OrderError> {
        self.check_start(request.start())?;
        store.begin_batch();
        let taxonomy = request.taxonomy();
        self.check_taxonomy(store, taxonomy)?;

        let moved = store
            .get_term(request.term(), taxonomy)
            .map_err(OrderError::StoreRead)?
            .ok_or(OrderError::NotFound(request.term()))?;

        let mut ancestors = AncestorIndex::new(taxonomy);
        ancestors.remember(moved.id, moved.parent);
        let prev = anchor(store, &mut ancestors, request.prev())?;
        let next = anchor(store, &mut ancestors, request.next())?;
        let position = infer_parent(moved.parent, prev, next);
        if prev.is_none() && position.next.is_none() {
            return Err(OrderError::InvalidPosition(moved.id));
        }

        let mut excluded = request.excluded().clone();
        excluded.insert(moved.id);
        let limit = self.config.batch_limit;
        let mut siblings = store
            .list_siblings(position.parent, taxonomy, limit + 1, &excluded)
            .map_err(OrderError::SiblingsFetchFailed)?;
        let more_remaining = siblings.len() > limit;
        siblings.truncate(limit);

        tracing::debug!(
            term = %moved.id,
            %taxonomy,
            parent = ?position.parent,
            next = ?position.next,
            start = request.start(),
            siblings = siblings.len(),
            more_remaining,
            "resolving reorder batch"
        );

        let mut walk = Walk {
            store: &mut *store,
            taxonomy,
            ancestors,
            parent: position.parent,
            counter: request.start(),
            placements: Placements::new(),
            writes: 0,
        };
        let mut settled_early = false;
        for sibling in &siblings {
            if sibling.id == moved.id {
                continue;
            }
            walk.ancestors.remember(sibling.id, sibling.parent);

            if position.next == Some(sibling.id) {
                walk.place(&moved)?;
            }

            // The moved term has its slot and this sibling already sorts after the counter, so
            // the rest of the group is in relative order.
            if walk.placements.contains_key(&moved.id) && sibling.order >= walk.counter {
                settled_early = true;
                break;
            }

            walk.place(sibling)?;

            if position.next.is_none() && request.prev() == Some(sibling.id) {
                walk.place(&moved)?;
            }
        }

        let Walk {
            counter,
            placements,
            writes,
            ..
        } = walk;

        let next = if !settled_early && more_remaining {
            Some(request.continuation(position.next, counter, placements.keys().copied()))
        } else {
            None
        };

        let needs_full_refresh = next.is_none()
            && store
                .count_children(moved.id, taxonomy, 1)
                .map_err(OrderError::StoreRead)?
                > 0;

        tracing::debug!(
            term = %moved.id,
            placed = placements.len(),
            writes,
            settled_early,
            continues = next.is_some(),
            needs_full_refresh,
            "reorder batch done"
        );

        Ok(BatchOutcome {
            placements,
            next,
            needs_full_refresh,
            writes,
        })
    }
}

fn anchor<S: TermStore + ?Sized>(
    store: &mut S,
    ancestors: &mut AncestorIndex<'_>,
    id: Option<TermId>,
) -> Result<Option<AnchorRef>, OrderError> {
    let Some(id) = id else {
        return Ok(None);
    };
    Ok(ancestors
        .parent_of(store, id)?
        .map(|parent| AnchorRef { id, parent }))
}

struct Walk<'a, 't, S: TermStore + ?Sized> {
    store: &'a mut S,
    taxonomy: &'t Taxonomy,
    ancestors: AncestorIndex<'t>,
    parent: Option<TermId>,
    counter: i64,
    placements: Placements,
    writes: usize,
}

impl<S: TermStore + ?Sized> Walk<'_, '_, S> {
    fn place(&mut self, term: &Term) -> Result<(), OrderError> {
        let order = self.counter;
        let depth = self.ancestors.depth_of(&mut *self.store, term.id)?;
        if term.order != order {
            if let Err(source) = self.store.set_order(term.id, self.taxonomy, order) {
                tracing::warn!(term = %term.id, order, error = %source, "order write failed");
                return Err(OrderError::StoreWriteFailed {
                    term: term.id,
                    applied: std::mem::take(&mut self.placements),
                    source,
                });
            }
            self.writes += 1;
            tracing::trace!(term = %term.id, from = term.order, to = order, "order written");
        }
        self.placements.insert(
            term.id,
            Placement {
                order,
                parent: self.parent,
                depth,
            },
        );
        self.counter = order
            .checked_add(1)
            .ok_or(OrderError::InvalidStart(order))?;
        Ok(())
    }
}
