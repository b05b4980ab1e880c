#![forbid(unsafe_code)]

use crate::ids::TermId;

/// A positional anchor that exists in the store, with its stored parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnchorRef {
    pub id: TermId,
    pub parent: Option<TermId>,
}

/// Parent group a move lands in, and the successor that survived inference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectiveParent {
    pub parent: Option<TermId>,
    pub next: Option<TermId>,
}

/// Picks the parent group for a move from the moved term's `current` parent and its anchors.
///
/// Rules, first match wins:
/// 1. `prev` is the parent of `next`: the move nests inside `prev`.
/// 2. Both anchors share a parent: that parent.
/// 3. `next`'s parent differs from `current`: `next`'s parent.
/// 4. `prev`'s parent differs from `current`: `prev`'s parent.
/// 5. Otherwise `current`.
///
/// `next` is dropped when it does not live under the chosen parent.
pub fn infer_parent(
    current: Option<TermId>,
    prev: Option<AnchorRef>,
    next: Option<AnchorRef>,
) -> EffectiveParent {
    let parent = match (prev, next) {
        (Some(prev), Some(next)) if next.parent == Some(prev.id) => Some(prev.id),
        (Some(prev), Some(next)) if prev.parent == next.parent => prev.parent,
        (_, Some(next)) if next.parent != current => next.parent,
        (Some(prev), _) if prev.parent != current => prev.parent,
        _ => current,
    };
    let next = next
        .filter(|anchor| anchor.parent == parent)
        .map(|anchor| anchor.id);
    EffectiveParent { parent, next }
}
