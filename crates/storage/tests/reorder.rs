#![forbid(unsafe_code)]

use termorder_core::pager::drive;
use termorder_core::{
    MoveRequest, MoveSession, OrderResolver, ResolverConfig, SessionState, SiblingPager, TermId,
    TermStore, Taxonomy,
};
use termorder_storage::{CreateTermRequest, ListTermsRequest, SqliteStore};

fn category() -> Taxonomy {
    Taxonomy::try_new("category").expect("taxonomy")
}

fn add(store: &mut SqliteStore, name: &str, parent: Option<TermId>, order: i64) -> TermId {
    store
        .create_term(CreateTermRequest {
            taxonomy: category(),
            name: name.to_string(),
            parent,
            order: Some(order),
        })
        .expect("create term")
        .id
}

fn children(store: &SqliteStore, parent: Option<TermId>) -> Vec<(TermId, i64)> {
    store
        .list_terms(ListTermsRequest {
            taxonomy: category(),
            parent,
            limit: 1000,
            offset: 0,
        })
        .expect("list terms")
        .into_iter()
        .map(|term| (term.id, term.order))
        .collect()
}

#[test]
fn moves_a_term_between_siblings_on_disk() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut store = SqliteStore::open(dir.path()).expect("open store");
    store.create_taxonomy(&category()).expect("create taxonomy");
    let parent = add(&mut store, "P", None, 1);
    let a = add(&mut store, "A", Some(parent), 1);
    let b = add(&mut store, "B", Some(parent), 2);
    let c = add(&mut store, "C", Some(parent), 3);

    let request = MoveRequest::new(c, category(), Some(a), Some(b)).expect("request");
    let out = OrderResolver::default()
        .resolve(&mut store, &request)
        .expect("resolve");

    assert!(out.next.is_none());
    assert_eq!(out.writes, 2);
    assert_eq!(children(&store, Some(parent)), vec![(a, 1), (c, 2), (b, 3)]);
    assert_eq!(out.placements[&c].depth, 1);
}

#[test]
fn large_group_settles_over_two_batches() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut store = SqliteStore::open(dir.path()).expect("open store");
    store.create_taxonomy(&category()).expect("create taxonomy");
    let ids = (1..=150)
        .map(|n| add(&mut store, &format!("term-{n:03}"), None, n))
        .collect::<Vec<_>>();
    let moved = ids[149];

    let pager = SiblingPager::new(OrderResolver::new(ResolverConfig {
        batch_limit: 100,
        ..ResolverConfig::default()
    }));
    let request = MoveRequest::new(moved, category(), Some(ids[0]), Some(ids[1])).expect("request");
    let mut session = MoveSession::new(request);
    drive(&pager, &mut store, &mut session, 10).expect("drive");

    assert_eq!(session.state(), SessionState::Settled);
    assert_eq!(session.batches(), 2);

    let listed = children(&store, None);
    assert_eq!(listed.len(), 150);
    assert_eq!(listed[0].0, ids[0]);
    assert_eq!(listed[1].0, moved);
    assert_eq!(listed[2].0, ids[1]);
    assert!(listed.windows(2).all(|pair| pair[0].1 < pair[1].1));
}

#[test]
fn moving_a_parent_asks_for_a_full_refresh() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut store = SqliteStore::open(dir.path()).expect("open store");
    store.create_taxonomy(&category()).expect("create taxonomy");
    let first = add(&mut store, "First", None, 1);
    let second = add(&mut store, "Second", None, 2);
    add(&mut store, "Child", Some(second), 1);

    let request = MoveRequest::new(second, category(), None, Some(first)).expect("request");
    let out = OrderResolver::default()
        .resolve(&mut store, &request)
        .expect("resolve");

    assert!(out.needs_full_refresh);
    assert_eq!(children(&store, None), vec![(second, 1), (first, 2)]);
}

#[test]
fn batches_see_writes_made_by_another_connection() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut store = SqliteStore::open(dir.path()).expect("open store");
    store.create_taxonomy(&category()).expect("create taxonomy");
    let a = add(&mut store, "A", None, 1);
    let b = add(&mut store, "B", None, 2);
    let c = add(&mut store, "C", None, 3);
    assert_eq!(store.get_term(c, &category()).expect("read").expect("term").order, 3);

    let mut other = SqliteStore::open(dir.path()).expect("second connection");
    assert!(other.term_order_set(c, &category(), 9).expect("edit order"));
    assert_eq!(store.term(c, &category()).expect("read").expect("term").order, 9);

    let request = MoveRequest::new(c, category(), Some(a), Some(b)).expect("request");
    let out = OrderResolver::default()
        .resolve(&mut store, &request)
        .expect("resolve");

    assert_eq!(out.placements[&c].order, 2);
    assert_eq!(out.writes, 2);
    assert_eq!(children(&other, None), vec![(a, 1), (c, 2), (b, 3)]);

    let again = OrderResolver::default()
        .resolve(&mut store, &request)
        .expect("resubmit");
    assert_eq!(again.writes, 0);
}
