#![forbid(unsafe_code)]

mod support;

use serde_json::{Value, json};
use support::*;
use termorder_core::{TermId, Taxonomy};
use termorder_storage::ListTermsRequest;

fn order_of(server: &Server, taxonomy: &Taxonomy, id: TermId) -> i64 {
    server
        .open_store()
        .term(id, taxonomy)
        .expect("read term")
        .expect("term exists")
        .order
}

#[test]
fn move_between_two_siblings() {
    let (mut server, (tax, [p, a, b, c])) = Server::start_seeded(&[], |seed| {
        let tax = seed.taxonomy("category");
        let p = seed.term(&tax, "Parent", None, 1);
        let a = seed.term(&tax, "A", Some(p), 1);
        let b = seed.term(&tax, "B", Some(p), 2);
        let c = seed.term(&tax, "C", Some(p), 3);
        (tax, [p, a, b, c])
    });
    server.initialize_default();

    let body = server.call(
        2,
        "terms_reorder",
        json!({ "id": c.get(), "taxonomy": "category", "prev_id": a.get(), "next_id": b.get() }),
    );
    assert_eq!(body["success"], true, "{body}");
    assert_eq!(body["intent"], "terms_reorder");
    let new_pos = &body["result"]["new_pos"];
    assert_eq!(new_pos[c.to_string()]["order"], 2);
    assert_eq!(new_pos[b.to_string()]["order"], 3);
    assert_eq!(new_pos[c.to_string()]["parent"], p.get());
    assert_eq!(body["result"]["next"], Value::Null);
    assert_eq!(body["result"]["has_children"], false);

    assert_eq!(order_of(&server, &tax, a), 1);
    assert_eq!(order_of(&server, &tax, c), 2);
    assert_eq!(order_of(&server, &tax, b), 3);

    let again = server.call(
        3,
        "terms_reorder",
        json!({ "id": c.get(), "taxonomy": "category", "prev_id": a.get(), "next_id": b.get() }),
    );
    assert_eq!(again["result"]["writes"], 0);
}

#[test]
fn client_loop_settles_a_large_group() {
    let (mut server, (tax, ids)) = Server::start_seeded(&["--batch-limit", "10"], |seed| {
        let tax = seed.taxonomy("category");
        let ids = (1..=25)
            .map(|n| seed.term(&tax, &format!("term-{n:02}"), None, n))
            .collect::<Vec<_>>();
        (tax, ids)
    });
    server.initialize_default();

    let mut args = json!({
        "id": ids[24].get(),
        "taxonomy": "category",
        "prev_id": ids[0].get(),
        "next_id": ids[1].get()
    });
    let mut calls = 0;
    loop {
        calls += 1;
        assert!(calls <= 5, "move did not settle");
        let body = server.call(10 + calls, "terms_reorder", args);
        assert_eq!(body["success"], true, "{body}");
        let next = body["result"]["next"].clone();
        if next.is_null() {
            break;
        }
        args = next;
    }
    assert_eq!(calls, 3);

    let listed = server
        .open_store()
        .list_terms(ListTermsRequest {
            taxonomy: tax,
            parent: None,
            limit: 100,
            offset: 0,
        })
        .expect("list terms");
    let ids_in_order = listed.iter().map(|t| t.id).collect::<Vec<_>>();
    assert_eq!(ids_in_order[0], ids[0]);
    assert_eq!(ids_in_order[1], ids[24]);
    assert_eq!(ids_in_order[2], ids[1]);
    assert!(listed.windows(2).all(|pair| pair[0].order < pair[1].order));
}

#[test]
fn moving_a_parent_signals_a_full_refresh() {
    let (mut server, [first, second]) = Server::start_seeded(&[], |seed| {
        let tax = seed.taxonomy("category");
        let first = seed.term(&tax, "First", None, 1);
        let second = seed.term(&tax, "Second", None, 2);
        seed.term(&tax, "Child", Some(second), 1);
        [first, second]
    });
    server.initialize_default();

    let body = server.call(
        2,
        "terms_reorder",
        json!({ "id": second.get(), "taxonomy": "category", "prev_id": null, "next_id": first.get() }),
    );
    assert_eq!(body["success"], true, "{body}");
    assert_eq!(body["result"]["has_children"], true);
}

#[test]
fn read_only_server_denies_writes_but_lists() {
    let (mut server, (tax, [a, b])) = Server::start_seeded(&["--read-only"], |seed| {
        let tax = seed.taxonomy("category");
        let a = seed.term(&tax, "A", None, 1);
        let b = seed.term(&tax, "B", None, 2);
        (tax, [a, b])
    });
    server.initialize_default();

    let body = server.call(
        2,
        "terms_reorder",
        json!({ "id": b.get(), "taxonomy": "category", "next_id": a.get() }),
    );
    assert_eq!(body["error"]["code"], "PERMISSION_DENIED");
    assert_eq!(order_of(&server, &tax, b), 2);

    let body = server.call(
        3,
        "term_order_set",
        json!({ "id": b.get(), "taxonomy": "category", "order": 0 }),
    );
    assert_eq!(body["error"]["code"], "PERMISSION_DENIED");

    let listed = server.call(4, "terms_list", json!({ "taxonomy": "category" }));
    assert_eq!(listed["result"]["count"], 2);
}

#[test]
fn taxonomy_allowlist_and_missing_input() {
    let (mut server, [a, b]) = Server::start_seeded(&["--taxonomy", "genre"], |seed| {
        let tax = seed.taxonomy("category");
        seed.taxonomy("genre");
        [seed.term(&tax, "A", None, 1), seed.term(&tax, "B", None, 2)]
    });
    server.initialize_default();

    let body = server.call(
        2,
        "terms_reorder",
        json!({ "id": b.get(), "taxonomy": "category", "next_id": a.get() }),
    );
    assert_eq!(body["error"]["code"], "INVALID_TAXONOMY");

    let body = server.call(3, "terms_reorder", json!({ "id": b.get() }));
    assert_eq!(body["error"]["code"], "INVALID_REQUEST");

    let body = server.call(
        4,
        "terms_reorder",
        json!({ "id": b.get(), "taxonomy": "genre", "prev_id": "", "next_id": false }),
    );
    assert_eq!(body["error"]["code"], "INVALID_POSITION");

    let listed = server.call(5, "taxonomies_list", json!({}));
    let rows = listed["result"]["taxonomies"].as_array().expect("rows");
    let orderable = rows
        .iter()
        .map(|row| {
            (
                row["taxonomy"].as_str().unwrap_or(""),
                row["orderable"].as_bool().unwrap_or(false),
            )
        })
        .collect::<Vec<_>>();
    assert_eq!(orderable, vec![("category", false), ("genre", true)]);
}
