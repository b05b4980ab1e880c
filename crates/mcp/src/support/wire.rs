#![forbid(unsafe_code)]

use serde_json::{Map, Value, json};
use termorder_core::{MoveRequest, Placements, Term, TermId};

fn id_json(id: Option<TermId>) -> Value {
    match id {
        Some(id) => json!(id.get()),
        None => Value::Null,
    }
}

/// `{ "<id>": { order, parent, depth } }`, keyed by decimal id.
pub(crate) fn placements_json(placements: &Placements) -> Value {
    let mut out = Map::new();
    for (id, placement) in placements {
        out.insert(
            id.to_string(),
            json!({
                "order": placement.order,
                "parent": id_json(placement.parent),
                "depth": placement.depth,
            }),
        );
    }
    Value::Object(out)
}

/// Continuation in the same shape `terms_reorder` accepts, so clients can resubmit it as is.
pub(crate) fn move_request_json(request: &MoveRequest) -> Value {
    json!({
        "id": request.term().get(),
        "taxonomy": request.taxonomy().as_str(),
        "prev_id": id_json(request.prev()),
        "next_id": id_json(request.next()),
        "start": request.start(),
        "excluded": request.excluded().iter().map(|id| id.get()).collect::<Vec<_>>(),
    })
}

pub(crate) fn term_json(term: &Term) -> Value {
    json!({
        "id": term.id.get(),
        "taxonomy": term.taxonomy.as_str(),
        "name": term.name,
        "parent": id_json(term.parent),
        "order": term.order,
    })
}
