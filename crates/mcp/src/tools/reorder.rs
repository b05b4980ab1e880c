#![forbid(unsafe_code)]

use crate::McpServer;
use crate::{
    PERMISSION_DENIED, ai_error_with, ai_ok, format_order_error, invalid_position,
    invalid_request, move_request_json, optional_anchor, optional_i64, optional_term_ids,
    placements_json, require_taxonomy, require_term_id,
};
use serde_json::{Value, json};
use termorder_core::{DEFAULT_START, MoveRequest, MoveRequestError};

/// One batch of a move. The reply carries `next` when the sibling group did not fit; the client
/// resubmits it verbatim until `next` is null.
pub(super) fn handle(server: &mut McpServer, args: Value) -> Value {
    let Some(args_obj) = args.as_object() else {
        return invalid_request("arguments must be an object");
    };

    let id = match require_term_id(args_obj, "id") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let taxonomy = match require_taxonomy(args_obj, "taxonomy") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let prev = match optional_anchor(args_obj, "prev_id") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let next = match optional_anchor(args_obj, "next_id") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let start = match optional_i64(args_obj, "start") {
        Ok(None | Some(0)) => DEFAULT_START,
        Ok(Some(v)) => v,
        Err(resp) => return resp,
    };
    let excluded = match optional_term_ids(args_obj, "excluded") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let request = match MoveRequest::new(id, taxonomy.clone(), prev, next) {
        Ok(request) => request.with_start(start).with_excluded(excluded),
        Err(MoveRequestError::MissingAnchor) => {
            return invalid_position("send prev_id, next_id or both");
        }
        Err(MoveRequestError::SelfAnchor(term)) => {
            return invalid_position(&format!("term {term} cannot be its own neighbour"));
        }
    };

    if let Err(err) = server.pager.resolver().check_start(start) {
        return format_order_error(err);
    }

    if let Err(err) = server.permissions.check_write(&taxonomy) {
        return ai_error_with(
            PERMISSION_DENIED,
            &format!("Permission denied: {err}"),
            Some("Restart the server without --read-only to reorder terms."),
        );
    }

    match server.pager.advance(&mut server.store, &request) {
        Ok(step) => ai_ok(
            "terms_reorder",
            json!({
                "new_pos": placements_json(&step.applied),
                "next": step.next.as_ref().map(move_request_json),
                "has_children": step.needs_full_refresh,
                "writes": step.writes,
            }),
        ),
        Err(err) => {
            tracing::warn!(term = %id, %taxonomy, error = %err, "reorder failed");
            format_order_error(err)
        }
    }
}
