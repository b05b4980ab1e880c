#![forbid(unsafe_code)]

use crate::McpServer;
use crate::{
    PERMISSION_DENIED, ai_error_with, ai_ok, ai_ok_with_warnings, format_order_error,
    format_store_error, invalid_request, optional_anchor, optional_usize, require_i64,
    require_taxonomy, require_term_id, term_json, warning,
};
use serde_json::{Value, json};
use termorder_core::DEFAULT_BATCH_LIMIT;
use termorder_storage::ListTermsRequest;

const MAX_LIST_LIMIT: usize = 1000;

pub(super) fn handle_list(server: &mut McpServer, args: Value) -> Value {
    let Some(args_obj) = args.as_object() else {
        return invalid_request("arguments must be an object");
    };
    let taxonomy = match require_taxonomy(args_obj, "taxonomy") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let parent = match optional_anchor(args_obj, "parent") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let limit = match optional_usize(args_obj, "limit") {
        Ok(v) => v.unwrap_or(DEFAULT_BATCH_LIMIT).clamp(1, MAX_LIST_LIMIT),
        Err(resp) => return resp,
    };
    let offset = match optional_usize(args_obj, "offset") {
        Ok(v) => v.unwrap_or(0),
        Err(resp) => return resp,
    };

    if let Err(err) = server
        .pager
        .resolver()
        .check_taxonomy(&mut server.store, &taxonomy)
    {
        return format_order_error(err);
    }

    let listed = server.store.list_terms(ListTermsRequest {
        taxonomy: taxonomy.clone(),
        parent,
        limit,
        offset,
    });
    match listed {
        Ok(terms) => ai_ok(
            "terms_list",
            json!({
                "taxonomy": taxonomy.as_str(),
                "parent": parent.map(|id| id.get()),
                "count": terms.len(),
                "terms": terms.iter().map(term_json).collect::<Vec<_>>(),
            }),
        ),
        Err(err) => format_store_error(err),
    }
}

/// Quick edit of a single order value. Siblings are left alone, so ties are possible; the next
/// `terms_reorder` in that group evens them out.
pub(super) fn handle_order_set(server: &mut McpServer, args: Value) -> Value {
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
    let order = match require_i64(args_obj, "order") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    if let Err(err) = server.permissions.check_write(&taxonomy) {
        return ai_error_with(
            PERMISSION_DENIED,
            &format!("Permission denied: {err}"),
            Some("Restart the server without --read-only to edit term order."),
        );
    }
    if let Err(err) = server
        .pager
        .resolver()
        .check_taxonomy(&mut server.store, &taxonomy)
    {
        return format_order_error(err);
    }

    let changed = match server.store.term_order_set(id, &taxonomy, order) {
        Ok(changed) => changed,
        Err(err) => return format_store_error(err),
    };
    tracing::info!(term = %id, %taxonomy, order, changed, "term order set");

    let result = json!({
        "id": id.get(),
        "taxonomy": taxonomy.as_str(),
        "order": order,
        "changed": changed,
    });
    if changed {
        ai_ok("term_order_set", result)
    } else {
        ai_ok_with_warnings(
            "term_order_set",
            result,
            vec![warning(
                "ORDER_UNCHANGED",
                "term already had this order",
                "No action needed.",
            )],
        )
    }
}
