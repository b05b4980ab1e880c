#![forbid(unsafe_code)]

use super::wire::placements_json;
use serde_json::{Value, json};
use termorder_core::OrderError;
use termorder_storage::StoreError;

pub(crate) const INVALID_REQUEST: &str = "INVALID_REQUEST";
pub(crate) const INVALID_POSITION: &str = "INVALID_POSITION";
pub(crate) const INVALID_TAXONOMY: &str = "INVALID_TAXONOMY";
pub(crate) const PERMISSION_DENIED: &str = "PERMISSION_DENIED";
pub(crate) const TERM_NOT_FOUND: &str = "TERM_NOT_FOUND";
pub(crate) const SIBLINGS_FETCH_FAILED: &str = "SIBLINGS_FETCH_FAILED";
pub(crate) const STORE_WRITE_FAILED: &str = "STORE_WRITE_FAILED";
pub(crate) const HIERARCHY_CYCLE: &str = "HIERARCHY_CYCLE";
pub(crate) const STORE_ERROR: &str = "STORE_ERROR";
pub(crate) const UNKNOWN_TOOL: &str = "UNKNOWN_TOOL";

pub(crate) fn warning(code: &str, message: &str, recovery: &str) -> Value {
    json!({
        "code": code,
        "message": message,
        "recovery": recovery
    })
}

pub(crate) fn ai_ok_with_warnings(intent: &str, result: Value, warnings: Vec<Value>) -> Value {
    json!({
        "success": true,
        "intent": intent,
        "result": result,
        "warnings": warnings,
        "refs": [],
        "error": null
    })
}

pub(crate) fn ai_ok(intent: &str, result: Value) -> Value {
    ai_ok_with_warnings(intent, result, Vec::new())
}

pub(crate) fn ai_error(code: &str, message: &str) -> Value {
    ai_error_with(code, message, None)
}

pub(crate) fn ai_error_with(code: &str, message: &str, recovery: Option<&str>) -> Value {
    let mut error_obj = serde_json::Map::new();
    error_obj.insert("code".to_string(), Value::String(code.to_string()));
    error_obj.insert(
        "message".to_string(),
        Value::String(message.trim().to_string()),
    );
    if let Some(recovery) = recovery {
        error_obj.insert(
            "recovery".to_string(),
            Value::String(recovery.trim().to_string()),
        );
    }

    json!({
        "success": false,
        "intent": "error",
        "result": {},
        "warnings": [],
        "refs": [],
        "error": Value::Object(error_obj)
    })
}

pub(crate) fn invalid_request(detail: &str) -> Value {
    ai_error_with(
        INVALID_REQUEST,
        &format!("Invalid request data: {detail}"),
        Some("Send id and taxonomy, plus prev_id and/or next_id as term ids."),
    )
}

pub(crate) fn invalid_position(detail: &str) -> Value {
    ai_error_with(
        INVALID_POSITION,
        &format!("Invalid position data: {detail}"),
        Some("Reload the term list and send the neighbours the term was dropped between."),
    )
}

pub(crate) fn format_order_error(err: OrderError) -> Value {
    match err {
        OrderError::UnsupportedTaxonomy(taxonomy) => ai_error_with(
            INVALID_TAXONOMY,
            &format!("Invalid taxonomy: {taxonomy}"),
            Some("Call taxonomies_list to see which taxonomies can be ordered."),
        ),
        OrderError::NotFound(id) => ai_error(TERM_NOT_FOUND, &format!("Term not found: {id}")),
        OrderError::InvalidPosition(id) => invalid_position(&format!(
            "neither neighbour of term {id} exists in its sibling group"
        )),
        OrderError::InvalidStart(start) => invalid_request(&format!(
            "start must be a positive order value with room for a batch, got {start}"
        )),
        OrderError::HierarchyCycle(id) => ai_error_with(
            HIERARCHY_CYCLE,
            &format!("Parent chain of term {id} loops or is too deep"),
            Some("Repair the parent links of this term before reordering it."),
        ),
        OrderError::SiblingsFetchFailed(source) => ai_error_with(
            SIBLINGS_FETCH_FAILED,
            &format!("Failed to get siblings: {source}"),
            Some("Retry the same request; nothing was written."),
        ),
        OrderError::StoreRead(source) => ai_error(STORE_ERROR, &format!("Store read failed: {source}")),
        OrderError::StoreWriteFailed {
            term,
            applied,
            source,
        } => {
            let mut resp = ai_error_with(
                STORE_WRITE_FAILED,
                &format!("Failed to write order of term {term}: {source}"),
                Some("Resubmit the same request; already applied positions are skipped."),
            );
            if let Some(error) = resp.get_mut("error").and_then(Value::as_object_mut) {
                error.insert("applied".to_string(), placements_json(&applied));
            }
            resp
        }
    }
}

pub(crate) fn format_store_error(err: StoreError) -> Value {
    match err {
        StoreError::UnknownTerm(id) => ai_error(TERM_NOT_FOUND, &format!("Term not found: {id}")),
        StoreError::UnknownTaxonomy(name) => {
            ai_error(INVALID_TAXONOMY, &format!("Invalid taxonomy: {name}"))
        }
        StoreError::InvalidTaxonomy(err) => {
            ai_error(INVALID_TAXONOMY, &format!("Invalid taxonomy: {err}"))
        }
        other => ai_error(STORE_ERROR, &other.to_string()),
    }
}
