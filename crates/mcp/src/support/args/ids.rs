#![forbid(unsafe_code)]

use super::super::ai::invalid_request;
use serde_json::Value;
use termorder_core::TermId;

/// Raw id as sent by a client: a JSON number or a decimal string. `Ok(None)` for the
/// values that mean "no term" (`null`, `false`, `0`, `""`, `"0"`).
fn loose_id(value: &Value, key: &str) -> Result<Option<TermId>, Value> {
    let bad = || invalid_request(&format!("{key} must be a term id"));
    match value {
        Value::Null | Value::Bool(false) => Ok(None),
        Value::Number(n) => match n.as_u64() {
            Some(raw) => Ok(TermId::new(raw)),
            None => Err(bad()),
        },
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            let raw = trimmed.parse::<u64>().map_err(|_| bad())?;
            Ok(TermId::new(raw))
        }
        _ => Err(bad()),
    }
}

pub(crate) fn require_term_id(
    args: &serde_json::Map<String, Value>,
    key: &str,
) -> Result<TermId, Value> {
    let Some(value) = args.get(key) else {
        return Err(invalid_request(&format!("{key} is required")));
    };
    loose_id(value, key)?.ok_or_else(|| invalid_request(&format!("{key} is required")))
}

/// Neighbour id of a move; absent-like values are `None`.
pub(crate) fn optional_anchor(
    args: &serde_json::Map<String, Value>,
    key: &str,
) -> Result<Option<TermId>, Value> {
    match args.get(key) {
        None => Ok(None),
        Some(value) => loose_id(value, key),
    }
}

pub(crate) fn optional_term_ids(
    args: &serde_json::Map<String, Value>,
    key: &str,
) -> Result<Vec<TermId>, Value> {
    let Some(value) = args.get(key) else {
        return Ok(Vec::new());
    };
    let items = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Array(items) => items,
        _ => {
            return Err(invalid_request(&format!(
                "{key} must be an array of term ids"
            )));
        }
    };
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        if let Some(id) = loose_id(item, key)? {
            out.push(id);
        }
    }
    Ok(out)
}
