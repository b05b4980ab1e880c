#![forbid(unsafe_code)]

use super::super::ai::{INVALID_TAXONOMY, ai_error_with, invalid_request};
use serde_json::Value;
use termorder_core::Taxonomy;

pub(crate) fn require_string(
    args: &serde_json::Map<String, Value>,
    key: &str,
) -> Result<String, Value> {
    let Some(v) = args.get(key).and_then(|v| v.as_str()) else {
        return Err(invalid_request(&format!("{key} is required")));
    };
    if v.trim().is_empty() {
        return Err(invalid_request(&format!("{key} is required")));
    }
    Ok(v.to_string())
}

/// Missing is a malformed request; a present but malformed key is an unknown taxonomy.
pub(crate) fn require_taxonomy(
    args: &serde_json::Map<String, Value>,
    key: &str,
) -> Result<Taxonomy, Value> {
    let raw = require_string(args, key)?;
    Taxonomy::try_new(raw.trim()).map_err(|err| {
        ai_error_with(
            INVALID_TAXONOMY,
            &format!("Invalid taxonomy: {err}"),
            Some("Taxonomy keys use lowercase letters, digits, '_' and '-'."),
        )
    })
}
