#![forbid(unsafe_code)]

use super::super::ai::invalid_request;
use serde_json::Value;

pub(crate) fn optional_i64(
    args: &serde_json::Map<String, Value>,
    key: &str,
) -> Result<Option<i64>, Value> {
    let Some(value) = args.get(key) else {
        return Ok(None);
    };
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| invalid_request(&format!("{key} must be an integer"))),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| invalid_request(&format!("{key} must be an integer"))),
        _ => Err(invalid_request(&format!("{key} must be an integer"))),
    }
}

pub(crate) fn require_i64(args: &serde_json::Map<String, Value>, key: &str) -> Result<i64, Value> {
    optional_i64(args, key)?.ok_or_else(|| invalid_request(&format!("{key} is required")))
}

pub(crate) fn optional_usize(
    args: &serde_json::Map<String, Value>,
    key: &str,
) -> Result<Option<usize>, Value> {
    let Some(value) = args.get(key) else {
        return Ok(None);
    };
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_u64()
            .and_then(|v| usize::try_from(v).ok())
            .map(Some)
            .ok_or_else(|| invalid_request(&format!("{key} must be a non-negative integer"))),
        _ => Err(invalid_request(&format!(
            "{key} must be a non-negative integer"
        ))),
    }
}
