#![forbid(unsafe_code)]

use crate::McpServer;
use crate::{ai_ok, format_store_error};
use serde_json::{Value, json};

pub(super) fn handle(server: &mut McpServer, _args: Value) -> Value {
    let rows = match server.store.list_taxonomies() {
        Ok(rows) => rows,
        Err(err) => return format_store_error(err),
    };
    let scope = &server.pager.resolver().config().taxonomies;
    let taxonomies = rows
        .iter()
        .map(|row| {
            json!({
                "taxonomy": row.taxonomy.as_str(),
                "term_count": row.term_count,
                "created_at_ms": row.created_at_ms,
                "orderable": scope.allows(&row.taxonomy),
            })
        })
        .collect::<Vec<_>>();
    ai_ok(
        "taxonomies_list",
        json!({
            "count": taxonomies.len(),
            "taxonomies": taxonomies,
        }),
    )
}
