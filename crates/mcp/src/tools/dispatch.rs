#![forbid(unsafe_code)]

use crate::McpServer;
use serde_json::Value;

use super::{reorder, taxonomies, terms};

pub(crate) fn dispatch_tool(server: &mut McpServer, name: &str, args: Value) -> Option<Value> {
    let resp = match name {
        "terms_reorder" => reorder::handle(server, args),
        "terms_list" => terms::handle_list(server, args),
        "term_order_set" => terms::handle_order_set(server, args),
        "taxonomies_list" => taxonomies::handle(server, args),
        _ => return None,
    };
    Some(resp)
}
