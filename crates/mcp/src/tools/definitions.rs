#![forbid(unsafe_code)]

use serde_json::{Value, json};

fn term_id_schema(description: &str) -> Value {
    json!({
        "type": ["integer", "string", "boolean", "null"],
        "description": description
    })
}

pub(crate) fn tool_definitions() -> Vec<Value> {
    vec![
        json!({
            "name": "terms_reorder",
            "description": "Move one term between two neighbours and renumber its sibling group. Resubmit result.next until it is null.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "id": { "type": ["integer", "string"], "description": "Term being moved." },
                    "taxonomy": { "type": "string" },
                    "prev_id": term_id_schema("Term now directly above the moved one; null/false/0 when none."),
                    "next_id": term_id_schema("Term now directly below the moved one; null/false/0 when none."),
                    "start": { "type": "integer", "description": "First order value of this batch (default 1)." },
                    "excluded": {
                        "type": "array",
                        "items": { "type": ["integer", "string"] },
                        "description": "Terms already placed by earlier batches."
                    }
                },
                "required": ["id", "taxonomy"]
            }
        }),
        json!({
            "name": "terms_list",
            "description": "List the children of one parent in display order.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "taxonomy": { "type": "string" },
                    "parent": term_id_schema("Parent term; omit or 0 for top level."),
                    "limit": { "type": "integer", "minimum": 1, "maximum": 1000 },
                    "offset": { "type": "integer", "minimum": 0 }
                },
                "required": ["taxonomy"]
            }
        }),
        json!({
            "name": "term_order_set",
            "description": "Set one term's order value directly, without renumbering its siblings.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "id": { "type": ["integer", "string"] },
                    "taxonomy": { "type": "string" },
                    "order": { "type": "integer" }
                },
                "required": ["id", "taxonomy", "order"]
            }
        }),
        json!({
            "name": "taxonomies_list",
            "description": "List stored taxonomies, their term counts and whether they can be reordered.",
            "inputSchema": {
                "type": "object",
                "properties": {},
                "required": []
            }
        }),
    ]
}
