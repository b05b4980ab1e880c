#![forbid(unsafe_code)]

use crate::permissions::Permissions;
use crate::{McpServer, UNKNOWN_TOOL, ai_error_with};
use serde_json::{Value, json};
use termorder_core::SiblingPager;
use termorder_storage::SqliteStore;

impl McpServer {
    pub(crate) fn new(store: SqliteStore, pager: SiblingPager, permissions: Permissions) -> Self {
        Self {
            initialized: false,
            store,
            pager,
            permissions,
        }
    }

    pub(crate) fn handle(&mut self, request: crate::JsonRpcRequest) -> Option<Value> {
        let method = request.method.as_str();
        let expects_response = !matches!(request.id.as_ref(), None | Some(Value::Null));

        if method == "initialize" {
            let protocol_version = request
                .params
                .as_ref()
                .and_then(|v| v.get("protocolVersion"))
                .and_then(|v| v.as_str())
                .unwrap_or(crate::MCP_VERSION);

            return Some(crate::json_rpc_response(
                request.id,
                json!({
                    "protocolVersion": protocol_version,
                    "serverInfo": {
                        "name": crate::SERVER_NAME,
                        "version": crate::SERVER_VERSION
                    },
                    "capabilities": {
                        "tools": {}
                    }
                }),
            ));
        }

        // Both spellings of the initialized notification are in use; neither gets a reply.
        if method == "notifications/initialized" || method == "initialized" {
            self.initialized = true;
            return None;
        }

        if !self.initialized {
            // A first real request implies initialization.
            if matches!(method, "tools/call" | "tools/list" | "ping") {
                self.initialized = true;
            } else if expects_response {
                return Some(crate::json_rpc_error(
                    request.id,
                    -32002,
                    "Server not initialized",
                ));
            } else {
                return None;
            }
        }

        if method == "ping" {
            return Some(crate::json_rpc_response(request.id, json!({})));
        }

        if method == "tools/list" {
            return Some(crate::json_rpc_response(
                request.id,
                json!({ "tools": crate::tools::tool_definitions() }),
            ));
        }

        if method == "tools/call" {
            let Some(params_obj) = request.params.as_ref().and_then(|v| v.as_object()) else {
                return Some(crate::json_rpc_error(
                    request.id,
                    -32602,
                    "params must be an object",
                ));
            };

            let tool_name = params_obj
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string();
            // `"arguments": null` is sent by some clients for argument-less tools.
            let args = match params_obj.get("arguments") {
                None | Some(Value::Null) => json!({}),
                Some(v) => v.clone(),
            };
            let response_body = self.call_tool(&tool_name, args);

            return Some(crate::json_rpc_response(
                request.id,
                json!({
                    "content": [crate::tool_text_content(&response_body)],
                    "isError": !response_body.get("success").and_then(|v| v.as_bool()).unwrap_or(false)
                }),
            ));
        }

        // Notifications never get a response, even unknown ones.
        if !expects_response {
            return None;
        }
        Some(crate::json_rpc_error(
            request.id,
            -32601,
            &format!("Method not found: {method}"),
        ))
    }

    pub(crate) fn call_tool(&mut self, name: &str, args: Value) -> Value {
        let started = std::time::Instant::now();
        let resp = match crate::tools::dispatch_tool(self, name, args) {
            Some(resp) => resp,
            None => ai_error_with(
                UNKNOWN_TOOL,
                &format!("Unknown tool: {name}"),
                Some("Call tools/list to see the available tools."),
            ),
        };
        let success = resp
            .get("success")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        if success {
            tracing::info!(
                tool = name,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "tool call"
            );
        } else {
            let code = resp
                .get("error")
                .and_then(|e| e.get("code"))
                .and_then(|c| c.as_str())
                .unwrap_or("");
            tracing::warn!(tool = name, code, "tool call failed");
        }
        resp
    }
}
