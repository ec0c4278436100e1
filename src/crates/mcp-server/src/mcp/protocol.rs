//! Framing-independent encoding of JSON-RPC messages and MCP result shapes.

use crate::mcp::types::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, JSONRPC_VERSION, PROTOCOL_VERSION};
use crate::registry::ToolDescriptor;
use computer_control::ActionResult;
use serde_json::{json, Value};

pub struct McpProtocol;

impl McpProtocol {
    pub fn serialize(response: &JsonRpcResponse) -> serde_json::Result<String> {
        serde_json::to_string(response)
    }

    /// Parse one line into a request.
    ///
    /// On failure the `Err` is the response to send back: a parse error for
    /// malformed JSON, an invalid-request error for JSON that is not a
    /// JSON-RPC 2.0 request.
    pub fn deserialize(line: &str) -> Result<JsonRpcRequest, JsonRpcResponse> {
        let value: Value = serde_json::from_str(line)
            .map_err(|e| JsonRpcResponse::failure(Value::Null, JsonRpcError::parse_error(e)))?;

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        let request: JsonRpcRequest = serde_json::from_value(value)
            .map_err(|e| JsonRpcResponse::failure(id.clone(), JsonRpcError::invalid_request(e)))?;

        if request.jsonrpc != JSONRPC_VERSION {
            return Err(JsonRpcResponse::failure(
                id,
                JsonRpcError::invalid_request(format!("unsupported jsonrpc version {:?}", request.jsonrpc)),
            ));
        }

        Ok(request)
    }

    pub fn initialize_result(name: &str, version: &str) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {"tools": {}},
            "serverInfo": {"name": name, "version": version}
        })
    }

    pub fn tools_list_result(tools: &[ToolDescriptor]) -> serde_json::Result<Value> {
        Ok(json!({ "tools": serde_json::to_value(tools)? }))
    }

    /// Wrap an envelope as a `tools/call` result.
    ///
    /// The envelope itself is the first text item. A screenshot, when present,
    /// is repeated as an image item so clients can render it directly.
    pub fn tool_call_result(result: &ActionResult) -> serde_json::Result<Value> {
        let mut content = vec![json!({
            "type": "text",
            "text": serde_json::to_string(result)?
        })];

        if let Some(image) = result.base64_image() {
            content.push(json!({
                "type": "image",
                "data": image,
                "mimeType": "image/png"
            }));
        }

        Ok(json!({
            "content": content,
            "isError": !result.is_success()
        }))
    }
}
