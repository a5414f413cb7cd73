//! JSON-RPC 2.0 envelopes and MCP result decoding.

use serde_json::{json, Value};

use crate::ToolError;

pub(crate) const PROTOCOL_VERSION: &str = "2024-11-05";

pub(crate) fn request(id: u64, method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params,
    })
}

pub(crate) fn notification(method: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "method": method,
        "params": {},
    })
}

pub(crate) fn initialize_params() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {},
        "clientInfo": {
            "name": "fplchat",
            "version": env!("CARGO_PKG_VERSION"),
        },
    })
}

/// Decode a JSON-RPC response body, accepting plain JSON or an SSE stream
/// whose last `data:` line carries the JSON payload. Returns `result`.
pub fn parse_rpc_body(content_type: &str, body: &str) -> Result<Value, ToolError> {
    let envelope: Value = if content_type.contains("text/event-stream") {
        let payload = body
            .lines()
            .filter_map(|line| line.strip_prefix("data:"))
            .map(str::trim)
            .filter(|data| !data.is_empty())
            .last()
            .ok_or_else(|| ToolError::InvalidResponse("event stream carried no data".into()))?;
        serde_json::from_str(payload)
            .map_err(|e| ToolError::InvalidResponse(format!("bad event payload: {e}")))?
    } else {
        serde_json::from_str(body)
            .map_err(|e| ToolError::InvalidResponse(format!("bad JSON body: {e}")))?
    };

    if let Some(error) = envelope.get("error") {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(ToolError::Rpc(message));
    }

    Ok(envelope.get("result").cloned().unwrap_or_else(|| json!({})))
}

/// Turn a `tools/call` result into the tool's JSON value.
///
/// The first text block is decoded as JSON when possible. A block starting
/// with `error:` or an `isError` flag becomes [`ToolError::Tool`].
pub fn extract_tool_payload(result: &Value) -> Result<Value, ToolError> {
    let text = result
        .get("content")
        .and_then(Value::as_array)
        .and_then(|blocks| {
            blocks
                .iter()
                .find(|b| b.get("type").and_then(Value::as_str) == Some("text"))
        })
        .and_then(|b| b.get("text"))
        .and_then(Value::as_str);

    let flagged = result
        .get("isError")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    if let Some(text) = text {
        let trimmed = text.trim();
        let lowered = trimmed.to_ascii_lowercase();
        if flagged || lowered.starts_with("error:") {
            let message = if lowered.starts_with("error:") {
                trimmed["error:".len()..].trim()
            } else {
                trimmed
            };
            return Err(ToolError::Tool(message.to_string()));
        }
        return Ok(serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(text.to_string())));
    }

    if flagged {
        return Err(ToolError::Tool("tool reported an error".into()));
    }

    if let Some(structured) = result.get("structuredContent") {
        return Ok(structured.clone());
    }

    Err(ToolError::InvalidResponse(
        "tool result has no text content".into(),
    ))
}

/// Discovery endpoint: a trailing `/mcp` path segment becomes `/tools`.
pub fn tools_url(base: &str) -> String {
    let base = base.trim_end_matches('/');
    match base.strip_suffix("/mcp") {
        Some(root) => format!("{root}/tools"),
        None => format!("{base}/tools"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sse_body_uses_last_data_line() {
        let body = "event: message\ndata: {\"jsonrpc\":\"2.0\",\"id\":1,\"result\":{\"ok\":1}}\n\n";
        let result = parse_rpc_body("text/event-stream", body).unwrap();
        assert_eq!(result["ok"], 1);
    }

    #[test]
    fn rpc_error_surfaces_message() {
        let body = r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32601,"message":"no such method"}}"#;
        let err = parse_rpc_body("application/json", body).unwrap_err();
        assert!(matches!(err, ToolError::Rpc(ref m) if m == "no such method"));
    }

    #[test]
    fn payload_text_is_decoded_as_json() {
        let result = json!({ "content": [{ "type": "text", "text": "{\"gameweek\": 5}" }] });
        assert_eq!(extract_tool_payload(&result).unwrap()["gameweek"], 5);
    }

    #[test]
    fn payload_plain_text_stays_a_string() {
        let result = json!({ "content": [{ "type": "text", "text": "no matches" }] });
        assert_eq!(extract_tool_payload(&result).unwrap(), json!("no matches"));
    }

    #[test]
    fn error_prefix_becomes_tool_error() {
        let result = json!({ "content": [{ "type": "text", "text": "Error: league not found" }] });
        let err = extract_tool_payload(&result).unwrap_err();
        assert_eq!(err.to_string(), "league not found");
    }

    #[test]
    fn is_error_flag_becomes_tool_error() {
        let result = json!({
            "isError": true,
            "content": [{ "type": "text", "text": "gameweek out of range" }]
        });
        assert!(matches!(
            extract_tool_payload(&result),
            Err(ToolError::Tool(ref m)) if m == "gameweek out of range"
        ));
    }

    #[test]
    fn structured_content_fallback() {
        let result = json!({ "content": [], "structuredContent": { "rows": [] } });
        assert_eq!(extract_tool_payload(&result).unwrap(), json!({ "rows": [] }));
    }

    #[test]
    fn tools_url_replaces_mcp_segment() {
        assert_eq!(tools_url("http://localhost:8080/mcp"), "http://localhost:8080/tools");
        assert_eq!(tools_url("http://localhost:8080/mcp/"), "http://localhost:8080/tools");
        assert_eq!(tools_url("http://host/api"), "http://host/api/tools");
    }
}
