use httpmock::Method::{GET, POST};
use httpmock::MockServer;
use serde_json::json;

use crate::{McpClientConfig, McpHttpClient, ToolArgs, ToolBackend, ToolError};

fn mock_handshake(server: &MockServer) {
    server.mock(|when, then| {
        when.method(POST)
            .path("/mcp")
            .body_contains("\"method\":\"initialize\"");
        then.status(200)
            .header("content-type", "application/json")
            .header("Mcp-Session-Id", "sess-1")
            .json_body(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": { "serverInfo": { "name": "fpl-server" } }
            }));
    });
    server.mock(|when, then| {
        when.method(POST)
            .path("/mcp")
            .body_contains("notifications/initialized");
        then.status(202);
    });
}

fn client(server: &MockServer) -> McpHttpClient {
    McpHttpClient::new(McpClientConfig::new(server.url("/mcp")).with_api_key("secret")).unwrap()
}

fn args(pairs: serde_json::Value) -> ToolArgs {
    pairs.as_object().cloned().unwrap_or_default()
}

#[tokio::test]
async fn call_replays_session_and_api_key() {
    let server = MockServer::start();
    mock_handshake(&server);
    let call = server.mock(|when, then| {
        when.method(POST)
            .path("/mcp")
            .header("mcp-session-id", "sess-1")
            .header("x-api-key", "secret")
            .body_contains("\"method\":\"tools/call\"")
            .body_contains("\"name\":\"standings\"");
        then.status(200).json_body(json!({
            "jsonrpc": "2.0",
            "id": 2,
            "result": { "content": [{ "type": "text", "text": "{\"rows\": []}" }] }
        }));
    });

    let result = client(&server)
        .call("standings", &args(json!({ "league_id": 14204, "gw": 3 })))
        .await
        .unwrap();

    call.assert();
    assert_eq!(result, json!({ "rows": [] }));
}

#[tokio::test]
async fn tool_error_text_is_surfaced() {
    let server = MockServer::start();
    mock_handshake(&server);
    server.mock(|when, then| {
        when.method(POST)
            .path("/mcp")
            .body_contains("\"method\":\"tools/call\"");
        then.status(200).json_body(json!({
            "jsonrpc": "2.0",
            "id": 2,
            "result": { "content": [{ "type": "text", "text": "Error: unknown entry 999" }] }
        }));
    });

    let err = client(&server)
        .call("manager_schedule", &ToolArgs::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::Tool(ref m) if m == "unknown entry 999"));
}

#[tokio::test]
async fn event_stream_responses_are_decoded() {
    let server = MockServer::start();
    mock_handshake(&server);
    server.mock(|when, then| {
        when.method(POST)
            .path("/mcp")
            .body_contains("\"method\":\"tools/call\"");
        then.status(200)
            .header("content-type", "text/event-stream")
            .body(
                "event: message\ndata: {\"jsonrpc\":\"2.0\",\"id\":2,\"result\":{\"content\":[{\"type\":\"text\",\"text\":\"{\\\"current_gw\\\": 7}\"}]}}\n\n",
            );
    });

    let result = client(&server)
        .call("game_status", &ToolArgs::new())
        .await
        .unwrap();
    assert_eq!(result["current_gw"], 7);
}

#[tokio::test]
async fn http_failure_is_reported_with_status() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/mcp");
        then.status(500).body("boom");
    });

    let err = client(&server)
        .call("standings", &ToolArgs::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::Http { status: 500, .. }));
}

#[tokio::test]
async fn list_reads_tools_endpoint() {
    let server = MockServer::start();
    let listing = server.mock(|when, then| {
        when.method(GET).path("/tools").header("x-api-key", "secret");
        then.status(200).json_body(json!({
            "tools": [
                { "name": "standings", "description": "League table" },
                { "name": "game_status" }
            ]
        }));
    });

    let tools = client(&server).list().await.unwrap();
    listing.assert();
    assert_eq!(tools.len(), 2);
    assert_eq!(tools[0].name, "standings");
    assert_eq!(tools[1].description, "");
}

#[test]
fn config_debug_hides_key() {
    let config = McpClientConfig::new("http://x/mcp").with_api_key("hunter2");
    assert!(!format!("{config:?}").contains("hunter2"));
}
