//! Per-turn tool invocation log.

use serde::Serialize;
use serde_json::Value;

use fplchat_mcp::ToolArgs;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolEvent {
    ToolCall { name: String, args: ToolArgs },
    ToolResult { name: String, result: Value },
    ToolError { name: String, error: String },
}

impl ToolEvent {
    pub fn name(&self) -> &str {
        match self {
            ToolEvent::ToolCall { name, .. }
            | ToolEvent::ToolResult { name, .. }
            | ToolEvent::ToolError { name, .. } => name,
        }
    }
}

/// Append-only event list for one `run()`.
#[derive(Debug, Default, Clone)]
pub struct ToolLog {
    events: Vec<ToolEvent>,
}

impl ToolLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call(&mut self, name: &str, args: &ToolArgs) {
        self.events.push(ToolEvent::ToolCall {
            name: name.to_string(),
            args: args.clone(),
        });
    }

    pub fn result(&mut self, name: &str, result: &Value) {
        self.events.push(ToolEvent::ToolResult {
            name: name.to_string(),
            result: result.clone(),
        });
    }

    pub fn error(&mut self, name: &str, error: impl Into<String>) {
        self.events.push(ToolEvent::ToolError {
            name: name.to_string(),
            error: error.into(),
        });
    }

    pub fn events(&self) -> &[ToolEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<ToolEvent> {
        self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn events_serialize_with_type_tag() {
        let mut log = ToolLog::new();
        let args = json!({ "league_id": 1 }).as_object().cloned().unwrap();
        log.call("standings", &args);
        log.error("standings", "boom");

        let json = serde_json::to_value(log.events()).unwrap();
        assert_eq!(json[0]["type"], "tool_call");
        assert_eq!(json[0]["args"]["league_id"], 1);
        assert_eq!(json[1], json!({ "type": "tool_error", "name": "standings", "error": "boom" }));
    }

    #[test]
    fn order_is_preserved() {
        let mut log = ToolLog::new();
        log.call("a", &ToolArgs::new());
        log.result("a", &json!({}));
        let names: Vec<&str> = log.events().iter().map(ToolEvent::name).collect();
        assert_eq!(names, ["a", "a"]);
        assert!(matches!(log.into_events()[1], ToolEvent::ToolResult { .. }));
    }
}
