//! LLM fallback: a bounded plan/act/observe loop over the tool backend.
//!
//! Each step sends the accumulated prompt and expects a JSON action
//! envelope back. Tool results are appended to the prompt for the next
//! step. Output that is not an envelope is returned verbatim.

use serde_json::Value;
use tracing::{debug, warn};

use fplchat_mcp::ToolArgs;

use crate::agent::Agent;
use crate::defaults::apply_defaults;
use crate::events::ToolLog;
use crate::memory::{format_docs, should_use_memory, MEMORY_RESULTS};
use crate::render;
use crate::sanitize::sanitize_error;
use crate::text::truncate_chars;

pub(crate) const SYSTEM_PROMPT: &str = r#"You are a data-accurate assistant for a fantasy football draft league. You MUST call tools for any factual data.
Return ONLY a JSON object in one of these forms:
1) {"action":"tool","name":"tool_name","arguments":{...}}
2) {"action":"final","content":"..."}
If you need more data, choose action=tool. Do not guess.
If a section labeled "Memory (cached data)" is provided, you may use it as factual context without another tool call.

Tool routing:
- "who does X play", schedule or matchup questions: manager_schedule (not league_summary).
- Listing the league's teams or turning a team name into an entry_id: league_entries.
- Win streaks: manager_streak.
- A team's players for a week: league_summary with league_id and gw.
- Never output element IDs. Always use player names.
- If a required argument such as a team name is missing or ambiguous, ask a follow-up with action=final.
- Never pass null values in arguments. Omit missing fields instead.

Example tool call:
{"action":"tool","name":"league_summary","arguments":{"league_id":14204,"gw":0}}
"#;

pub(crate) const NO_LLM_REPLY: &str =
    "No LLM API key is configured, so I can only answer questions that match a built-in command.";
pub(crate) const LLM_FAILED_REPLY: &str = "The language model is unavailable right now.";
pub(crate) const MAX_STEPS_REPLY: &str = "Max steps reached.";

/// A parsed action envelope.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Action {
    Tool { name: String, args: ToolArgs },
    Final { content: String },
    /// `{"action": "<tool name>", "arguments": {...}}`
    LegacyTool { name: String, args: ToolArgs },
}

fn strip_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(body) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = body.strip_prefix("json").unwrap_or(body);
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parse model output into an [`Action`]. `None` means "use the text as is".
pub(crate) fn parse_action(raw: &str) -> Option<Action> {
    let value: Value = serde_json::from_str(strip_fence(raw)).ok()?;
    let action = value.get("action")?.as_str()?.trim();
    let args = || match value.get("arguments") {
        Some(Value::Object(map)) => map.clone(),
        _ => ToolArgs::new(),
    };

    match action {
        "final" => {
            let content = match value.get("content") {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            };
            Some(Action::Final { content })
        }
        "tool" => {
            let name = value.get("name")?.as_str()?.trim();
            (!name.is_empty()).then(|| Action::Tool {
                name: name.to_string(),
                args: args(),
            })
        }
        "" => None,
        name => Some(Action::LegacyTool {
            name: name.to_string(),
            args: args(),
        }),
    }
}

impl Agent {
    async fn prompt_parts(&self, text: &str) -> Vec<String> {
        let tools = match self.tools.list().await {
            Ok(tools) => tools,
            Err(e) => {
                warn!(error = %sanitize_error(&e.to_string()), "Tool listing failed");
                Vec::new()
            }
        };
        let listing: Vec<String> = tools
            .iter()
            .map(|t| format!("- {}: {}", t.name, t.description))
            .collect();

        let mut parts = vec![
            format!("Available tools:\n{}", listing.join("\n")),
            self.session.render_line(),
        ];
        if let Some(history) = self.history.render() {
            parts.push(history);
        }
        if let Some(memory) = self.memory.clone().filter(|_| should_use_memory(text)) {
            let query = text.to_string();
            let docs = tokio::task::spawn_blocking(move || memory.search(&query, MEMORY_RESULTS))
                .await
                .unwrap_or_default();
            if let Some(block) = format_docs(&docs) {
                debug!(docs = docs.len(), "Adding cached reports to prompt");
                parts.push(format!("Memory (cached data):\n{block}"));
            }
        }
        parts.push(text.to_string());
        parts
    }

    /// Run the tool loop for a message no fast-path handler claimed.
    pub(crate) async fn llm_loop(&mut self, text: &str, log: &mut ToolLog) -> String {
        if !self.llm.available() {
            return NO_LLM_REPLY.to_string();
        }
        let mut parts = self.prompt_parts(text).await;

        for step in 0..self.settings.max_steps {
            let prompt = parts.join("\n\n");
            let raw = match self.llm.generate(SYSTEM_PROMPT, &prompt).await {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(step, error = %e, "LLM call failed");
                    return LLM_FAILED_REPLY.to_string();
                }
            };

            let (name, raw_args) = match parse_action(&raw) {
                None => {
                    debug!(step, "Model output is not an action envelope");
                    return raw;
                }
                Some(Action::Final { content }) => return content,
                Some(Action::Tool { name, args }) | Some(Action::LegacyTool { name, args }) => (name, args),
            };

            let args = apply_defaults(&name, raw_args, &self.session, self.settings.default_league_id);
            debug!(step, tool = %name, "Model requested tool");
            let result = match self.invoke(log, &name, &args).await {
                Ok(result) => result,
                Err(e) => return format!("Tool error: {}", sanitize_error(&e)),
            };
            self.session.note_tool_use(&name, &args);

            match name.as_str() {
                "league_summary" if result.is_object() => return self.summary_reply(&result).await,
                "standings" if result.is_object() => return render::standings(&result),
                _ => {}
            }
            let payload = result.to_string();
            parts.push(format!(
                "Tool {name} result:\n{}",
                truncate_chars(&payload, self.settings.tool_result_chars)
            ));
        }

        MAX_STEPS_REPLY.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_tool_and_final_envelopes() {
        let tool = parse_action(r#"{"action":"tool","name":"standings","arguments":{"league_id":5}}"#);
        assert_eq!(
            tool,
            Some(Action::Tool {
                name: "standings".into(),
                args: json!({ "league_id": 5 }).as_object().cloned().unwrap(),
            })
        );

        let done = parse_action(r#"{"action":"final","content":"Boot Gang leads."}"#);
        assert_eq!(done, Some(Action::Final { content: "Boot Gang leads.".into() }));
    }

    #[test]
    fn bare_tool_name_is_legacy_form() {
        let action = parse_action(r#"{"action":"manager_streak","arguments":{"entry_id":100}}"#);
        assert!(matches!(action, Some(Action::LegacyTool { ref name, .. }) if name == "manager_streak"));
    }

    #[test]
    fn accepts_fenced_json() {
        let raw = "```json\n{\"action\":\"final\",\"content\":\"ok\"}\n```";
        assert_eq!(parse_action(raw), Some(Action::Final { content: "ok".into() }));
    }

    #[test]
    fn anything_else_is_plain_text() {
        assert_eq!(parse_action("Boot Gang is top of the table."), None);
        assert_eq!(parse_action(r#"{"content":"no action"}"#), None);
        assert_eq!(parse_action(r#"{"action":"tool"}"#), None);
        assert_eq!(parse_action(r#"[1, 2]"#), None);
    }

    #[test]
    fn non_object_arguments_are_dropped() {
        let action = parse_action(r#"{"action":"tool","name":"game_status","arguments":"none"}"#);
        assert_eq!(
            action,
            Some(Action::Tool {
                name: "game_status".into(),
                args: ToolArgs::new(),
            })
        );
    }
}
