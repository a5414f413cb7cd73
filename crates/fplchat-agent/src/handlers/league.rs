//! League-wide handlers.

use serde_json::{json, Value};
use tracing::debug;

use crate::agent::Agent;
use crate::events::ToolLog;
use crate::render;
use crate::sanitize::describe_failure;
use crate::text::truncate_chars;

use super::{args, HandlerInput};

const NARRATION_SYSTEM_PROMPT: &str = "You are a fantasy football analyst. Summarize the gameweek's head-to-head \
results in a few short sentences. Mention every matchup and its score. Do not invent data.";

impl Agent {
    pub(super) async fn league_recap(&mut self, input: &HandlerInput, log: &mut ToolLog) -> String {
        let league = self.league_for(&input.text);
        let gw = self.gameweek_for(&input.text).unwrap_or(0);
        let call = args(json!({ "league_id": league, "gw": gw }));
        let summary = match self.call_tool(log, "league_summary", call).await {
            Ok(summary) => summary,
            Err(e) => return describe_failure("League summary", &e),
        };
        self.summary_reply(&summary).await
    }

    /// Tabular league summary, narrated by the LLM when that is enabled.
    pub(crate) async fn summary_reply(&self, summary: &Value) -> String {
        let table = render::league_summary(summary);
        if !(self.settings.narrate_league_summary && self.llm.available()) {
            return table;
        }
        let payload = summary.to_string();
        let prompt = format!(
            "{table}\n\nRaw data:\n{}",
            truncate_chars(&payload, self.settings.tool_result_chars)
        );
        match self.llm.generate(NARRATION_SYSTEM_PROMPT, &prompt).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => table,
            Err(e) => {
                debug!(error = %e, "Narration failed, using table");
                table
            }
        }
    }

    pub(super) async fn standings(&mut self, input: &HandlerInput, log: &mut ToolLog) -> String {
        let league = self.league_for(&input.text);
        let gw = self.gameweek_for(&input.text).unwrap_or(0);
        match self.call_tool(log, "standings", args(json!({ "league_id": league, "gw": gw }))).await {
            Ok(result) => render::standings(&result),
            Err(e) => describe_failure("Standings", &e),
        }
    }

    pub(super) async fn league_entries(&mut self, input: &HandlerInput, log: &mut ToolLog) -> String {
        let league = self.league_for(&input.text);
        match self.call_tool(log, "league_entries", args(json!({ "league_id": league }))).await {
            Ok(result) => render::league_entries(&result),
            Err(e) => describe_failure("League teams", &e),
        }
    }

    pub(super) async fn game_status(&mut self, log: &mut ToolLog) -> String {
        match self.call_tool(log, "game_status", args(json!({}))).await {
            Ok(result) => render::game_status(&result),
            Err(e) => describe_failure("Game status", &e),
        }
    }

    /// Tools whose output is too wide to render; confirm the data exists.
    pub(super) async fn data_ready(&mut self, input: &HandlerInput, log: &mut ToolLog, tool: &str, title: &str) -> String {
        let league = self.league_for(&input.text);
        let gw = self.gameweek_for(&input.text).unwrap_or(0);
        match self.call_tool(log, tool, args(json!({ "league_id": league, "gw": gw }))).await {
            Ok(result) if !result.is_null() => {
                format!("{title} data is ready. Ask for a specific team or detail if you want a summary.")
            }
            Ok(_) => format!("{title} data is unavailable."),
            Err(e) => describe_failure(&format!("{title} data"), &e),
        }
    }
}
