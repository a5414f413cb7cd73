use serde::Serialize;
use serde_json::Value;

use fplchat_mcp::ToolArgs;

use crate::resolver::TeamRef;
use crate::text::{extract, Param};
use crate::values::{get_i64, get_str};

/// Defaults remembered across turns of one conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    pub league_id: Option<i64>,
    pub entry_id: Option<i64>,
    pub entry_name: Option<String>,
    pub gameweek: Option<i64>,
    pub last_tool: Option<String>,
}

/// Caller-supplied values for one turn. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnContext {
    pub league_id: Option<i64>,
    pub entry_id: Option<i64>,
    pub entry_name: Option<String>,
    pub gameweek: Option<i64>,
}

impl TurnContext {
    pub fn from_value(value: &Value) -> Self {
        Self {
            league_id: get_i64(value, "league_id").filter(|v| *v > 0),
            entry_id: get_i64(value, "entry_id").filter(|v| *v > 0),
            entry_name: get_str(value, "entry_name").map(str::to_string),
            gameweek: get_i64(value, "gw").filter(|v| *v > 0),
        }
    }
}

impl Session {
    pub fn apply_context(&mut self, ctx: &TurnContext) {
        if let Some(league) = ctx.league_id {
            self.league_id = Some(league);
        }
        if let Some(entry) = ctx.entry_id {
            self.set_entry(entry, ctx.entry_name.clone());
        } else if let Some(name) = &ctx.entry_name {
            self.entry_name = Some(name.clone());
        }
        if let Some(gw) = ctx.gameweek {
            self.gameweek = Some(gw);
        }
    }

    /// Record any league, entry or gameweek written in the message itself.
    pub fn apply_text(&mut self, text: &str) {
        if let Some(league) = extract(Param::LeagueId, text) {
            self.league_id = Some(league);
        }
        if let Some(entry) = extract(Param::EntryId, text) {
            self.set_entry(entry, None);
        }
        if let Some(gw) = extract(Param::Gameweek, text).filter(|gw| *gw > 0) {
            self.gameweek = Some(gw);
        }
    }

    /// Update defaults from the arguments of a successful tool call.
    pub fn note_tool_use(&mut self, tool: &str, args: &ToolArgs) {
        let args = Value::Object(args.clone());
        self.last_tool = Some(tool.to_string());

        if let Some(league) = get_i64(&args, "league_id").filter(|v| *v > 0) {
            self.league_id = Some(league);
        }
        let name = get_str(&args, "entry_name").map(str::to_string);
        match get_i64(&args, "entry_id").filter(|v| *v > 0) {
            Some(entry) => self.set_entry(entry, name),
            None => {
                if name.is_some() {
                    self.entry_name = name;
                }
            }
        }

        // A multi-week schedule window starts at `gw`; it is not the week in focus.
        let window = tool == "manager_schedule" && get_i64(&args, "horizon").unwrap_or(1) > 1;
        if !window {
            let gw = get_i64(&args, "gw").or_else(|| get_i64(&args, "as_of_gw"));
            if let Some(gw) = gw.filter(|v| *v > 0) {
                self.gameweek = Some(gw);
            }
        }
    }

    pub fn remember_team(&mut self, team: &TeamRef) {
        self.set_entry(team.entry_id, team.name.clone());
    }

    fn set_entry(&mut self, entry_id: i64, name: Option<String>) {
        if self.entry_id != Some(entry_id) {
            self.entry_name = None;
        }
        self.entry_id = Some(entry_id);
        if name.is_some() {
            self.entry_name = name;
        }
    }

    pub fn default_team(&self) -> Option<TeamRef> {
        self.entry_id.map(|id| TeamRef {
            entry_id: id,
            name: self.entry_name.clone(),
        })
    }

    /// One-line summary included in LLM prompts.
    pub fn render_line(&self) -> String {
        fn show<T: ToString>(value: &Option<T>) -> String {
            value
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "none".to_string())
        }
        format!(
            "Session defaults: league_id={}, entry_id={}, entry_name={}, gw={}, last_tool={}",
            show(&self.league_id),
            show(&self.entry_id),
            show(&self.entry_name),
            show(&self.gameweek),
            show(&self.last_tool),
        )
    }
}
