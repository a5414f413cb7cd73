//! The per-conversation orchestrator.
//!
//! `run()` takes one user message through, in order: small talk, session
//! updates from context and text, a pending disambiguation, the intent
//! fast path, a bare team name, and finally the LLM tool loop. Every
//! terminal path records the exchange in the conversation history.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use fplchat_ai::LlmService;
use fplchat_mcp::ToolBackend;

use crate::events::{ToolEvent, ToolLog};
use crate::handlers::HandlerInput;
use crate::intent::{classify, small_talk, SmallTalk};
use crate::memory::MemoryIndex;
use crate::players::PlayerDirectory;
use crate::resolver::resolve_exact;
use crate::state::{resolve_pending, ConversationHistory, PendingChoice, PendingOutcome, Session, TurnContext};
use crate::text::{extract, word_count, Param};

/// Tunables for one agent, normally built from the `[league]` and `[agent]`
/// config sections.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSettings {
    pub default_league_id: i64,
    pub default_entry_id: Option<i64>,
    pub history_limit: usize,
    pub max_steps: usize,
    pub max_candidates: usize,
    pub tool_result_chars: usize,
    pub narrate_league_summary: bool,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            default_league_id: 14204,
            default_entry_id: None,
            history_limit: 6,
            max_steps: 6,
            max_candidates: 8,
            tool_result_chars: 6000,
            narrate_league_summary: false,
        }
    }
}

/// One turn's output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentReply {
    pub content: String,
    pub tool_events: Vec<ToolEvent>,
}

const EMPTY_MESSAGE_REPLY: &str = "What would you like to know about your league?";
const GREETING_REPLY: &str = "Hi! Ask me about standings, matchups, waivers, schedules or transactions in your league.";
const THANKS_REPLY: &str = "You're welcome! Anything else about your league?";

pub struct Agent {
    pub(crate) tools: Arc<dyn ToolBackend>,
    pub(crate) llm: Arc<dyn LlmService>,
    pub(crate) memory: Option<Arc<dyn MemoryIndex>>,
    pub(crate) players: Arc<PlayerDirectory>,
    pub(crate) settings: AgentSettings,
    pub(crate) session: Session,
    pub(crate) pending: Option<PendingChoice>,
    pub(crate) history: ConversationHistory,
}

impl Agent {
    pub fn new(tools: Arc<dyn ToolBackend>, llm: Arc<dyn LlmService>, settings: AgentSettings) -> Self {
        let session = Session {
            entry_id: settings.default_entry_id,
            ..Session::default()
        };
        Self {
            tools,
            llm,
            memory: None,
            players: Arc::new(PlayerDirectory::from_names(Default::default())),
            history: ConversationHistory::new(settings.history_limit),
            settings,
            session,
            pending: None,
        }
    }

    pub fn with_memory(mut self, memory: Arc<dyn MemoryIndex>) -> Self {
        self.memory = Some(memory);
        self
    }

    pub fn with_players(mut self, players: Arc<PlayerDirectory>) -> Self {
        self.players = players;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn pending(&self) -> Option<&PendingChoice> {
        self.pending.as_ref()
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn settings(&self) -> &AgentSettings {
        &self.settings
    }

    /// Forget session defaults, any pending question, and the history.
    pub fn reset(&mut self) {
        self.session = Session {
            entry_id: self.settings.default_entry_id,
            ..Session::default()
        };
        self.pending = None;
        self.history.clear();
    }

    /// League id used when neither the message nor the session names one.
    pub(crate) fn league_for(&self, text: &str) -> i64 {
        extract(Param::LeagueId, text)
            .or(self.session.league_id)
            .unwrap_or(self.settings.default_league_id)
    }

    pub(crate) fn gameweek_for(&self, text: &str) -> Option<i64> {
        extract(Param::Gameweek, text)
            .filter(|gw| *gw > 0)
            .or(self.session.gameweek)
    }

    /// Handle one user message.
    pub async fn run(&mut self, message: &str, context: Option<&TurnContext>) -> AgentReply {
        let text = message.trim();
        let mut log = ToolLog::new();

        if text.is_empty() {
            return self.finish(text, EMPTY_MESSAGE_REPLY.to_string(), log);
        }

        if let Some(kind) = small_talk(text) {
            let reply = match kind {
                SmallTalk::Greeting => GREETING_REPLY,
                SmallTalk::Thanks => THANKS_REPLY,
            };
            return self.finish(text, reply.to_string(), log);
        }

        if let Some(ctx) = context {
            self.session.apply_context(ctx);
        }
        self.session.apply_text(text);

        if let Some(reply) = self.try_pending(text, &mut log).await {
            return self.finish(text, reply, log);
        }

        if let Some(intent) = classify(text) {
            debug!(intent = intent.as_str(), "Routing to fast path");
            let reply = self.dispatch(intent, HandlerInput::new(text), &mut log).await;
            return self.finish(text, reply, log);
        }

        if let Some(reply) = self.team_name_only(text, &mut log).await {
            return self.finish(text, reply, log);
        }

        let reply = self.llm_loop(text, &mut log).await;
        self.finish(text, reply, log)
    }

    /// Offer `text` to the pending disambiguation, if there is one.
    ///
    /// A reply that matches no candidate re-prompts and leaves the pending
    /// choice in place.
    async fn try_pending(&mut self, text: &str, log: &mut ToolLog) -> Option<String> {
        match resolve_pending(text, self.pending.as_ref()) {
            PendingOutcome::NotPending => None,
            PendingOutcome::StillAmbiguous => {
                debug!("Reply matched no pending candidate");
                let pending = self.pending.as_ref()?;
                Some(format!(
                    "Which team do you mean? Options: {}",
                    crate::handlers::format_candidates(&pending.candidates)
                ))
            }
            PendingOutcome::Resolved(choice) => {
                let pending = self.pending.take()?;
                debug!(intent = pending.intent.as_str(), choice = %choice, "Pending choice resolved");
                let input = match pending.with_choice(&choice) {
                    Some(text) => HandlerInput::new(text),
                    None => {
                        let teams = match self.league_teams(log, pending.league_id).await {
                            Ok(teams) => teams,
                            Err(_) => return Some("League teams are unavailable right now.".to_string()),
                        };
                        let Some(team) = resolve_exact(&teams, &choice) else {
                            return Some(format!("I couldn't find '{choice}' in the league."));
                        };
                        HandlerInput::new(pending.original_text.clone()).with_team(team.into())
                    }
                };
                Some(self.dispatch(pending.intent, input, log).await)
            }
        }
    }

    /// A short message that is exactly a team's name.
    async fn team_name_only(&mut self, text: &str, log: &mut ToolLog) -> Option<String> {
        if word_count(text) > 6 {
            return None;
        }
        let league = self.league_for(text);
        let teams = self.league_teams(log, league).await.ok()?;
        let team = resolve_exact(&teams, text)?;
        Some(format!(
            "What would you like to know about {}? Examples: waivers, schedule, win streaks, fixtures.",
            team.entry_name
        ))
    }

    fn finish(&mut self, text: &str, content: String, log: ToolLog) -> AgentReply {
        self.history.record_exchange(text, &content);
        let tool_events = log.into_events();
        info!(tool_events = tool_events.len(), "Turn complete");
        AgentReply { content, tool_events }
    }
}
