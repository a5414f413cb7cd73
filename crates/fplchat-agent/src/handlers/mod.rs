//! Fast-path handlers, one per [`Intent`].
//!
//! Handlers build tool arguments from the message and session, call a
//! single tool (occasionally two), and render the result without the LLM.
//! Tool failures become short "unavailable" replies.

mod league;
mod market;
mod matchup;
mod team;

use std::ops::Range;

use serde_json::{json, Value};
use tracing::{debug, warn};

use fplchat_mcp::ToolArgs;

use crate::agent::Agent;
use crate::events::ToolLog;
use crate::intent::Intent;
use crate::resolver::{parse_teams, resolve_fuzzy, Resolution, Team, TeamRef};
use crate::sanitize::sanitize_error;
use crate::state::PendingChoice;
use crate::text::{extract, Param};

/// Message plus the team chosen in a disambiguation reply, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerInput {
    pub text: String,
    pub team: Option<TeamRef>,
}

impl HandlerInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            team: None,
        }
    }

    pub fn with_team(mut self, team: TeamRef) -> Self {
        self.team = Some(team);
        self
    }
}

/// Outcome of looking up the team a request is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TeamLookup {
    Found(TeamRef),
    /// Reply to send instead: a choice prompt or a clarification question.
    Reply(String),
}

/// `1) A 2) B` for a choice prompt.
pub fn format_candidates(candidates: &[String]) -> String {
    candidates
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{}) {name}", i + 1))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build an argument map from a `json!` object literal.
pub(crate) fn args(value: Value) -> ToolArgs {
    match value {
        Value::Object(map) => map,
        _ => ToolArgs::new(),
    }
}

impl Agent {
    pub(crate) async fn dispatch(&mut self, intent: Intent, input: HandlerInput, log: &mut ToolLog) -> String {
        match intent {
            Intent::HeadToHead => self.head_to_head(&input, log).await,
            Intent::MatchupSummary => self.matchup_summary(&input, log).await,
            Intent::TransactionAnalysis => self.transaction_analysis(&input, log).await,
            Intent::Transactions => self.transactions(&input, log).await,
            Intent::GameStatus => self.game_status(log).await,
            Intent::Waiver => self.waiver(&input, log).await,
            Intent::Streak => self.streak(&input, log).await,
            Intent::ManagerSeason => self.manager_season(&input, log).await,
            Intent::LeagueRecap => self.league_recap(&input, log).await,
            Intent::WinList => self.win_list(&input, log).await,
            Intent::DraftPicks => self.draft_picks(&input, log).await,
            Intent::Strength => self.data_ready(&input, log, "strength_of_schedule", "Strength of schedule").await,
            Intent::Schedule => self.schedule(&input, log).await,
            Intent::CurrentRoster => self.current_roster(&input, log).await,
            Intent::PlayerGwStats => self.player_gw_stats(&input, log).await,
            Intent::FixtureDifficulty => self.fixture_difficulty(&input, log).await,
            Intent::Fixtures => self.fixtures(&input, log).await,
            Intent::PlayerForm => self.player_form(&input, log).await,
            Intent::Standings => self.standings(&input, log).await,
            Intent::Lineup => self.lineup(&input, log).await,
            Intent::Ownership => self.data_ready(&input, log, "ownership_scarcity", "Ownership scarcity").await,
            Intent::LeagueEntries => self.league_entries(&input, log).await,
        }
    }

    /// Call a tool, logging the call and its outcome.
    ///
    /// An object result carrying a string `error` field counts as a failure.
    pub(crate) async fn invoke(&self, log: &mut ToolLog, name: &str, args: &ToolArgs) -> Result<Value, String> {
        debug!(tool = name, "Calling tool");
        log.call(name, args);
        match self.tools.call(name, args).await {
            Ok(value) => {
                if let Some(error) = value.get("error").and_then(Value::as_str) {
                    warn!(tool = name, error = %sanitize_error(error), "Tool reported an error");
                    log.error(name, error);
                    return Err(error.to_string());
                }
                log.result(name, &value);
                Ok(value)
            }
            Err(e) => {
                let message = e.to_string();
                warn!(tool = name, error = %sanitize_error(&message), "Tool call failed");
                log.error(name, message.clone());
                Err(message)
            }
        }
    }

    /// [`Agent::invoke`], then remember the arguments as session defaults.
    pub(crate) async fn call_tool(&mut self, log: &mut ToolLog, name: &str, args: ToolArgs) -> Result<Value, String> {
        let value = self.invoke(log, name, &args).await?;
        self.session.note_tool_use(name, &args);
        Ok(value)
    }

    /// The league's teams via `league_entries`.
    pub(crate) async fn league_teams(&self, log: &mut ToolLog, league_id: i64) -> Result<Vec<Team>, String> {
        let value = self.invoke(log, "league_entries", &args(json!({ "league_id": league_id }))).await?;
        Ok(parse_teams(&value))
    }

    /// Record a disambiguation question and return its prompt.
    ///
    /// At most `max_candidates` names are offered; only those are stored.
    pub(crate) fn ask_to_choose(
        &mut self,
        intent: Intent,
        league_id: i64,
        mut candidates: Vec<String>,
        original_text: &str,
        fragment: Option<Range<usize>>,
    ) -> String {
        let total = candidates.len();
        candidates.truncate(self.settings.max_candidates.max(2));
        let mut prompt = format!("I found multiple matching teams: {}", format_candidates(&candidates));
        if candidates.len() < total {
            prompt.push_str(&format!(" (showing {} of {total})", candidates.len()));
        }
        prompt.push_str(" Which one do you mean?");

        debug!(intent = intent.as_str(), candidates = candidates.len(), "Awaiting team choice");
        self.pending = Some(PendingChoice {
            intent,
            league_id,
            candidates,
            original_text: original_text.to_string(),
            fragment,
        });
        prompt
    }

    /// Resolve the single team a request is about.
    ///
    /// Order: entry id written in the text, the team chosen in a
    /// disambiguation reply, a team named in the text, the session team.
    /// `missing` is returned when none applies.
    pub(crate) async fn resolve_team(
        &mut self,
        log: &mut ToolLog,
        intent: Intent,
        league_id: i64,
        input: &HandlerInput,
        missing: &str,
    ) -> TeamLookup {
        if let Some(entry) = extract(Param::EntryId, &input.text) {
            return TeamLookup::Found(TeamRef::id_only(entry));
        }
        if let Some(team) = &input.team {
            return TeamLookup::Found(team.clone());
        }

        match self.league_teams(log, league_id).await {
            Ok(teams) => match resolve_fuzzy(&teams, &input.text) {
                Resolution::Found(team) => return TeamLookup::Found(team),
                Resolution::Ambiguous(names) => {
                    return TeamLookup::Reply(self.ask_to_choose(intent, league_id, names, &input.text, None));
                }
                Resolution::NotFound => {}
            },
            Err(e) => debug!(error = %sanitize_error(&e), "Team lookup skipped"),
        }

        match self.session.default_team() {
            Some(team) => TeamLookup::Found(team),
            None => TeamLookup::Reply(missing.to_string()),
        }
    }
}
