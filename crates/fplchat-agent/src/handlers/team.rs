//! Handlers scoped to one manager's team.

use serde_json::{json, Value};

use crate::agent::Agent;
use crate::events::ToolLog;
use crate::intent::Intent;
use crate::render;
use crate::resolver::{resolve_fuzzy, Resolution, TeamRef};
use crate::sanitize::describe_failure;
use crate::text::{contains_phrase, extract, Param};
use crate::values::{get_array, get_bool, get_i64, get_str};

use super::{args, HandlerInput, TeamLookup};

const FIRST_PERSON: &[&str] = &["i", "my", "we", "our", "me", "us"];

/// A team reference that is optional for the request.
enum NamedTeam {
    Named(TeamRef),
    Unnamed,
    Prompt(String),
}

impl Agent {
    /// Display label for `team`, preferring the name the tool reported.
    /// The resolved team becomes the session's default team.
    fn adopt_team(&mut self, team: &TeamRef, result: &Value) -> String {
        let label = team
            .name
            .clone()
            .or_else(|| get_str(result, "entry_name").map(str::to_string))
            .unwrap_or_else(|| "That team".to_string());
        self.session.remember_team(&TeamRef::new(team.entry_id, label.clone()));
        label
    }

    /// Explicit id, chosen team, or a team named in the text. Never the
    /// session default.
    async fn named_team(&mut self, log: &mut ToolLog, intent: Intent, league_id: i64, input: &HandlerInput) -> NamedTeam {
        if let Some(entry) = extract(Param::EntryId, &input.text) {
            return NamedTeam::Named(TeamRef::id_only(entry));
        }
        if let Some(team) = &input.team {
            return NamedTeam::Named(team.clone());
        }
        let Ok(teams) = self.league_teams(log, league_id).await else {
            return NamedTeam::Unnamed;
        };
        match resolve_fuzzy(&teams, &input.text) {
            Resolution::Found(team) => NamedTeam::Named(team),
            Resolution::Ambiguous(names) => {
                NamedTeam::Prompt(self.ask_to_choose(intent, league_id, names, &input.text, None))
            }
            Resolution::NotFound => NamedTeam::Unnamed,
        }
    }

    pub(super) async fn waiver(&mut self, input: &HandlerInput, log: &mut ToolLog) -> String {
        let league = self.league_for(&input.text);
        let gw = self.gameweek_for(&input.text);
        let horizon = extract(Param::Horizon, &input.text);
        let team = match self
            .resolve_team(
                log,
                Intent::Waiver,
                league,
                input,
                "Which team should I run waivers for? Please provide a team name or entry ID.",
            )
            .await
        {
            TeamLookup::Found(team) => team,
            TeamLookup::Reply(reply) => return reply,
        };

        let mut call = args(json!({ "league_id": league, "entry_id": team.entry_id }));
        if let Some(gw) = gw {
            call.insert("gw".into(), json!(gw));
        }
        if let Some(horizon) = horizon {
            call.insert("horizon".into(), json!(horizon));
        }
        match self.call_tool(log, "waiver_recommendations", call).await {
            Ok(result) => {
                let label = self.adopt_team(&team, &result);
                render::waiver(&result, &label, gw)
            }
            Err(e) => describe_failure("Waiver recommendations", &e),
        }
    }

    pub(super) async fn schedule(&mut self, input: &HandlerInput, log: &mut ToolLog) -> String {
        let league = self.league_for(&input.text);
        // Only a week named in this message narrows the window.
        let gw = extract(Param::Gameweek, &input.text).filter(|gw| *gw > 0);
        let horizon = extract(Param::Horizon, &input.text).unwrap_or(5);
        let team = match self
            .resolve_team(log, Intent::Schedule, league, input, "Which team do you want the schedule for?")
            .await
        {
            TeamLookup::Found(team) => team,
            TeamLookup::Reply(reply) => return reply,
        };

        let mut call = args(json!({ "league_id": league, "entry_id": team.entry_id, "horizon": horizon }));
        if let Some(gw) = gw {
            call.insert("gw".into(), json!(gw));
            call.insert("horizon".into(), json!(1));
        }
        let result = match self.call_tool(log, "manager_schedule", call).await {
            Ok(result) => result,
            Err(e) => return describe_failure("Schedule data", &e),
        };

        let label = self.adopt_team(&team, &result);
        let matches = get_array(&result, "matches");
        let Some(first) = matches.first() else {
            return "No matches found for that request.".to_string();
        };
        if gw.is_some() {
            return format!(
                "{label} plays {} in GW{}.",
                get_str(first, "opponent_name").unwrap_or("an opponent"),
                get_i64(first, "gameweek").unwrap_or_default()
            );
        }
        let mut lines = vec![format!("Upcoming matches for {label}:")];
        for m in matches {
            lines.push(format!(
                "- GW{}: vs {}",
                get_i64(m, "gameweek").unwrap_or_default(),
                get_str(m, "opponent_name").unwrap_or("TBD")
            ));
        }
        lines.join("\n")
    }

    pub(super) async fn streak(&mut self, input: &HandlerInput, log: &mut ToolLog) -> String {
        let league = self.league_for(&input.text);
        let team = match self
            .resolve_team(log, Intent::Streak, league, input, "Which team should I check for win streaks?")
            .await
        {
            TeamLookup::Found(team) => team,
            TeamLookup::Reply(reply) => return reply,
        };

        let call = args(json!({ "league_id": league, "entry_id": team.entry_id }));
        match self.call_tool(log, "manager_streak", call).await {
            Ok(result) => {
                let label = self.adopt_team(&team, &result);
                format!(
                    "{label} win streaks: start-season streak {}, current streak {}, max streak {}.",
                    get_i64(&result, "start_win_streak").unwrap_or(0),
                    get_i64(&result, "current_win_streak").unwrap_or(0),
                    get_i64(&result, "max_win_streak").unwrap_or(0)
                )
            }
            Err(e) => describe_failure("Streak data", &e),
        }
    }

    /// Weeks won, from the full-season schedule.
    pub(super) async fn win_list(&mut self, input: &HandlerInput, log: &mut ToolLog) -> String {
        let league = self.league_for(&input.text);
        let team = match self
            .resolve_team(log, Intent::WinList, league, input, "Which team do you want win weeks for?")
            .await
        {
            TeamLookup::Found(team) => team,
            TeamLookup::Reply(reply) => return reply,
        };

        let call = args(json!({ "league_id": league, "entry_id": team.entry_id, "gw": 1, "horizon": 38 }));
        let result = match self.call_tool(log, "manager_schedule", call).await {
            Ok(result) => result,
            Err(e) => return describe_failure("Schedule data", &e),
        };
        let label = self.adopt_team(&team, &result);
        let wins: Vec<String> = get_array(&result, "matches")
            .iter()
            .filter(|m| get_bool(m, "finished") && get_str(m, "result") == Some("W"))
            .filter_map(|m| get_i64(m, "gameweek"))
            .map(|gw| format!("GW{gw}"))
            .collect();
        if wins.is_empty() {
            format!("{label} has no completed wins yet.")
        } else {
            format!("{label} won in: {}.", wins.join(", "))
        }
    }

    pub(super) async fn manager_season(&mut self, input: &HandlerInput, log: &mut ToolLog) -> String {
        let league = self.league_for(&input.text);
        let team = match self
            .resolve_team(log, Intent::ManagerSeason, league, input, "Which team's season should I summarize?")
            .await
        {
            TeamLookup::Found(team) => team,
            TeamLookup::Reply(reply) => return reply,
        };

        let call = args(json!({ "league_id": league, "entry_id": team.entry_id }));
        match self.call_tool(log, "manager_season", call).await {
            Ok(result) => {
                self.adopt_team(&team, &result);
                render::manager_season(&result)
            }
            Err(e) => describe_failure("Season data", &e),
        }
    }

    pub(super) async fn current_roster(&mut self, input: &HandlerInput, log: &mut ToolLog) -> String {
        let league = self.league_for(&input.text);
        let gw = self.gameweek_for(&input.text);
        let team = match self
            .resolve_team(log, Intent::CurrentRoster, league, input, "Which team's roster do you want?")
            .await
        {
            TeamLookup::Found(team) => team,
            TeamLookup::Reply(reply) => return reply,
        };

        let mut call = args(json!({ "league_id": league, "entry_id": team.entry_id }));
        if let Some(gw) = gw {
            call.insert("gw".into(), json!(gw));
        }
        match self.call_tool(log, "current_roster", call).await {
            Ok(result) => {
                self.adopt_team(&team, &result);
                render::current_roster(&result)
            }
            Err(e) => describe_failure("Roster data", &e),
        }
    }

    /// Whole draft, or one team's picks when the message names a team or
    /// speaks in the first person.
    pub(super) async fn draft_picks(&mut self, input: &HandlerInput, log: &mut ToolLog) -> String {
        let league = self.league_for(&input.text);
        let first_person = FIRST_PERSON.iter().any(|w| contains_phrase(&input.text, w));
        let team = match self.named_team(log, Intent::DraftPicks, league, input).await {
            NamedTeam::Named(team) => Some(team),
            NamedTeam::Prompt(prompt) => return prompt,
            NamedTeam::Unnamed if first_person => self.session.default_team(),
            NamedTeam::Unnamed => None,
        };

        let mut call = args(json!({ "league_id": league }));
        if let Some(team) = &team {
            call.insert("entry_id".into(), json!(team.entry_id));
        }
        match self.call_tool(log, "draft_picks", call).await {
            Ok(result) => render::draft_picks(&result),
            Err(e) => describe_failure("Draft data", &e),
        }
    }

    /// League-wide table, narrowed to one team when one is named.
    pub(super) async fn lineup(&mut self, input: &HandlerInput, log: &mut ToolLog) -> String {
        let league = self.league_for(&input.text);
        let gw = self.gameweek_for(&input.text).unwrap_or(0);
        let entry = match self.named_team(log, Intent::Lineup, league, input).await {
            NamedTeam::Named(team) => Some(team.entry_id),
            NamedTeam::Prompt(prompt) => return prompt,
            NamedTeam::Unnamed => self.session.entry_id,
        };

        let call = args(json!({ "league_id": league, "gw": gw }));
        match self.call_tool(log, "lineup_efficiency", call).await {
            Ok(result) => render::lineup_efficiency(&result, entry),
            Err(e) => describe_failure("Lineup efficiency data", &e),
        }
    }
}
