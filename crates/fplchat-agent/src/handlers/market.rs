//! Player, fixture and transaction handlers.

use std::collections::HashMap;

use serde_json::json;

use crate::agent::Agent;
use crate::events::ToolLog;
use crate::render;
use crate::sanitize::describe_failure;
use crate::text::{canonical, extract, Param};
use crate::values::{get_array, get_i64};

use super::{args, HandlerInput};

/// Words stripped from a stats question to leave the player's name.
const PLAYER_STOPWORDS: &[&str] = &[
    "show", "me", "get", "give", "what", "whats", "are", "were", "the", "a", "weekly", "gameweek", "game",
    "week", "weeks", "gw", "gws", "stats", "stat", "player", "points", "by", "for", "of", "in", "from", "to",
    "how", "did", "do", "does", "has", "have", "is", "this", "last", "season", "please", "s",
];

/// Remaining words once question words and numbers are removed.
pub(crate) fn player_name_from(text: &str) -> Option<String> {
    let text = canonical(text);
    let words: Vec<&str> = text
        .split(' ')
        .filter(|w| !w.is_empty() && !PLAYER_STOPWORDS.contains(w))
        .filter(|w| !w.trim_start_matches("gw").chars().all(|c| c.is_ascii_digit()))
        .collect();
    (!words.is_empty()).then(|| words.join(" "))
}

impl Agent {
    pub(super) async fn transactions(&mut self, input: &HandlerInput, log: &mut ToolLog) -> String {
        let league = self.league_for(&input.text);
        let gw = self.gameweek_for(&input.text).unwrap_or(0);
        let result = match self
            .call_tool(log, "transactions", args(json!({ "league_id": league, "gw": gw })))
            .await
        {
            Ok(result) => result,
            Err(e) => return describe_failure("Transactions", &e),
        };

        // Managers are listed bottom of the table first, using last week's standings.
        let mut order = HashMap::new();
        if let Some(week) = get_i64(&result, "gameweek").filter(|w| *w > 1) {
            let call = args(json!({ "league_id": league, "gw": week - 1 }));
            if let Ok(standings) = self.invoke(log, "standings", &call).await {
                let mut rows: Vec<(i64, i64)> = get_array(&standings, "rows")
                    .iter()
                    .filter_map(|r| Some((get_i64(r, "entry_id")?, get_i64(r, "rank").unwrap_or(0))))
                    .collect();
                rows.sort_by(|a, b| b.1.cmp(&a.1));
                order = rows.into_iter().enumerate().map(|(idx, (id, _))| (id, idx)).collect();
            }
        }
        let players = self.players.clone();
        if let Err(e) = tokio::task::spawn_blocking(move || players.refresh()).await {
            tracing::warn!(error = %e, "Player name refresh failed");
        }
        render::transactions(&result, &order, &self.players)
    }

    pub(super) async fn transaction_analysis(&mut self, input: &HandlerInput, log: &mut ToolLog) -> String {
        let league = self.league_for(&input.text);
        let gw = self.gameweek_for(&input.text).unwrap_or(0);
        match self
            .call_tool(log, "transaction_analysis", args(json!({ "league_id": league, "gw": gw })))
            .await
        {
            Ok(result) => render::transaction_analysis(&result),
            Err(e) => describe_failure("Transaction analysis", &e),
        }
    }

    pub(super) async fn fixtures(&mut self, input: &HandlerInput, log: &mut ToolLog) -> String {
        let league = self.league_for(&input.text);
        let horizon = extract(Param::Horizon, &input.text).unwrap_or(5);
        let mut call = args(json!({ "league_id": league, "horizon": horizon }));
        if let Some(gw) = self.gameweek_for(&input.text) {
            call.insert("as_of_gw".into(), json!(gw));
        }
        match self.call_tool(log, "fixtures", call).await {
            Ok(result) => render::fixtures(&result, horizon),
            Err(e) => describe_failure("Fixture data", &e),
        }
    }

    pub(super) async fn fixture_difficulty(&mut self, input: &HandlerInput, log: &mut ToolLog) -> String {
        let league = self.league_for(&input.text);
        let horizon = extract(Param::Horizon, &input.text).unwrap_or(5);
        let gw = self.gameweek_for(&input.text).unwrap_or(0);
        let call = args(json!({ "league_id": league, "as_of_gw": gw, "horizon": horizon }));
        match self.call_tool(log, "fixture_difficulty", call).await {
            Ok(result) => render::fixture_difficulty(&result),
            Err(e) => describe_failure("Fixture difficulty", &e),
        }
    }

    pub(super) async fn player_form(&mut self, input: &HandlerInput, log: &mut ToolLog) -> String {
        let league = self.league_for(&input.text);
        let horizon = extract(Param::Horizon, &input.text).unwrap_or(5);
        let gw = self.gameweek_for(&input.text).unwrap_or(0);
        let call = args(json!({ "league_id": league, "as_of_gw": gw, "horizon": horizon }));
        match self.call_tool(log, "player_form", call).await {
            Ok(result) => render::player_form(&result, horizon),
            Err(e) => describe_failure("Player form data", &e),
        }
    }

    pub(super) async fn player_gw_stats(&mut self, input: &HandlerInput, log: &mut ToolLog) -> String {
        let Some(name) = player_name_from(&input.text) else {
            return "Which player? Include a name, e.g. \"gw stats for Salah\".".to_string();
        };
        let mut call = args(json!({ "player_name": name }));
        if let Some(gw) = extract(Param::Gameweek, &input.text).filter(|gw| *gw > 0) {
            call.insert("start_gw".into(), json!(gw));
            call.insert("end_gw".into(), json!(gw));
        }
        match self.call_tool(log, "player_gw_stats", call).await {
            Ok(result) => render::player_gw_stats(&result),
            Err(e) => describe_failure("Player stats", &e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_name_strips_question_words() {
        assert_eq!(player_name_from("gw stats for Salah").as_deref(), Some("salah"));
        assert_eq!(player_name_from("weekly stats for Bukayo Saka gw 12").as_deref(), Some("bukayo saka"));
        assert_eq!(player_name_from("player stats gw12"), None);
    }
}
