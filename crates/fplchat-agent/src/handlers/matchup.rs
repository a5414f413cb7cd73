//! Two-team handlers: all-time head-to-head and a single week's matchup.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{json, Value};

use crate::agent::Agent;
use crate::events::ToolLog;
use crate::intent::Intent;
use crate::render;
use crate::resolver::{resolve_fuzzy, Resolution, Team, TeamRef};
use crate::sanitize::describe_failure;
use crate::values::{get_array, get_i64};

use super::{args, HandlerInput};

static SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(.+?)\s+(?:vs\.?|versus|against|h2h)\s+(.+)$").unwrap());

static TRIGGER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:summary|recap|matchup|record|all[\s-]*time|head[\s-]+to[\s-]+head|h2h|(?:gw|gameweek|game\s*week|week)\s*\d*)\b",
    )
    .unwrap()
});

/// Byte spans of the two team fragments of "A vs B" within `text`, with
/// trigger words trimmed off.
///
/// The left side keeps what follows its last trigger word, the right side
/// what precedes its first.
pub(crate) fn split_teams(text: &str) -> Option<(Range<usize>, Range<usize>)> {
    let offset = text.len() - text.trim_start().len();
    let caps = SPLIT_RE.captures(text.trim())?;
    let shift = |r: Range<usize>| r.start + offset..r.end + offset;
    let (left, right) = (shift(caps.get(1)?.range()), shift(caps.get(2)?.range()));

    let left = match TRIGGER_RE.find_iter(&text[left.clone()]).last() {
        Some(m) => left.start + m.end()..left.end,
        None => left,
    };
    let right = match TRIGGER_RE.find(&text[right.clone()]) {
        Some(m) => right.start..right.start + m.start(),
        None => right,
    };
    let (left, right) = (trim_span(text, left), trim_span(text, right));
    (!left.is_empty() && !right.is_empty()).then_some((left, right))
}

/// Narrow `span` to start and end on alphanumeric characters.
fn trim_span(text: &str, span: Range<usize>) -> Range<usize> {
    let slice = &text[span.clone()];
    let start = span.end - slice.trim_start_matches(|c: char| !c.is_alphanumeric()).len();
    let end = span.start + slice.trim_end_matches(|c: char| !c.is_alphanumeric()).len();
    start..end.max(start)
}

enum Side {
    Team(TeamRef),
    Reply(String),
}

impl Agent {
    fn resolve_side(&mut self, teams: &[Team], intent: Intent, league: i64, text: &str, span: Range<usize>) -> Side {
        let fragment = &text[span.clone()];
        match resolve_fuzzy(teams, fragment) {
            Resolution::Found(team) => Side::Team(team),
            Resolution::Ambiguous(names) => Side::Reply(self.ask_to_choose(intent, league, names, text, Some(span))),
            Resolution::NotFound => Side::Reply(format!(
                "I couldn't find a team matching '{fragment}'. Please provide exact team names."
            )),
        }
    }

    /// Resolve both sides of "A vs B" against the league's teams.
    async fn resolve_pair(
        &mut self,
        log: &mut ToolLog,
        intent: Intent,
        league: i64,
        input: &HandlerInput,
    ) -> Result<(TeamRef, TeamRef), String> {
        let Some((left, right)) = split_teams(&input.text) else {
            return Err("Please provide two team names (e.g., Glock Tua vs Luckier Than You).".to_string());
        };
        let teams = self
            .league_teams(log, league)
            .await
            .map_err(|e| describe_failure("League teams", &e))?;

        let a = match self.resolve_side(&teams, intent, league, &input.text, left) {
            Side::Team(team) => team,
            Side::Reply(reply) => return Err(reply),
        };
        let b = match self.resolve_side(&teams, intent, league, &input.text, right) {
            Side::Team(team) => team,
            Side::Reply(reply) => return Err(reply),
        };
        if a.entry_id == b.entry_id {
            return Err(format!("Both names matched {}. Please name two different teams.", a.label()));
        }
        Ok((a, b))
    }

    pub(super) async fn head_to_head(&mut self, input: &HandlerInput, log: &mut ToolLog) -> String {
        let league = self.league_for(&input.text);
        let (a, b) = match self.resolve_pair(log, Intent::HeadToHead, league, input).await {
            Ok(pair) => pair,
            Err(reply) => return reply,
        };
        let call = args(json!({
            "league_id": league,
            "entry_id_a": a.entry_id,
            "entry_id_b": b.entry_id,
        }));
        match self.call_tool(log, "head_to_head", call).await {
            Ok(result) => render::head_to_head(&result),
            Err(e) => describe_failure("Head-to-head data", &e),
        }
    }

    /// One week's result between two teams, from that week's league summary.
    pub(super) async fn matchup_summary(&mut self, input: &HandlerInput, log: &mut ToolLog) -> String {
        let league = self.league_for(&input.text);
        let Some(gw) = self.gameweek_for(&input.text) else {
            return "Which gameweek? Please include GW (e.g., GW25).".to_string();
        };
        let (a, b) = match self.resolve_pair(log, Intent::MatchupSummary, league, input).await {
            Ok(pair) => pair,
            Err(reply) => return reply,
        };

        let summary = match self
            .call_tool(log, "league_summary", args(json!({ "league_id": league, "gw": gw })))
            .await
        {
            Ok(summary) => summary,
            Err(e) => return describe_failure("League summary", &e),
        };

        let entries = get_array(&summary, "entries");
        let row = |id: i64| entries.iter().find(|e| get_i64(e, "entry_id") == Some(id));
        let (Some(row_a), Some(row_b)) = (row(a.entry_id), row(b.entry_id)) else {
            return "Matchup not found for those teams in that GW.".to_string();
        };
        let opponent = |e: &Value| get_i64(e, "opponent_entry_id");
        if opponent(row_a) == Some(b.entry_id) {
            render::matchup(&summary, row_a, row_b)
        } else if opponent(row_b) == Some(a.entry_id) {
            render::matchup(&summary, row_b, row_a)
        } else {
            "Matchup not found for those teams in that GW.".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(text: &str) -> Option<(String, String)> {
        split_teams(text).map(|(a, b)| (text[a].to_string(), text[b].to_string()))
    }

    #[test]
    fn splits_on_connectives() {
        assert_eq!(split("Boot Gang vs Glock Tua"), Some(("Boot Gang".into(), "Glock Tua".into())));
        assert_eq!(split("Boot Gang vs. Glock Tua"), Some(("Boot Gang".into(), "Glock Tua".into())));
        assert_eq!(split("boot gang against glock tua"), Some(("boot gang".into(), "glock tua".into())));
    }

    #[test]
    fn trims_trigger_words_on_both_sides() {
        assert_eq!(
            split("h2h record Boot Gang vs Glock Tua"),
            Some(("Boot Gang".into(), "Glock Tua".into()))
        );
        assert_eq!(
            split("Boot Gang vs Glock Tua gw 25 summary"),
            Some(("Boot Gang".into(), "Glock Tua".into()))
        );
        assert_eq!(
            split("matchup summary: Boot Gang vs Glock Tua GW7?"),
            Some(("Boot Gang".into(), "Glock Tua".into()))
        );
    }

    #[test]
    fn spans_point_at_each_side() {
        let text = "BG Select vs BG gw 5";
        assert_eq!(split_teams(text), Some((0..9, 13..15)));
        assert_eq!(split("  Boot Gang vs Glock Tua\n"), Some(("Boot Gang".into(), "Glock Tua".into())));
    }

    #[test]
    fn needs_two_sides() {
        assert_eq!(split("Boot Gang summary"), None);
        assert_eq!(split("summary vs gw 5"), None);
    }
}
