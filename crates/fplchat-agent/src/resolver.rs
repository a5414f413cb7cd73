//! Team-name resolution against a league's roster.
//!
//! Free-text references are scored against every team's full and short
//! name. Scores are compared as `(tier, token count, length)` so a longer,
//! more specific name beats a shorter one in the same tier.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::text::{canonical, padded};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub entry_id: i64,
    pub entry_name: String,
    #[serde(default)]
    pub short_name: String,
}

/// A resolved team: id plus display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRef {
    pub entry_id: i64,
    pub name: Option<String>,
}

impl TeamRef {
    pub fn new(entry_id: i64, name: impl Into<String>) -> Self {
        Self {
            entry_id,
            name: Some(name.into()),
        }
    }

    pub fn id_only(entry_id: i64) -> Self {
        Self {
            entry_id,
            name: None,
        }
    }

    pub fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("entry {}", self.entry_id))
    }
}

impl From<&Team> for TeamRef {
    fn from(team: &Team) -> Self {
        TeamRef::new(team.entry_id, team.entry_name.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(TeamRef),
    /// Distinct team names tied for the best score.
    Ambiguous(Vec<String>),
    NotFound,
}

/// Decode the `league_entries` tool result.
pub fn parse_teams(value: &Value) -> Vec<Team> {
    value
        .get("teams")
        .and_then(Value::as_array)
        .map(|rows| {
            rows.iter()
                .filter_map(|row| serde_json::from_value::<Team>(row.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

/// Normalized equality against full or short name. No fuzziness.
pub fn resolve_exact<'a>(teams: &'a [Team], name: &str) -> Option<&'a Team> {
    let wanted = canonical(name);
    if wanted.is_empty() {
        return None;
    }
    teams
        .iter()
        .find(|t| canonical(&t.entry_name) == wanted || canonical(&t.short_name) == wanted)
}

type Score = (i32, usize, usize);

fn score_candidate(candidate: &str, weight: i32, message: &str, message_tokens: &[&str]) -> Option<Score> {
    let cand = canonical(candidate);
    if cand.is_empty() {
        return None;
    }
    let tokens: Vec<&str> = cand.split(' ').collect();
    let detail = |tier: i32| Some((tier, tokens.len(), cand.len()));

    if cand == message {
        return detail(3);
    }
    if format!(" {message} ").contains(&format!(" {cand} ")) {
        return detail(2 + weight);
    }
    if tokens.len() == 1 && cand.len() < 4 {
        return None;
    }
    if tokens.iter().all(|t| message_tokens.contains(t)) {
        return detail(1 + weight);
    }
    None
}

/// Best-scoring team for `text`, or the tied names when several teams
/// share the top score.
pub fn resolve_fuzzy(teams: &[Team], text: &str) -> Resolution {
    let message = canonical(text);
    if message.is_empty() {
        return Resolution::NotFound;
    }
    let message_tokens: Vec<&str> = message.split(' ').collect();

    let mut scored: Vec<(Score, &Team)> = Vec::new();
    for team in teams {
        let best = [(&team.entry_name, 0), (&team.short_name, -1)]
            .into_iter()
            .filter_map(|(name, weight)| score_candidate(name, weight, &message, &message_tokens))
            .max();
        if let Some(score) = best {
            scored.push((score, team));
        }
    }

    let Some(top) = scored.iter().map(|(score, _)| *score).max() else {
        return Resolution::NotFound;
    };

    let mut winners: Vec<&Team> = Vec::new();
    for (score, team) in &scored {
        if *score == top && !winners.iter().any(|w| w.entry_id == team.entry_id) {
            winners.push(team);
        }
    }

    match winners.as_slice() {
        [single] => Resolution::Found(TeamRef::from(*single)),
        many => Resolution::Ambiguous(many.iter().map(|t| t.entry_name.clone()).collect()),
    }
}

/// Whether any team name or short name appears in `text` on token bounds.
pub fn mentions_team(teams: &[Team], text: &str) -> bool {
    let haystack = padded(text);
    teams.iter().any(|t| {
        [&t.entry_name, &t.short_name].into_iter().any(|name| {
            let name = canonical(name);
            !name.is_empty() && haystack.contains(&format!(" {name} "))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn league() -> Vec<Team> {
        vec![
            Team {
                entry_id: 100,
                entry_name: "Boot Gang".into(),
                short_name: "BG".into(),
            },
            Team {
                entry_id: 200,
                entry_name: "Glock Tua".into(),
                short_name: "GT".into(),
            },
        ]
    }

    #[test]
    fn padded_substring_finds_full_name() {
        assert_eq!(
            resolve_fuzzy(&league(), "waiver recs for Boot Gang"),
            Resolution::Found(TeamRef::new(100, "Boot Gang"))
        );
    }

    #[test]
    fn exact_whole_message_match() {
        assert_eq!(
            resolve_fuzzy(&league(), "glock tua"),
            Resolution::Found(TeamRef::new(200, "Glock Tua"))
        );
    }

    #[test]
    fn short_name_matches_on_token_bounds() {
        assert_eq!(
            resolve_fuzzy(&league(), "schedule for gt please"),
            Resolution::Found(TeamRef::new(200, "Glock Tua"))
        );
        assert_eq!(resolve_fuzzy(&league(), "gtx schedule"), Resolution::NotFound);
    }

    #[test]
    fn scattered_tokens_match_multi_word_names() {
        assert_eq!(
            resolve_fuzzy(&league(), "how is tua doing, glock fans?"),
            Resolution::Found(TeamRef::new(200, "Glock Tua"))
        );
    }

    #[test]
    fn short_single_tokens_do_not_weak_match() {
        let teams = vec![Team {
            entry_id: 1,
            entry_name: "The".into(),
            short_name: String::new(),
        }];
        // exact and padded forms still work
        assert!(matches!(resolve_fuzzy(&teams, "the"), Resolution::Found(_)));
        assert_eq!(resolve_fuzzy(&teams, "theory"), Resolution::NotFound);
    }

    #[test]
    fn equal_scores_are_ambiguous() {
        let teams = vec![
            Team {
                entry_id: 1,
                entry_name: "Kane Train".into(),
                short_name: "KT".into(),
            },
            Team {
                entry_id: 2,
                entry_name: "Train Kane".into(),
                short_name: "TK".into(),
            },
        ];
        assert_eq!(
            resolve_fuzzy(&teams, "kane and train waivers"),
            Resolution::Ambiguous(vec!["Kane Train".into(), "Train Kane".into()])
        );
    }

    #[test]
    fn longer_name_breaks_a_tier_tie() {
        let teams = vec![
            Team {
                entry_id: 1,
                entry_name: "Red Army".into(),
                short_name: String::new(),
            },
            Team {
                entry_id: 2,
                entry_name: "Red Army Reserves".into(),
                short_name: String::new(),
            },
        ];
        assert_eq!(
            resolve_fuzzy(&teams, "schedule for red army reserves"),
            Resolution::Found(TeamRef::new(2, "Red Army Reserves"))
        );
    }

    #[test]
    fn no_reference_is_not_found() {
        assert_eq!(resolve_fuzzy(&league(), "standings please"), Resolution::NotFound);
        assert_eq!(resolve_fuzzy(&league(), ""), Resolution::NotFound);
    }

    #[test]
    fn exact_lookup_uses_either_name() {
        let teams = league();
        assert_eq!(resolve_exact(&teams, "bg").map(|t| t.entry_id), Some(100));
        assert_eq!(resolve_exact(&teams, "Glock  Tua!").map(|t| t.entry_id), Some(200));
        assert!(resolve_exact(&teams, "glock").is_none());
    }

    #[test]
    fn parse_teams_skips_malformed_rows() {
        let value = json!({
            "league_id": 14204,
            "teams": [
                { "entry_id": 100, "entry_name": "Boot Gang", "short_name": "BG" },
                { "entry_name": "missing id" },
                { "entry_id": 300, "entry_name": "No Short" }
            ]
        });
        let teams = parse_teams(&value);
        assert_eq!(teams.len(), 2);
        assert_eq!(teams[1].short_name, "");
    }

    #[test]
    fn mentions_team_checks_both_names() {
        assert!(mentions_team(&league(), "what about BG"));
        assert!(!mentions_team(&league(), "what about bgx"));
    }
}
