//! Deterministic intent classification.
//!
//! Intents are tried in table order; the first one with a matching pattern
//! wins. Patterns are evaluated against the padded canonical text, so a
//! token written with surrounding spaces (`" vs "`) only matches whole words.

use serde::{Deserialize, Serialize};

use crate::text::{canonical, padded, word_count};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    HeadToHead,
    MatchupSummary,
    TransactionAnalysis,
    Transactions,
    GameStatus,
    Waiver,
    Streak,
    ManagerSeason,
    LeagueRecap,
    WinList,
    DraftPicks,
    Strength,
    Schedule,
    CurrentRoster,
    PlayerGwStats,
    FixtureDifficulty,
    Fixtures,
    PlayerForm,
    Standings,
    Lineup,
    Ownership,
    LeagueEntries,
}

impl Intent {
    pub fn as_str(self) -> &'static str {
        match self {
            Intent::HeadToHead => "head_to_head",
            Intent::MatchupSummary => "matchup_summary",
            Intent::TransactionAnalysis => "transaction_analysis",
            Intent::Transactions => "transactions",
            Intent::GameStatus => "game_status",
            Intent::Waiver => "waiver",
            Intent::Streak => "streak",
            Intent::ManagerSeason => "manager_season",
            Intent::LeagueRecap => "league_recap",
            Intent::WinList => "win_list",
            Intent::DraftPicks => "draft_picks",
            Intent::Strength => "strength",
            Intent::Schedule => "schedule",
            Intent::CurrentRoster => "current_roster",
            Intent::PlayerGwStats => "player_gw_stats",
            Intent::FixtureDifficulty => "fixture_difficulty",
            Intent::Fixtures => "fixtures",
            Intent::PlayerForm => "player_form",
            Intent::Standings => "standings",
            Intent::Lineup => "lineup",
            Intent::Ownership => "ownership",
            Intent::LeagueEntries => "league_entries",
        }
    }

    /// True iff any of this intent's patterns matches `text`.
    pub fn matches(self, text: &str) -> bool {
        let haystack = padded(text);
        INTENT_TABLE
            .iter()
            .filter(|(intent, _)| *intent == self)
            .any(|(_, patterns)| patterns.iter().any(|p| p.matches(&haystack)))
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Pattern {
    Substring(&'static str),
    AllOf(&'static [&'static str]),
}

impl Pattern {
    fn matches(&self, haystack: &str) -> bool {
        match self {
            Pattern::Substring(token) => haystack.contains(token),
            Pattern::AllOf(tokens) => tokens.iter().all(|t| haystack.contains(t)),
        }
    }
}

use Pattern::{AllOf, Substring};

/// Priority-ordered dispatch table.
pub const INTENT_TABLE: &[(Intent, &[Pattern])] = &[
    (
        Intent::HeadToHead,
        &[
            Substring("head to head"),
            Substring(" h2h "),
            Substring("all time record"),
            AllOf(&["record", " vs "]),
            AllOf(&["record", " against "]),
        ],
    ),
    (
        Intent::MatchupSummary,
        &[
            AllOf(&[" vs ", "summary"]),
            AllOf(&[" vs ", "recap"]),
            AllOf(&[" against ", "summary"]),
            AllOf(&[" vs ", " gw"]),
            AllOf(&[" vs ", "week"]),
        ],
    ),
    (
        Intent::TransactionAnalysis,
        &[
            Substring("transaction analysis"),
            Substring("most targeted"),
            Substring("most added"),
            Substring("most dropped"),
            Substring("transaction trends"),
        ],
    ),
    (
        Intent::Transactions,
        &[
            Substring("transactions"),
            Substring("transfers"),
            Substring("trades"),
            Substring("adds and drops"),
            AllOf(&["waiver", "summary"]),
            AllOf(&["waiver", "results"]),
        ],
    ),
    (
        Intent::GameStatus,
        &[
            Substring("deadline"),
            Substring("game status"),
            AllOf(&["waivers", "processed"]),
            Substring("current gameweek"),
            Substring("what gameweek is it"),
            Substring("what gw is it"),
        ],
    ),
    (
        Intent::Waiver,
        &[
            Substring("waiver"),
            Substring("pick up"),
            Substring("pickup"),
            Substring("who should i add"),
            Substring("free agent"),
        ],
    ),
    (
        Intent::Streak,
        &[
            AllOf(&["streak", " win "]),
            AllOf(&["streak", " wins "]),
            AllOf(&["streak", " winning "]),
            AllOf(&["in a row", " win "]),
            AllOf(&["in a row", " won "]),
        ],
    ),
    (
        Intent::ManagerSeason,
        &[
            Substring("season stats"),
            Substring("season record"),
            Substring("season summary"),
            Substring("my season"),
            AllOf(&["season", "how has"]),
        ],
    ),
    (
        Intent::LeagueRecap,
        &[
            Substring("league summary"),
            Substring("league recap"),
            Substring(" who won "),
            Substring("recap"),
            AllOf(&["summary", " gw"]),
            AllOf(&["summary", "week"]),
            AllOf(&["summary", "league"]),
            Substring("results"),
        ],
    ),
    (
        Intent::WinList,
        &[
            AllOf(&[" won ", " gw"]),
            AllOf(&[" won ", "week"]),
            AllOf(&[" win ", "weeks"]),
            AllOf(&[" wins ", " gw"]),
        ],
    ),
    (
        Intent::DraftPicks,
        &[
            AllOf(&["draft", "pick"]),
            AllOf(&["draft", "round"]),
            AllOf(&["draft", "history"]),
            AllOf(&[" did ", "draft"]),
            Substring("drafted"),
            Substring("draft board"),
        ],
    ),
    (
        Intent::Strength,
        &[
            Substring("strength of schedule"),
            Substring("schedule difficulty"),
            Substring("schedule strength"),
            Substring("toughest schedule"),
            Substring("easiest schedule"),
        ],
    ),
    (
        Intent::Schedule,
        &[
            AllOf(&["who does", "play"]),
            Substring("schedule"),
            Substring("next opponent"),
            Substring("who do i play"),
            Substring("who am i playing"),
            Substring("upcoming matchups"),
        ],
    ),
    (
        Intent::CurrentRoster,
        &[
            Substring("my team"),
            Substring("my roster"),
            Substring("roster"),
            Substring("current squad"),
            Substring("starting xi"),
        ],
    ),
    (
        Intent::PlayerGwStats,
        &[
            Substring("weekly stats"),
            Substring("gameweek stats"),
            Substring("gw stats"),
            Substring("player stats"),
            Substring("points by week"),
        ],
    ),
    (
        Intent::FixtureDifficulty,
        &[
            Substring("fixture difficulty"),
            Substring("easiest fixtures"),
            Substring("hardest fixtures"),
            Substring(" fdr "),
        ],
    ),
    (
        Intent::Fixtures,
        &[Substring("fixtures"), Substring("fixture list")],
    ),
    (
        Intent::PlayerForm,
        &[
            Substring("player form"),
            Substring("form table"),
            Substring("in form"),
            Substring("form guide"),
            Substring("hot players"),
        ],
    ),
    (
        Intent::Standings,
        &[
            Substring("standings"),
            Substring(" table "),
            Substring("leaderboard"),
        ],
    ),
    (
        Intent::Lineup,
        &[
            Substring("lineup efficiency"),
            Substring("bench points"),
            Substring("points on the bench"),
            Substring(" bench "),
        ],
    ),
    (
        Intent::Ownership,
        &[Substring("ownership"), Substring("scarcity")],
    ),
    (
        Intent::LeagueEntries,
        &[
            Substring("league entries"),
            Substring("all teams"),
            Substring("list teams"),
            Substring("list the teams"),
            Substring("teams in the league"),
            Substring("managers in the league"),
        ],
    ),
];

/// First intent in priority order whose patterns match.
pub fn classify(text: &str) -> Option<Intent> {
    let haystack = padded(text);
    INTENT_TABLE
        .iter()
        .find(|(_, patterns)| patterns.iter().any(|p| p.matches(&haystack)))
        .map(|(intent, _)| *intent)
}

/// Social messages answered without touching tools or session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmallTalk {
    Greeting,
    Thanks,
}

const GREETINGS: &[&str] = &[
    "hi",
    "hello",
    "hey",
    "hiya",
    "howdy",
    "yo",
    "sup",
    "good morning",
    "good afternoon",
    "good evening",
    "whats up",
    "what s up",
];

const THANKS: &[&str] = &["thanks", "thank you", "thx", "ty", "cheers", "thanks a lot"];

const GREETING_PREFIXES: &[&str] = &["hi", "hello", "hey", "hiya", "howdy", "yo"];
const THANKS_PREFIXES: &[&str] = &["thanks", "thank", "thx", "cheers"];

/// Exact small talk, or a short message opening with a greeting that
/// carries no routable request.
pub fn small_talk(text: &str) -> Option<SmallTalk> {
    let c = canonical(text);
    if GREETINGS.contains(&c.as_str()) {
        return Some(SmallTalk::Greeting);
    }
    if THANKS.contains(&c.as_str()) {
        return Some(SmallTalk::Thanks);
    }
    if word_count(text) > 4 || classify(text).is_some() {
        return None;
    }
    let first = c.split(' ').next().unwrap_or_default();
    if GREETING_PREFIXES.contains(&first) {
        Some(SmallTalk::Greeting)
    } else if THANKS_PREFIXES.contains(&first) {
        Some(SmallTalk::Thanks)
    } else {
        None
    }
}
