//! Argument normalization for tool calls proposed by the LLM.
//!
//! Per tool: merge split name fields, rename loose keys to the tool's own,
//! fill identifying fields from the session, then keep only allowed keys.
//! Missing values are omitted, never sent as `null`.

use serde_json::{json, Value};

use fplchat_mcp::ToolArgs;

use crate::state::Session;
use crate::values::{get_bool, int_value};

struct ToolRule {
    name: &'static str,
    allowed: &'static [&'static str],
    /// Fill `entry_id`/`entry_name` from the session when both are absent.
    team_default: bool,
    /// Default `gw` to the session week, else 0 (latest).
    gw_default: bool,
}

const LEAGUE_GW: &[&str] = &["league_id", "gw"];
const TEAM: &[&str] = &["league_id", "entry_id", "entry_name"];

const RULES: &[ToolRule] = &[
    ToolRule { name: "league_summary", allowed: LEAGUE_GW, team_default: false, gw_default: true },
    ToolRule { name: "matchup_breakdown", allowed: LEAGUE_GW, team_default: false, gw_default: true },
    ToolRule { name: "standings", allowed: LEAGUE_GW, team_default: false, gw_default: true },
    ToolRule { name: "transactions", allowed: LEAGUE_GW, team_default: false, gw_default: true },
    ToolRule { name: "lineup_efficiency", allowed: LEAGUE_GW, team_default: false, gw_default: true },
    ToolRule { name: "strength_of_schedule", allowed: LEAGUE_GW, team_default: false, gw_default: true },
    ToolRule { name: "ownership_scarcity", allowed: LEAGUE_GW, team_default: false, gw_default: true },
    ToolRule { name: "transaction_analysis", allowed: LEAGUE_GW, team_default: false, gw_default: true },
    ToolRule {
        name: "fixtures",
        allowed: &["league_id", "as_of_gw", "horizon"],
        team_default: false,
        gw_default: false,
    },
    ToolRule {
        name: "fixture_difficulty",
        allowed: &["league_id", "as_of_gw", "next_gw", "horizon", "limit", "include_raw"],
        team_default: false,
        gw_default: false,
    },
    ToolRule {
        name: "manager_schedule",
        allowed: &["league_id", "entry_id", "entry_name", "gw", "horizon"],
        team_default: true,
        gw_default: false,
    },
    ToolRule {
        name: "manager_streak",
        allowed: &["league_id", "entry_id", "entry_name", "start_gw", "end_gw"],
        team_default: true,
        gw_default: false,
    },
    ToolRule { name: "league_entries", allowed: &["league_id"], team_default: false, gw_default: false },
    ToolRule {
        name: "player_form",
        allowed: &["league_id", "as_of_gw", "horizon"],
        team_default: false,
        gw_default: false,
    },
    ToolRule {
        name: "waiver_recommendations",
        allowed: &[
            "league_id",
            "entry_id",
            "entry_name",
            "gw",
            "horizon",
            "weight_fixtures",
            "weight_form",
            "weight_total_points",
            "weight_xg",
            "limit",
        ],
        team_default: true,
        gw_default: false,
    },
    ToolRule {
        name: "head_to_head",
        allowed: &["league_id", "entry_id_a", "entry_name_a", "entry_id_b", "entry_name_b"],
        team_default: false,
        gw_default: false,
    },
    ToolRule { name: "manager_season", allowed: TEAM, team_default: true, gw_default: false },
    ToolRule { name: "draft_picks", allowed: TEAM, team_default: false, gw_default: false },
    ToolRule {
        name: "current_roster",
        allowed: &["league_id", "entry_id", "entry_name", "gw"],
        team_default: true,
        gw_default: false,
    },
    ToolRule {
        name: "player_gw_stats",
        allowed: &["element_id", "player_name", "start_gw", "end_gw"],
        team_default: false,
        gw_default: false,
    },
    ToolRule { name: "game_status", allowed: &[], team_default: false, gw_default: false },
];

const INT_KEYS: &[&str] = &[
    "league_id",
    "entry_id",
    "entry_id_a",
    "entry_id_b",
    "element_id",
    "gw",
    "as_of_gw",
    "next_gw",
    "start_gw",
    "end_gw",
    "horizon",
    "limit",
];

/// Allowed argument keys for a known tool.
pub fn allowed_keys(tool: &str) -> Option<&'static [&'static str]> {
    RULES.iter().find(|r| r.name == tool).map(|r| r.allowed)
}

fn rename(args: &mut ToolArgs, from: &str, to: &str) {
    if let Some(value) = args.remove(from) {
        args.entry(to.to_string()).or_insert(value);
    }
}

fn merge_name_fields(args: &mut ToolArgs) {
    if let Some(Value::Object(parts)) = args.get("entry_name").cloned() {
        args.remove("entry_name");
        for key in ["first", "last"] {
            if let Some(v) = parts.get(key) {
                args.entry(key.to_string()).or_insert_with(|| v.clone());
            }
        }
    }
    let first = args.remove("first");
    let last = args.remove("last");
    if args.contains_key("entry_name") {
        return;
    }
    let joined: Vec<String> = [first, last]
        .into_iter()
        .flatten()
        .filter_map(|v| v.as_str().map(|s| s.trim().to_string()))
        .filter(|s| !s.is_empty())
        .collect();
    if !joined.is_empty() {
        args.insert("entry_name".into(), Value::String(joined.join(" ")));
    }
}

/// Normalize `raw` for `tool`. Unknown tools are returned unchanged.
pub fn apply_defaults(tool: &str, raw: ToolArgs, session: &Session, default_league: i64) -> ToolArgs {
    let Some(rule) = RULES.iter().find(|r| r.name == tool) else {
        return raw;
    };

    let mut args: ToolArgs = raw.into_iter().filter(|(_, v)| !v.is_null()).collect();

    for key in INT_KEYS {
        let parsed = match args.get(*key) {
            Some(Value::String(s)) => Some(s.trim().parse::<i64>().ok()),
            _ => None,
        };
        match parsed {
            Some(Some(n)) => {
                args.insert((*key).to_string(), json!(n));
            }
            Some(None) => {
                args.remove(*key);
            }
            None => {}
        }
    }

    merge_name_fields(&mut args);

    match tool {
        "fixtures" | "player_form" => rename(&mut args, "gw", "as_of_gw"),
        "fixture_difficulty" => {
            rename(&mut args, "gw", "as_of_gw");
            rename(&mut args, "target_gw", "next_gw");
            if args.contains_key("include_raw") {
                let flag = get_bool(&Value::Object(args.clone()), "include_raw");
                args.insert("include_raw".into(), Value::Bool(flag));
            }
        }
        "player_gw_stats" => {
            rename(&mut args, "name", "player_name");
            if let Some(gw) = args.remove("gw") {
                args.entry("start_gw".to_string()).or_insert_with(|| gw.clone());
                args.entry("end_gw".to_string()).or_insert(gw);
            }
        }
        _ => {}
    }

    if rule.allowed.contains(&"league_id") {
        let explicit = args.get("league_id").and_then(int_value).filter(|v| *v > 0);
        if explicit.is_none() {
            let league = session.league_id.unwrap_or(default_league);
            args.insert("league_id".into(), json!(league));
        }
    }

    if rule.team_default && !args.contains_key("entry_id") && !args.contains_key("entry_name") {
        if let Some(entry) = session.entry_id {
            args.insert("entry_id".into(), json!(entry));
        }
        if let Some(name) = &session.entry_name {
            args.insert("entry_name".into(), json!(name));
        }
    }

    if rule.gw_default && !args.contains_key("gw") {
        args.insert("gw".into(), json!(session.gameweek.unwrap_or(0)));
    }

    match tool {
        "fixtures" => {
            args.entry("as_of_gw".to_string()).or_insert(json!(0));
            args.entry("horizon".to_string()).or_insert(json!(1));
        }
        "player_form" => {
            args.entry("as_of_gw".to_string()).or_insert(json!(0));
            args.entry("horizon".to_string()).or_insert(json!(5));
        }
        "manager_schedule" => {
            args.entry("horizon".to_string()).or_insert(json!(1));
        }
        _ => {}
    }

    args.retain(|key, _| rule.allowed.contains(&key.as_str()));
    args
}
