//! Deterministic Markdown/plain-text rendering of tool results.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::players::PlayerDirectory;
use crate::values::{display, format_number, get_array, get_bool, get_f64, get_i64, get_str};

pub fn position_label(position_type: Option<i64>) -> &'static str {
    match position_type {
        Some(1) => "GK",
        Some(2) => "DEF",
        Some(3) => "MID",
        Some(4) => "FWD",
        _ => "UNK",
    }
}

fn gw_heading(value: &Value) -> String {
    match get_i64(value, "gameweek") {
        Some(gw) => format!("GW{gw}"),
        None => "(unknown GW)".to_string(),
    }
}

fn str_or<'a>(value: &'a Value, key: &str, fallback: &'a str) -> &'a str {
    get_str(value, key).unwrap_or(fallback)
}

pub fn standings(result: &Value) -> String {
    let mut lines = vec![
        format!("# Standings {}", gw_heading(result)),
        String::new(),
        "| Rank | Team | W-D-L | MPts | PF | PA |".to_string(),
        "|---:|---|:---:|---:|---:|---:|".to_string(),
    ];
    for row in get_array(result, "rows") {
        lines.push(format!(
            "| {} | {} | {}-{}-{} | {} | {} | {} |",
            display(row.get("rank")),
            str_or(row, "entry_name", ""),
            get_i64(row, "wins").unwrap_or(0),
            get_i64(row, "draws").unwrap_or(0),
            get_i64(row, "losses").unwrap_or(0),
            display(row.get("match_points")),
            display(row.get("points_for")),
            display(row.get("points_against")),
        ));
    }
    lines.join("\n")
}

fn entries_by_id(summary: &Value) -> HashMap<i64, &Value> {
    get_array(summary, "entries")
        .iter()
        .filter_map(|e| get_i64(e, "entry_id").map(|id| (id, e)))
        .collect()
}

fn result_pair(a: &Value, b: Option<&Value>) -> String {
    let left = str_or(a, "result", "");
    let right = b.map(|b| str_or(b, "result", "")).unwrap_or("");
    format!("{left}/{right}").trim_matches('/').to_string()
}

/// One row per matchup in a `league_summary` result.
pub fn league_summary(summary: &Value) -> String {
    let mut lines = vec![
        format!("# League Summary {}", gw_heading(summary)),
        String::new(),
        "| Matchup | Score | Result |".to_string(),
        "|---|---:|:---:|".to_string(),
    ];
    let by_id = entries_by_id(summary);
    let mut seen = HashSet::new();
    for entry in get_array(summary, "entries") {
        let (Some(id), Some(opp_id)) = (
            get_i64(entry, "entry_id").filter(|v| *v > 0),
            get_i64(entry, "opponent_entry_id").filter(|v| *v > 0),
        ) else {
            continue;
        };
        if !seen.insert((id.min(opp_id), id.max(opp_id))) {
            continue;
        }
        let opponent = by_id.get(&opp_id).copied();
        let team_a = str_or(entry, "entry_name", "Unknown");
        let team_b = get_str(entry, "opponent_name")
            .or_else(|| opponent.and_then(|o| get_str(o, "entry_name")))
            .unwrap_or("Unknown");
        lines.push(format!(
            "| {team_a} vs {team_b} | {}-{} | {} |",
            get_i64(entry, "score_for").unwrap_or(0),
            get_i64(entry, "score_against").unwrap_or(0),
            result_pair(entry, opponent),
        ));
    }
    lines.join("\n")
}

/// Detail for one matchup; `a` is the row whose opponent is `b`.
pub fn matchup(summary: &Value, a: &Value, b: &Value) -> String {
    let name_a = str_or(a, "entry_name", "Unknown");
    let name_b = str_or(b, "entry_name", "Unknown");
    let points = |e: &Value, key: &str| e.get("points").and_then(|p| get_i64(p, key)).unwrap_or(0);
    [
        format!("# Matchup Summary {}", gw_heading(summary)),
        String::new(),
        format!("**{name_a} vs {name_b}**"),
        String::new(),
        "| Item | Value |".to_string(),
        "|---|---|".to_string(),
        format!(
            "| Score | {}-{} |",
            get_i64(a, "score_for").unwrap_or(0),
            get_i64(a, "score_against").unwrap_or(0)
        ),
        format!("| Result | {} |", result_pair(a, Some(b))),
        format!(
            "| Starters/Bench | {name_a}: {}/{}; {name_b}: {}/{} |",
            points(a, "starters"),
            points(a, "bench"),
            points(b, "starters"),
            points(b, "bench"),
        ),
    ]
    .join("\n")
}

pub fn lineup_efficiency(result: &Value, entry_id: Option<i64>) -> String {
    let mut lines = vec![format!("# Lineup Efficiency {}", gw_heading(result)), String::new()];
    let entries: Vec<&Value> = get_array(result, "entries")
        .iter()
        .filter(|e| entry_id.is_none() || get_i64(e, "entry_id") == entry_id)
        .collect();
    if entries.is_empty() {
        lines.push("No lineup efficiency data found.".to_string());
        return lines.join("\n");
    }
    lines.push("| Team | Bench Pts | Bench Pts Played | Zero-Min Starters |".to_string());
    lines.push("|---|---:|---:|---:|".to_string());
    for e in entries {
        lines.push(format!(
            "| {} | {} | {} | {} |",
            str_or(e, "entry_name", ""),
            get_i64(e, "bench_points").unwrap_or(0),
            get_i64(e, "bench_points_played").unwrap_or(0),
            get_i64(e, "zero_minute_starter_count").unwrap_or(0),
        ));
    }
    lines.join("\n")
}

/// Waiver adds with suggested drops.
pub fn waiver(result: &Value, team_label: &str, gw: Option<i64>) -> String {
    let target = get_i64(result, "target_gw").filter(|v| *v > 0).or(gw.filter(|v| *v > 0));
    let mut header = format!("Top waiver adds for {team_label}");
    if let Some(target) = target {
        header.push_str(&format!(" (GW{target})"));
    }
    let mut lines = vec![format!("{header}:")];

    let adds = get_array(result, "top_adds");
    if adds.is_empty() {
        lines.push("No recommendations available.".to_string());
    }
    for (i, add) in adds.iter().enumerate() {
        let pos = position_label(get_i64(add, "position_type"));
        let mut line = format!("{}. {}", i + 1, str_or(add, "name", "Unknown player"));
        match get_str(add, "team") {
            Some(team) => line.push_str(&format!(" ({team}, {pos})")),
            None => line.push_str(&format!(" ({pos})")),
        }
        if let Some(drop) = add.get("suggested_drop").filter(|d| d.is_object()) {
            if let Some(name) = get_str(drop, "name") {
                match get_str(drop, "team") {
                    Some(team) => line.push_str(&format!(", drop {name} ({team})")),
                    None => line.push_str(&format!(", drop {name}")),
                }
            }
        }
        lines.push(line);
    }

    let warnings: Vec<&str> = get_array(result, "warnings").iter().filter_map(Value::as_str).collect();
    if !warnings.is_empty() {
        lines.push("Warnings:".to_string());
        lines.extend(warnings.iter().map(|w| format!("- {w}")));
    }
    lines.join("\n")
}

pub fn head_to_head(result: &Value) -> String {
    let (Some(a), Some(b)) = (result.get("team_a"), result.get("team_b")) else {
        return "Head-to-head data is unavailable right now.".to_string();
    };
    let name_a = str_or(a, "entry_name", "Team A");
    let name_b = str_or(b, "entry_name", "Team B");
    let record = |t: &Value| {
        format!(
            "{}-{}-{}",
            get_i64(t, "wins").unwrap_or(0),
            get_i64(t, "draws").unwrap_or(0),
            get_i64(t, "losses").unwrap_or(0)
        )
    };
    let mut lines = vec![
        format!("# {name_a} vs {name_b}"),
        String::new(),
        format!("All-time record (W-D-L): {name_a} {}, {name_b} {}", record(a), record(b)),
    ];
    let matches = get_array(result, "matches");
    if matches.is_empty() {
        lines.push("They have not played each other yet.".to_string());
        return lines.join("\n");
    }
    lines.push(String::new());
    for m in matches {
        let status = if get_bool(m, "finished") { "" } else { " (in progress)" };
        lines.push(format!(
            "- GW{}: {} {}-{} {}{status}",
            display(m.get("gameweek")),
            name_a,
            get_i64(m, "score_a").unwrap_or(0),
            get_i64(m, "score_b").unwrap_or(0),
            name_b,
        ));
    }
    lines.join("\n")
}

pub fn manager_season(result: &Value) -> String {
    let name = str_or(result, "entry_name", "That team");
    let record = result.get("record").cloned().unwrap_or(Value::Null);
    let mut lines = vec![
        format!("# {name} season"),
        String::new(),
        format!(
            "Record (W-D-L): {}-{}-{}",
            get_i64(&record, "wins").unwrap_or(0),
            get_i64(&record, "draws").unwrap_or(0),
            get_i64(&record, "losses").unwrap_or(0)
        ),
        format!(
            "Total points: {} (avg {} per GW)",
            get_i64(result, "total_points").unwrap_or(0),
            format_number(get_f64(result, "avg_score").unwrap_or(0.0))
        ),
    ];
    if let Some(gw) = get_i64(result, "highest_scoring_gw").filter(|v| *v > 0) {
        lines.push(format!("Best week: GW{gw} ({} pts)", get_i64(result, "highest_score").unwrap_or(0)));
    }
    if let Some(gw) = get_i64(result, "lowest_scoring_gw").filter(|v| *v > 0) {
        lines.push(format!("Worst week: GW{gw} ({} pts)", get_i64(result, "lowest_score").unwrap_or(0)));
    }
    let weeks: Vec<String> = get_array(result, "gameweeks")
        .iter()
        .filter(|g| get_bool(g, "finished"))
        .map(|g| {
            format!(
                "- GW{}: {} {}-{} vs {}",
                display(g.get("gameweek")),
                str_or(g, "result", "-"),
                get_i64(g, "score").unwrap_or(0),
                get_i64(g, "opponent_score").unwrap_or(0),
                str_or(g, "opponent_name", "TBD"),
            )
        })
        .collect();
    if !weeks.is_empty() {
        lines.push(String::new());
        lines.extend(weeks);
    }
    lines.join("\n")
}

pub fn current_roster(result: &Value) -> String {
    let name = str_or(result, "entry_name", "That team");
    let player = |p: &Value| {
        format!(
            "- {} ({}, {})",
            str_or(p, "name", "Unknown player"),
            str_or(p, "team", "?"),
            position_label(get_i64(p, "position_type"))
        )
    };
    let mut lines = vec![format!("{name} roster ({}):", gw_heading(result)), "Starters:".to_string()];
    lines.extend(get_array(result, "starters").iter().map(player));
    let bench = get_array(result, "bench");
    if !bench.is_empty() {
        lines.push("Bench:".to_string());
        lines.extend(bench.iter().map(player));
    }
    lines.join("\n")
}

pub fn draft_picks(result: &Value) -> String {
    let picks = get_array(result, "picks");
    if picks.is_empty() {
        return "No draft picks found.".to_string();
    }
    let header = match get_str(result, "filtered_by") {
        Some(team) => format!("Draft picks for {team}:"),
        None => format!("Draft picks ({} total):", get_i64(result, "total_picks").unwrap_or(picks.len() as i64)),
    };
    let mut lines = vec![header];
    for p in picks {
        let auto = if get_bool(p, "was_auto") { " [auto]" } else { "" };
        lines.push(format!(
            "- R{} P{}: {} ({}, {}) to {}{auto}",
            display(p.get("round")),
            display(p.get("pick")),
            str_or(p, "player_name", "Unknown player"),
            str_or(p, "team", "?"),
            position_label(get_i64(p, "position_type")),
            str_or(p, "entry_name", "Unknown team"),
        ));
    }
    lines.join("\n")
}

pub fn fixtures(result: &Value, horizon: i64) -> String {
    let fixtures = get_array(result, "fixtures");
    if fixtures.is_empty() {
        return "No fixtures found.".to_string();
    }
    let mut lines = vec![format!("Upcoming fixtures (next {horizon} GWs):")];
    for f in fixtures.iter().take(20) {
        lines.push(format!(
            "- GW{}: {} vs {}",
            display(f.get("event")),
            display(f.get("team_h_short")),
            display(f.get("team_a_short")),
        ));
    }
    lines.join("\n")
}

pub fn player_form(result: &Value, horizon: i64) -> String {
    let mut players: Vec<&Value> = get_array(result, "players").iter().collect();
    if players.is_empty() {
        return "No player form data found.".to_string();
    }
    let ppg = |p: &Value| get_f64(p, "points_per_gw").unwrap_or(0.0);
    players.sort_by(|a, b| ppg(*b).total_cmp(&ppg(*a)));

    let mut lines = vec![format!("Top 10 players by points/GW (horizon {horizon}):")];
    for p in players.into_iter().take(10) {
        let name = str_or(p, "name", "Unknown player");
        match get_str(p, "team") {
            Some(team) => lines.push(format!("- {name} ({team}): {:.2} pts/GW", ppg(p))),
            None => lines.push(format!("- {name}: {:.2} pts/GW", ppg(p))),
        }
    }
    lines.join("\n")
}

/// Top three fixtures per position, easiest first.
pub fn fixture_difficulty(result: &Value) -> String {
    let mut lines = vec![format!(
        "Fixture difficulty for GW{} (horizon {}):",
        display(result.get("next_gw")),
        display(result.get("horizon"))
    )];
    let Some(positions) = result.get("positions").and_then(Value::as_object) else {
        return "No fixture difficulty data found.".to_string();
    };
    for key in ["GK", "DEF", "MID", "FWD"] {
        let Some(items) = positions.get(key).and_then(Value::as_array) else {
            continue;
        };
        if items.is_empty() {
            continue;
        }
        let top: Vec<String> = items
            .iter()
            .take(3)
            .map(|i| {
                format!(
                    "{} vs {} ({})",
                    str_or(i, "team_short", "?"),
                    str_or(i, "opponent_short", "?"),
                    str_or(i, "venue", "?")
                )
            })
            .collect();
        lines.push(format!("- {key}: {}", top.join(", ")));
    }
    if lines.len() == 1 {
        return "No fixture difficulty data found.".to_string();
    }
    lines.join("\n")
}

pub fn player_gw_stats(result: &Value) -> String {
    let name = str_or(result, "player_name", "Unknown player");
    let mut lines = vec![format!(
        "{name} ({}, {}) GW{}-GW{}: {} pts, avg {} per GW, {} mins",
        str_or(result, "team", "?"),
        position_label(get_i64(result, "position_type")),
        display(result.get("start_gw")),
        display(result.get("end_gw")),
        get_i64(result, "total_points").unwrap_or(0),
        format_number(get_f64(result, "avg_points").unwrap_or(0.0)),
        get_i64(result, "total_minutes").unwrap_or(0),
    )];
    for g in get_array(result, "gameweeks") {
        lines.push(format!(
            "- GW{}: {} pts, {} mins, {} G, {} A, xG {}",
            display(g.get("gameweek")),
            get_i64(g, "points").unwrap_or(0),
            get_i64(g, "minutes").unwrap_or(0),
            get_i64(g, "goals_scored").unwrap_or(0),
            get_i64(g, "assists").unwrap_or(0),
            format_number(get_f64(g, "expected_goals").unwrap_or(0.0)),
        ));
    }
    lines.join("\n")
}

/// `2025-02-01T11:00:00Z` → `Sat 01 Feb 11:00 UTC`; unparseable values pass through.
pub fn format_deadline(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => ts.with_timezone(&Utc).format("%a %d %b %H:%M UTC").to_string(),
        Err(_) => raw.to_string(),
    }
}

pub fn game_status(result: &Value) -> String {
    let current = display(result.get("current_gw"));
    let state = if get_bool(result, "current_gw_finished") {
        "finished"
    } else {
        "in progress"
    };
    let mut lines = vec![format!("GW{current} is {state}.")];
    if let Some(progress) = result.get("current_gw_fixtures").filter(|p| p.is_object()) {
        lines.push(format!(
            "Fixtures: {} of {} finished, {} started.",
            get_i64(progress, "finished").unwrap_or(0),
            get_i64(progress, "total").unwrap_or(0),
            get_i64(progress, "started").unwrap_or(0),
        ));
    }
    if let Some(status) = get_str(result, "points_status") {
        lines.push(format!("Points: {status}."));
    }
    lines.push(format!(
        "Waivers processed: {}.",
        if get_bool(result, "waivers_processed") { "yes" } else { "no" }
    ));
    let next = display(result.get("next_gw"));
    for (key, label) in [
        ("next_deadline", "deadline"),
        ("next_waivers_due", "waivers due"),
        ("next_trades_due", "trades due"),
    ] {
        if let Some(raw) = get_str(result, key) {
            lines.push(format!("GW{next} {label}: {}", format_deadline(raw)));
        }
    }
    lines.join("\n")
}

pub fn league_entries(result: &Value) -> String {
    let teams = get_array(result, "teams");
    if teams.is_empty() {
        return "No teams found for that league.".to_string();
    }
    let mut lines = vec![format!("League teams ({}):", teams.len())];
    for t in teams {
        let name = str_or(t, "entry_name", "Unknown team");
        match get_str(t, "short_name") {
            Some(short) => lines.push(format!("- {name} [{short}] (entry {})", display(t.get("entry_id")))),
            None => lines.push(format!("- {name} (entry {})", display(t.get("entry_id")))),
        }
    }
    lines.join("\n")
}

pub fn transaction_analysis(result: &Value) -> String {
    let mut lines = vec![format!(
        "Transaction analysis {}: {} transactions",
        gw_heading(result),
        get_i64(result, "total_transactions").unwrap_or(0)
    )];
    let summary = |title: &str, key: &str, lines: &mut Vec<String>| {
        let rows = get_array(result, key);
        if rows.is_empty() {
            return;
        }
        lines.push(format!("{title}:"));
        for p in rows.iter().take(5) {
            lines.push(format!(
                "- {} ({}, {}) x{}",
                str_or(p, "player_name", "Unknown player"),
                str_or(p, "team", "?"),
                position_label(get_i64(p, "position_type")),
                get_i64(p, "count").unwrap_or(0),
            ));
        }
    };
    summary("Most added", "top_added", &mut lines);
    summary("Most dropped", "top_dropped", &mut lines);

    let active: Vec<String> = get_array(result, "manager_activity")
        .iter()
        .map(|m| {
            format!(
                "- {}: +{} / -{}",
                str_or(m, "entry_name", "Unknown team"),
                get_array(m, "added").len(),
                get_array(m, "dropped").len()
            )
        })
        .collect();
    if !active.is_empty() {
        lines.push("By manager:".to_string());
        lines.extend(active);
    }
    lines.join("\n")
}

/// Transactions per manager, ordered by `order` (lower first) then name.
pub fn transactions(result: &Value, order: &HashMap<i64, usize>, players: &PlayerDirectory) -> String {
    let entries = get_array(result, "entries");
    let count = |e: &Value, key: &str| get_i64(e, key).unwrap_or(0);
    let active = entries
        .iter()
        .any(|e| count(e, "total_in") > 0 || count(e, "total_out") > 0);

    let mut lines = vec![format!("Transactions summary ({}):", gw_heading(result))];
    if !active {
        lines.push("No transactions recorded in the summary for this GW.".to_string());
    }

    let mut sorted: Vec<&Value> = entries.iter().collect();
    sorted.sort_by_key(|e| {
        let rank = get_i64(e, "entry_id")
            .and_then(|id| order.get(&id).copied())
            .unwrap_or(1_000_000);
        (rank, str_or(e, "entry_name", "").to_string())
    });

    let names = |e: &Value, key: &str| -> Vec<String> {
        get_array(e, key)
            .iter()
            .filter_map(crate::values::int_value)
            .map(|id| players.label(id))
            .collect()
    };
    let joined = |list: &[String]| {
        if list.is_empty() {
            "None".to_string()
        } else {
            list.join(", ")
        }
    };

    for entry in sorted {
        lines.push(format!("- {}:", str_or(entry, "entry_name", "Unknown team")));
        let mut any = false;
        for (title, kind) in [("Waivers", "waiver"), ("Free Agents", "free"), ("Trades", "trade")] {
            let added = names(entry, &format!("{kind}_in"));
            let dropped = names(entry, &format!("{kind}_out"));
            if added.is_empty() && dropped.is_empty() {
                continue;
            }
            any = true;
            lines.push(format!("  {title}:"));
            lines.push(format!("    + {}", joined(&added)));
            lines.push(format!("    - {}", joined(&dropped)));
        }
        if !any {
            lines.push("  No transactions.".to_string());
        }
    }
    lines.join("\n")
}
