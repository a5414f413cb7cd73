//! Text normalization and parameter extraction.
//!
//! Normalized text is only ever used for comparison, never shown to users.

use std::sync::LazyLock;

use regex::Regex;

/// A numeric parameter that can be pulled out of free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    LeagueId,
    Gameweek,
    Horizon,
    EntryId,
}

static LEAGUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bleague\s*(?:id)?\s*[:=#]?\s*(\d{4,6})\b").unwrap()
});

static GAMEWEEK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:gw|gameweek|game\s*week|week)\s*[:=#]?\s*(\d{1,2})\b").unwrap()
});

static HORIZON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bhorizon\s*[:=#]?\s*(\d{1,2})\b|\bnext\s+(\d{1,2})\s*(?:gws|gameweeks|weeks)\b")
        .unwrap()
});

static ENTRY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:entry[_\s-]*id|entry)\s*[:=#]?\s*(\d{4,8})\b").unwrap()
});

static NON_ALNUM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9 ]").unwrap());

/// Lowercase and replace every character outside `[a-z0-9 ]` with a space.
pub fn normalize(text: &str) -> String {
    NON_ALNUM_RE
        .replace_all(&text.to_lowercase(), " ")
        .into_owned()
}

/// [`normalize`] with runs of whitespace collapsed and ends trimmed.
pub fn canonical(text: &str) -> String {
    normalize(text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Canonical text wrapped in single spaces so phrases match on token bounds.
pub fn padded(text: &str) -> String {
    format!(" {} ", canonical(text))
}

/// Whether `phrase` occurs in `text` on token boundaries.
pub fn contains_phrase(text: &str, phrase: &str) -> bool {
    let phrase = canonical(phrase);
    !phrase.is_empty() && padded(text).contains(&format!(" {phrase} "))
}

pub fn word_count(text: &str) -> usize {
    canonical(text).split(' ').filter(|w| !w.is_empty()).count()
}

/// Pull the first integer for `param` out of `text`.
pub fn extract(param: Param, text: &str) -> Option<i64> {
    let re = match param {
        Param::LeagueId => &LEAGUE_RE,
        Param::Gameweek => &GAMEWEEK_RE,
        Param::Horizon => &HORIZON_RE,
        Param::EntryId => &ENTRY_RE,
    };
    let caps = re.captures(text)?;
    caps.iter()
        .skip(1)
        .flatten()
        .next()
        .and_then(|m| m.as_str().parse().ok())
}

/// Truncate to at most `max` characters on a char boundary.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
