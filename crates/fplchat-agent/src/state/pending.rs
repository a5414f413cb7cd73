use std::ops::Range;

use crate::intent::Intent;
use crate::text::{canonical, padded};

/// A disambiguation question awaiting the user's next message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingChoice {
    pub intent: Intent,
    pub league_id: i64,
    /// Team names in the order they were shown.
    pub candidates: Vec<String>,
    pub original_text: String,
    /// For two-team requests, the byte span of the ambiguous side in
    /// `original_text`, replaced by the chosen name before re-running it.
    pub fragment: Option<Range<usize>>,
}

impl PendingChoice {
    /// The ambiguous text of a two-team request.
    pub fn fragment_text(&self) -> Option<&str> {
        self.original_text.get(self.fragment.clone()?)
    }

    /// The original message with the ambiguous side replaced by `choice`.
    pub fn with_choice(&self, choice: &str) -> Option<String> {
        let span = self.fragment.clone()?;
        let head = self.original_text.get(..span.start)?;
        let tail = self.original_text.get(span.end..)?;
        Some(format!("{head}{choice}{tail}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingOutcome {
    Resolved(String),
    StillAmbiguous,
    NotPending,
}

const ORDINALS: &[&str] = &["first", "second", "third", "fourth", "fifth"];

/// Index of the candidate `text` picks: a 1-based number, an exact name,
/// or a name contained in the reply, in that order.
pub fn match_candidate(text: &str, candidates: &[String]) -> Option<usize> {
    let reply = canonical(text);
    if reply.is_empty() {
        return None;
    }

    let numeral = reply
        .strip_prefix("option ")
        .or_else(|| reply.strip_prefix("number "))
        .unwrap_or(&reply);
    if let Ok(n) = numeral.parse::<usize>() {
        return (1..=candidates.len()).contains(&n).then(|| n - 1);
    }
    if let Some(pos) = ORDINALS
        .iter()
        .position(|o| reply == *o || reply == format!("the {o}") || reply == format!("the {o} one"))
    {
        return (pos < candidates.len()).then_some(pos);
    }

    if let Some(idx) = candidates.iter().position(|c| canonical(c) == reply) {
        return Some(idx);
    }

    let haystack = padded(text);
    candidates
        .iter()
        .enumerate()
        .filter_map(|(idx, c)| {
            let name = canonical(c);
            (!name.is_empty() && haystack.contains(&format!(" {name} "))).then_some((name.len(), idx))
        })
        .max()
        .map(|(_, idx)| idx)
}

pub fn resolve_pending(text: &str, pending: Option<&PendingChoice>) -> PendingOutcome {
    let Some(pending) = pending else {
        return PendingOutcome::NotPending;
    };
    match match_candidate(text, &pending.candidates) {
        Some(idx) => PendingOutcome::Resolved(pending.candidates[idx].clone()),
        None => PendingOutcome::StillAmbiguous,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<String> {
        vec!["Kane Train".into(), "Train Kane".into(), "Kane Train B".into()]
    }

    fn pending() -> PendingChoice {
        PendingChoice {
            intent: Intent::Waiver,
            league_id: 14204,
            candidates: candidates(),
            original_text: "waivers for kane train".into(),
            fragment: None,
        }
    }

    #[test]
    fn numeric_reply_is_one_based() {
        assert_eq!(match_candidate("1", &candidates()), Some(0));
        assert_eq!(match_candidate(" 3) ", &candidates()), Some(2));
        assert_eq!(match_candidate("option 2", &candidates()), Some(1));
        assert_eq!(match_candidate("4", &candidates()), None);
        assert_eq!(match_candidate("0", &candidates()), None);
    }

    #[test]
    fn ordinal_words() {
        assert_eq!(match_candidate("the second one", &candidates()), Some(1));
        assert_eq!(match_candidate("fifth", &candidates()), None);
    }

    #[test]
    fn exact_name_beats_substring() {
        assert_eq!(match_candidate("kane train", &candidates()), Some(0));
    }

    #[test]
    fn longest_contained_name_wins() {
        assert_eq!(match_candidate("I meant Kane Train B", &candidates()), Some(2));
        assert_eq!(match_candidate("oh, train kane please", &candidates()), Some(1));
    }

    #[test]
    fn unrelated_reply_matches_nothing() {
        assert_eq!(match_candidate("neither", &candidates()), None);
        assert_eq!(match_candidate("", &candidates()), None);
    }

    #[test]
    fn choice_replaces_only_the_stored_span() {
        let p = PendingChoice {
            intent: Intent::MatchupSummary,
            original_text: "BG Select vs BG gw 5".into(),
            fragment: Some(13..15),
            ..pending()
        };
        assert_eq!(p.fragment_text(), Some("BG"));
        assert_eq!(p.with_choice("Big Goals").as_deref(), Some("BG Select vs Big Goals gw 5"));

        assert_eq!(pending().with_choice("Kane Train"), None);
        let stale = PendingChoice {
            fragment: Some(40..44),
            ..pending()
        };
        assert_eq!(stale.with_choice("Kane Train"), None);
    }

    #[test]
    fn resolve_pending_outcomes() {
        let p = pending();
        assert_eq!(resolve_pending("1", None), PendingOutcome::NotPending);
        assert_eq!(
            resolve_pending("1", Some(&p)),
            PendingOutcome::Resolved("Kane Train".into())
        );
        assert_eq!(resolve_pending("what?", Some(&p)), PendingOutcome::StillAmbiguous);
    }
}
