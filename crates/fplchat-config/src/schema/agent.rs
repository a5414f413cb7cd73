use serde::{Deserialize, Serialize};

/// Dialogue engine limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Exchanges kept in history (valid range: 1-50). Two entries per exchange.
    pub history_limit: u32,
    /// LLM round-trips per turn (valid range: 1-20).
    pub max_steps: u32,
    /// Candidates shown in a disambiguation prompt (valid range: 2-20).
    pub max_candidates: u32,
    /// Characters of a tool result fed back to the LLM (valid range: 500-100000).
    pub tool_result_chars: u32,
    /// Ask the LLM to narrate league summaries on the fast path.
    pub narrate_league_summary: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            history_limit: 6,
            max_steps: 6,
            max_candidates: 8,
            tool_result_chars: 6000,
            narrate_league_summary: false,
        }
    }
}
