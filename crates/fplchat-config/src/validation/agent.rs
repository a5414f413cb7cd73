//! League and dialogue-engine limits.

use crate::schema::FplChatConfig;

use super::helpers::validate_range;

pub(crate) fn validate_league(errors: &mut Vec<String>, config: &FplChatConfig) {
    if config.league.league_id <= 0 {
        errors.push(format!(
            "league.league_id = {} must be positive",
            config.league.league_id
        ));
    }
    if config.league.entry_id < 0 {
        errors.push(format!(
            "league.entry_id = {} must be 0 (unset) or positive",
            config.league.entry_id
        ));
    }
}

pub(crate) fn validate_agent(errors: &mut Vec<String>, config: &FplChatConfig) {
    let agent = &config.agent;
    validate_range(errors, "agent.history_limit", agent.history_limit, 1, 50);
    validate_range(errors, "agent.max_steps", agent.max_steps, 1, 20);
    validate_range(errors, "agent.max_candidates", agent.max_candidates, 2, 20);
    validate_range(
        errors,
        "agent.tool_result_chars",
        agent.tool_result_chars,
        500,
        100_000,
    );
}
