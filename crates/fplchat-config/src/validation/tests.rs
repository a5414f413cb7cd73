//! Tests for the full validation pipeline.

use super::*;
use crate::schema::*;

#[test]
fn default_config_validates() {
    assert!(validate(&FplChatConfig::default()).is_ok());
}

#[test]
fn catches_zero_max_steps() {
    let mut config = FplChatConfig::default();
    config.agent.max_steps = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("agent.max_steps"));
}

#[test]
fn catches_candidate_cap_below_two() {
    let mut config = FplChatConfig::default();
    config.agent.max_candidates = 1;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("agent.max_candidates"));
}

#[test]
fn catches_non_http_tool_url() {
    let mut config = FplChatConfig::default();
    config.tools.url = "localhost:8080/mcp".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("tools.url"));
}

#[test]
fn catches_negative_league() {
    let mut config = FplChatConfig::default();
    config.league.league_id = -1;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("league.league_id"));
}

#[test]
fn llm_limits_ignored_when_disabled() {
    let mut config = FplChatConfig::default();
    config.llm.provider = LlmProvider::None;
    config.llm.temperature = 9.0;
    assert!(validate(&config).is_ok());

    config.llm.provider = LlmProvider::Claude;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("llm.temperature"));
}

#[test]
fn collects_multiple_errors() {
    let mut config = FplChatConfig::default();
    config.agent.history_limit = 0;
    config.tools.timeout_secs = 0;
    config.memory.max_docs = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("agent.history_limit"));
    assert!(err.contains("tools.timeout_secs"));
    assert!(err.contains("memory.max_docs"));
}
