//! Environment-variable overrides applied on top of the TOML file.

use std::path::PathBuf;

use fplchat_common::ConfigError;
use tracing::debug;

use crate::schema::{FplChatConfig, LlmProvider};

/// Apply overrides from the process environment.
pub fn apply_env_overrides(config: &mut FplChatConfig) -> Result<(), ConfigError> {
    apply_overrides_from(config, |key| std::env::var(key).ok())
}

/// Apply overrides from an arbitrary lookup. Blank values are ignored.
pub fn apply_overrides_from<F>(config: &mut FplChatConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| {
        lookup(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    if let Some(value) = get("LEAGUE_ID") {
        config.league.league_id = parse_int("LEAGUE_ID", &value)?;
    }
    if let Some(value) = get("ENTRY_ID") {
        config.league.entry_id = parse_int("ENTRY_ID", &value)?;
    }
    if let Some(value) = get("MCP_URL") {
        config.tools.url = value;
    }
    if let Some(value) = get("FPL_MCP_API_KEY") {
        config.tools.api_key = value;
    }
    if let Some(value) = get("LLM_PROVIDER") {
        config.llm.provider = LlmProvider::parse(&value).ok_or_else(|| {
            ConfigError::ParseError(format!("LLM_PROVIDER: unknown provider {value:?}"))
        })?;
    }
    if let Some(value) = get("LLM_MODEL") {
        config.llm.model = value;
    }
    if let Some(value) = get("REPORTS_DIR") {
        config.memory.reports_dir = PathBuf::from(value);
    }
    if let Some(value) = get("BOOTSTRAP_PATH") {
        config.players.bootstrap_path = PathBuf::from(value);
    }

    debug!(league_id = config.league.league_id, "environment overrides applied");
    Ok(())
}

fn parse_int(key: &str, value: &str) -> Result<i64, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::ParseError(format!("{key}: expected an integer, got {value:?}")))
}
