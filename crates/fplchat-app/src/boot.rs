//! Builds the agent's collaborators from config.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use fplchat_agent::{Agent, AgentFactory, AgentSettings, MemoryIndex, PlayerDirectory, ReportIndex};
use fplchat_ai::{ClaudeClient, ClaudeConfig, DisabledLlm, LlmService, OpenAiClient, OpenAiConfig};
use fplchat_common::FplChatError;
use fplchat_config::schema::{FplChatConfig, LlmConfig, LlmProvider};
use fplchat_mcp::{McpClientConfig, McpHttpClient, ToolBackend};

pub fn agent_settings(config: &FplChatConfig) -> AgentSettings {
    AgentSettings {
        default_league_id: config.league.league_id,
        default_entry_id: config.league.entry(),
        history_limit: config.agent.history_limit as usize,
        max_steps: config.agent.max_steps as usize,
        max_candidates: config.agent.max_candidates as usize,
        tool_result_chars: config.agent.tool_result_chars as usize,
        narrate_league_summary: config.agent.narrate_league_summary,
    }
}

/// The configured provider, or [`DisabledLlm`] when its key is missing.
pub fn build_llm(config: &LlmConfig) -> Result<Arc<dyn LlmService>, FplChatError> {
    let model = Some(config.model.trim()).filter(|m| !m.is_empty());
    match config.provider {
        LlmProvider::Claude => match ClaudeConfig::from_env() {
            Ok(mut cfg) => {
                if let Some(model) = model {
                    cfg = cfg.with_model(model);
                }
                let cfg = cfg.with_max_tokens(config.max_tokens).with_temperature(config.temperature);
                info!(model = %cfg.model, "Using Claude");
                let client = ClaudeClient::new(cfg).map_err(|e| FplChatError::Llm(e.to_string()))?;
                Ok(Arc::new(client))
            }
            Err(e) => {
                warn!("{e}; LLM fallback disabled");
                Ok(Arc::new(DisabledLlm))
            }
        },
        LlmProvider::OpenAi => match OpenAiConfig::from_env() {
            Ok(mut cfg) => {
                if let Some(model) = model {
                    cfg = cfg.with_model(model);
                }
                let cfg = cfg.with_max_tokens(config.max_tokens).with_temperature(config.temperature);
                info!(model = %cfg.model, "Using OpenAI-compatible endpoint");
                let client = OpenAiClient::new(cfg).map_err(|e| FplChatError::Llm(e.to_string()))?;
                Ok(Arc::new(client))
            }
            Err(e) => {
                warn!("{e}; LLM fallback disabled");
                Ok(Arc::new(DisabledLlm))
            }
        },
        LlmProvider::None => {
            info!("LLM fallback disabled by config");
            Ok(Arc::new(DisabledLlm))
        }
    }
}

pub fn build_tools(config: &FplChatConfig) -> Result<Arc<dyn ToolBackend>, FplChatError> {
    let mut cfg = McpClientConfig::new(config.tools.url.clone())
        .with_timeout(Duration::from_secs(u64::from(config.tools.timeout_secs)));
    if !config.tools.api_key.trim().is_empty() {
        cfg = cfg.with_api_key(config.tools.api_key.trim());
    }
    let client = McpHttpClient::new(cfg).map_err(|e| FplChatError::Tools(e.to_string()))?;
    info!(url = %client.url(), "Tool backend configured");
    Ok(Arc::new(client))
}

pub fn build_memory(config: &FplChatConfig) -> Option<Arc<dyn MemoryIndex>> {
    let memory = &config.memory;
    if !memory.enabled {
        return None;
    }
    let index = ReportIndex::new(memory.reports_dir.clone(), memory.summary_dir.clone())
        .with_limits(memory.max_docs as usize, memory.max_chars as usize)
        .with_refresh(Duration::from_secs(memory.refresh_secs));
    Some(Arc::new(index))
}

/// Factory producing one agent per conversation over shared clients.
pub fn agent_factory(config: &FplChatConfig) -> Result<AgentFactory, FplChatError> {
    let tools = build_tools(config)?;
    let llm = build_llm(&config.llm)?;
    let memory = build_memory(config);
    let players = Arc::new(PlayerDirectory::new(config.players.bootstrap_path.clone()));
    let settings = agent_settings(config);

    Ok(Arc::new(move || {
        let agent = Agent::new(tools.clone(), llm.clone(), settings.clone()).with_players(players.clone());
        match &memory {
            Some(memory) => agent.with_memory(memory.clone()),
            None => agent,
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_follow_config() {
        let mut config = FplChatConfig::default();
        config.league.entry_id = 0;
        config.agent.max_steps = 3;
        let settings = agent_settings(&config);
        assert_eq!(settings.default_league_id, 14204);
        assert_eq!(settings.default_entry_id, None);
        assert_eq!(settings.max_steps, 3);

        config.league.entry_id = 55;
        assert_eq!(agent_settings(&config).default_entry_id, Some(55));
    }

    #[test]
    fn disabled_provider_yields_unavailable_llm() {
        let config = LlmConfig {
            provider: LlmProvider::None,
            ..LlmConfig::default()
        };
        let llm = build_llm(&config).unwrap();
        assert!(!llm.available());
    }

    #[test]
    fn memory_can_be_switched_off() {
        let mut config = FplChatConfig::default();
        config.memory.enabled = false;
        assert!(build_memory(&config).is_none());
        config.memory.enabled = true;
        assert!(build_memory(&config).is_some());
    }
}
