//! Full configuration validation.
//!
//! Each section has its own check; this orchestrator runs them all and
//! collects errors into a single `ConfigError`.

mod agent;
mod helpers;
mod services;

#[cfg(test)]
mod tests;

use crate::schema::FplChatConfig;
use fplchat_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &FplChatConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    agent::validate_league(&mut errors, config);
    agent::validate_agent(&mut errors, config);
    services::validate_tools(&mut errors, config);
    services::validate_llm(&mut errors, config);
    services::validate_memory(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
