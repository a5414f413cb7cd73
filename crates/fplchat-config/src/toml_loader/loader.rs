//! Core TOML config loading: read from a path or the platform default.

use crate::schema::FplChatConfig;
use crate::validation;
use fplchat_common::ConfigError;
use std::path::Path;
use tracing::{info, warn};

use super::paths::{create_default_config, default_config_path};

/// Load config from a specific TOML file path.
///
/// Missing fields take serde defaults. A config that parses but fails
/// validation is logged and returned as-is; strict callers validate again.
pub fn load_from_path(path: &Path) -> Result<FplChatConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    let config: FplChatConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    if let Err(e) = validation::validate(&config) {
        warn!("config validation warning: {e}");
    }

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load from `path`, writing the commented default template there first
/// when the file does not exist yet.
pub fn load_or_create(path: &Path) -> Result<FplChatConfig, ConfigError> {
    match load_from_path(path) {
        Ok(config) => Ok(config),
        Err(ConfigError::FileNotFound(_)) => {
            info!("no config found at {}, creating default", path.display());
            create_default_config(path)?;
            Ok(FplChatConfig::default())
        }
        Err(e) => Err(e),
    }
}

/// Load config from the platform-specific default path.
///
/// On Linux: `~/.config/fplchat/config.toml`
/// On macOS: `~/Library/Application Support/fplchat/config.toml`
pub fn load_default() -> Result<FplChatConfig, ConfigError> {
    load_or_create(&default_config_path()?)
}
