//! fplchat configuration system.
//!
//! TOML configuration with environment overrides and validation. Every
//! section has defaults so partial configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use fplchat_config::load_config;
//!
//! let config = load_config(None).expect("failed to load config");
//! println!("league {}", config.league.league_id);
//! ```

pub mod env;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use env::apply_env_overrides;
pub use schema::{FplChatConfig, CONFIG_SCHEMA_VERSION};

use std::path::Path;

use fplchat_common::ConfigError;

/// Load config from `path` (or the platform default), apply environment
/// overrides, and validate the result.
pub fn load_config(path: Option<&Path>) -> Result<FplChatConfig, ConfigError> {
    let mut config = match path {
        Some(path) => toml_loader::load_or_create(path)?,
        None => toml_loader::load_default()?,
    };
    env::apply_env_overrides(&mut config)?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to pretty-printed TOML.
pub fn config_to_toml(config: &FplChatConfig) -> String {
    toml::to_string_pretty(config).unwrap_or_else(|e| format!("# failed to serialize config: {e}"))
}
