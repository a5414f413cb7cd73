//! Player lookup and logging settings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Side-loaded player-name table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayersConfig {
    pub bootstrap_path: PathBuf,
}

impl Default for PlayersConfig {
    fn default() -> Self {
        Self {
            bootstrap_path: PathBuf::from("data/raw/bootstrap/bootstrap-static.json"),
        }
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// `tracing_subscriber` filter directive scoped to this workspace.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "fplchat=trace",
            LogLevel::Debug => "fplchat=debug",
            LogLevel::Info => "fplchat=info",
            LogLevel::Warn => "fplchat=warn",
            LogLevel::Error => "fplchat=error",
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}
