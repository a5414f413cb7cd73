//! Configuration schema types for fplchat.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod agent;
mod league;
mod llm;
mod memory;
mod system;
mod tools;

pub use agent::*;
pub use league::*;
pub use llm::*;
pub use memory::*;
pub use system::*;
pub use tools::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FplChatConfig {
    pub league: LeagueConfig,
    pub agent: AgentConfig,
    pub tools: ToolsConfig,
    pub llm: LlmConfig,
    pub memory: MemoryConfig,
    pub players: PlayersConfig,
    pub logging: LoggingConfig,
}
