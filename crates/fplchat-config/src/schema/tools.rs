use std::fmt;

use serde::{Deserialize, Serialize};

/// Tool backend (MCP server) connection.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub url: String,
    pub api_key: String,
    /// Request timeout in seconds (valid range: 1-600).
    pub timeout_secs: u32,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080/mcp".to_string(),
            api_key: String::new(),
            timeout_secs: 30,
        }
    }
}

impl fmt::Debug for ToolsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolsConfig")
            .field("url", &self.url)
            .field("api_key", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
