use serde::{Deserialize, Serialize};

/// Which completion service backs the LLM fallback.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    Claude,
    OpenAi,
    None,
}

impl LlmProvider {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "claude" | "anthropic" => Some(Self::Claude),
            "openai" => Some(Self::OpenAi),
            "none" | "off" | "" => Some(Self::None),
            _ => None,
        }
    }
}

/// LLM settings. API keys come from the environment, never the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    /// Model override; empty uses the client's default.
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::Claude,
            model: String::new(),
            max_tokens: 1024,
            temperature: 0.2,
        }
    }
}
