//! LLM completion clients for fplchat.
//!
//! The dialogue engine needs exactly two things from a model: whether one
//! is configured at all, and a single-shot `generate(system, user)` call.
//! Providers:
//! - Anthropic Messages API (`ClaudeClient`)
//! - OpenAI-compatible chat completions (`OpenAiClient`)
//! - `DisabledLlm` when no key is configured

pub mod claude;
pub mod openai;

use async_trait::async_trait;

pub use claude::{ClaudeClient, ClaudeConfig};
pub use openai::{OpenAiClient, OpenAiConfig};

/// A text-completion service.
#[async_trait]
pub trait LlmService: Send + Sync {
    /// Whether a usable model is configured.
    fn available(&self) -> bool;

    /// Complete `user_prompt` under `system_prompt`. May return an empty string.
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Timeout")]
    Timeout,
    #[error("LLM not configured")]
    NotConfigured,
}

impl LlmError {
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::NetworkError(err.to_string())
        }
    }
}

/// Map a non-success HTTP response to an error, keeping a short body excerpt.
pub(crate) async fn error_for_status(response: reqwest::Response) -> LlmError {
    let status = response.status();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return LlmError::RateLimited;
    }
    let text = response.text().await.unwrap_or_default();
    let text = text.chars().take(200).collect::<String>();
    LlmError::ApiError(format!("HTTP {status}: {text}"))
}

/// Stand-in used when no provider key is available.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledLlm;

#[async_trait]
impl LlmService for DisabledLlm {
    fn available(&self) -> bool {
        false
    }

    async fn generate(&self, _system_prompt: &str, _user_prompt: &str) -> Result<String, LlmError> {
        Err(LlmError::NotConfigured)
    }
}
