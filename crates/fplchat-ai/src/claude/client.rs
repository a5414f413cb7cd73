//! Claude API client struct, request building, and response parsing.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::{error_for_status, LlmError, LlmService};

use super::config::ClaudeConfig;

pub(crate) const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Claude API client.
pub struct ClaudeClient {
    pub(crate) config: ClaudeConfig,
    pub(crate) http: reqwest::Client,
}

impl ClaudeClient {
    pub fn new(config: ClaudeConfig) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::NetworkError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    pub(crate) fn api_url(&self) -> String {
        format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'))
    }

    /// Build the JSON request body for the Messages API.
    pub(crate) fn build_request_body(&self, system: &str, user: &str) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "messages": [{ "role": "user", "content": user }],
        });
        if !system.is_empty() {
            body["system"] = serde_json::json!(system);
        }
        body
    }

    /// Concatenate the text blocks of a Messages API response.
    pub(crate) fn parse_response(json: &serde_json::Value) -> Result<String, LlmError> {
        let blocks = json["content"]
            .as_array()
            .ok_or_else(|| LlmError::ParseError("response has no content array".into()))?;
        Ok(blocks
            .iter()
            .filter(|b| b["type"] == "text")
            .filter_map(|b| b["text"].as_str())
            .collect::<Vec<_>>()
            .join(""))
    }
}

#[async_trait]
impl LlmService for ClaudeClient {
    fn available(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError> {
        let body = self.build_request_body(system_prompt, user_prompt);
        debug!(model = %self.config.model, "Claude API request");

        let response = self
            .http
            .post(self.api_url())
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(LlmError::from_transport)?;

        if !response.status().is_success() {
            return Err(error_for_status(response).await);
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LlmError::ParseError(e.to_string()))?;
        Self::parse_response(&json)
    }
}
