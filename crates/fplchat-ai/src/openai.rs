//! OpenAI-compatible chat-completions client.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::{error_for_status, LlmError, LlmService};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    /// API root, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub timeout_secs: u64,
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: OPENAI_BASE_URL.to_string(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 1024,
            temperature: 0.2,
            timeout_secs: 120,
        }
    }

    /// Create config from `OPENAI_API_KEY`, honouring `OPENAI_BASE_URL`.
    pub fn from_env() -> Result<Self, LlmError> {
        let key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| LlmError::ApiError("OpenAI not configured. Set OPENAI_API_KEY.".into()))?;
        let mut config = Self::new(key.trim());
        if let Ok(base) = std::env::var("OPENAI_BASE_URL") {
            if !base.trim().is_empty() {
                config.base_url = base.trim().to_string();
            }
        }
        Ok(config)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

pub struct OpenAiClient {
    config: OpenAiConfig,
    http: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::NetworkError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    fn api_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn build_request_body(&self, system: &str, user: &str) -> serde_json::Value {
        let mut messages = Vec::new();
        if !system.is_empty() {
            messages.push(serde_json::json!({ "role": "system", "content": system }));
        }
        messages.push(serde_json::json!({ "role": "user", "content": user }));
        serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "messages": messages,
        })
    }

    fn parse_response(json: &serde_json::Value) -> Result<String, LlmError> {
        let choice = json["choices"]
            .get(0)
            .ok_or_else(|| LlmError::ParseError("response has no choices".into()))?;
        Ok(choice["message"]["content"]
            .as_str()
            .unwrap_or_default()
            .to_string())
    }
}

#[async_trait]
impl LlmService for OpenAiClient {
    fn available(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError> {
        let body = self.build_request_body(system_prompt, user_prompt);
        debug!(model = %self.config.model, "chat completions request");

        let response = self
            .http
            .post(self.api_url())
            .bearer_auth(&self.config.api_key)
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

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::Method::POST;
    use httpmock::MockServer;
    use serde_json::json;

    #[test]
    fn system_prompt_is_first_message() {
        let client = OpenAiClient::new(OpenAiConfig::new("k")).unwrap();
        let body = client.build_request_body("rules", "question");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "question");
    }

    #[test]
    fn missing_choices_is_parse_error() {
        let err = OpenAiClient::parse_response(&json!({ "choices": [] })).unwrap_err();
        assert!(matches!(err, LlmError::ParseError(_)));
    }

    #[tokio::test]
    async fn generate_uses_bearer_auth() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .header("authorization", "Bearer sk-test");
            then.status(200).json_body(json!({
                "choices": [{ "message": { "role": "assistant", "content": "ok" } }]
            }));
        });

        let client = OpenAiClient::new(
            OpenAiConfig::new("sk-test").with_base_url(format!("{}/v1", server.base_url())),
        )
        .unwrap();
        assert_eq!(client.generate("", "ping").await.unwrap(), "ok");
        mock.assert();
    }

    #[tokio::test]
    async fn server_error_keeps_body_excerpt() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(500).body("upstream exploded");
        });

        let client = OpenAiClient::new(
            OpenAiConfig::new("sk-test").with_base_url(format!("{}/v1", server.base_url())),
        )
        .unwrap();
        let err = client.generate("", "ping").await.unwrap_err().to_string();
        assert!(err.contains("500"));
        assert!(err.contains("upstream exploded"));
    }
}
