//! MCP client over plain HTTP POST (JSON or SSE responses).

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::rpc::{self, extract_tool_payload, parse_rpc_body};
use crate::{ToolArgs, ToolBackend, ToolError, ToolInfo};

const SESSION_HEADER: &str = "Mcp-Session-Id";

#[derive(Clone)]
pub struct McpClientConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl McpClientConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.api_key = (!key.trim().is_empty()).then_some(key);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for McpClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("McpClientConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// JSON-RPC tool client. The MCP handshake runs lazily before the first
/// call, and again if the server forgets the session.
pub struct McpHttpClient {
    config: McpClientConfig,
    http: reqwest::Client,
    next_id: AtomicU64,
    /// `None` until initialized; `Some(None)` when the server issued no id.
    session: Mutex<Option<Option<String>>>,
}

#[derive(Deserialize)]
struct ToolListing {
    #[serde(default)]
    tools: Vec<ToolInfo>,
}

impl McpHttpClient {
    pub fn new(config: McpClientConfig) -> Result<Self, ToolError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(config.timeout)
            .build()
            .map_err(|e| ToolError::Connection(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            config,
            http,
            next_id: AtomicU64::new(1),
            session: Mutex::new(None),
        })
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// POST one JSON-RPC message. Returns the decoded `result` (or `{}` for
    /// notifications) plus any session id the server handed back.
    async fn post(
        &self,
        body: &Value,
        session_id: Option<&str>,
        expect_response: bool,
    ) -> Result<(Value, Option<String>), ToolError> {
        let mut request = self
            .http
            .post(&self.config.url)
            .header(reqwest::header::ACCEPT, "application/json, text/event-stream")
            .json(body);
        if let Some(key) = &self.config.api_key {
            request = request.header("X-API-Key", key);
        }
        if let Some(session) = session_id {
            request = request.header(SESSION_HEADER, session);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ToolError::Connection(format!("HTTP request failed: {e}")))?;

        let issued = response
            .headers()
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ToolError::Http {
                status: status.as_u16(),
                message: message.chars().take(300).collect(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        let text = response
            .text()
            .await
            .map_err(|e| ToolError::InvalidResponse(format!("failed to read body: {e}")))?;

        if text.trim().is_empty() {
            if expect_response {
                return Err(ToolError::InvalidResponse("empty response body".into()));
            }
            return Ok((json!({}), issued));
        }
        if !expect_response {
            return Ok((json!({}), issued));
        }
        Ok((parse_rpc_body(&content_type, &text)?, issued))
    }

    /// Run `initialize` + `notifications/initialized` unless already done.
    async fn ensure_session(&self) -> Result<Option<String>, ToolError> {
        let mut guard = self.session.lock().await;
        if let Some(existing) = guard.as_ref() {
            return Ok(existing.clone());
        }

        let init = rpc::request(self.next_id(), "initialize", rpc::initialize_params());
        let (result, issued) = self.post(&init, None, true).await?;
        debug!(
            server = %result["serverInfo"]["name"].as_str().unwrap_or("unknown"),
            session = ?issued,
            "MCP session initialized"
        );

        let notify = rpc::notification("notifications/initialized");
        if let Err(e) = self.post(&notify, issued.as_deref(), false).await {
            warn!("initialized notification failed: {e}");
        }

        *guard = Some(issued.clone());
        Ok(issued)
    }

    async fn reset_session(&self) {
        *self.session.lock().await = None;
    }

    async fn call_once(&self, name: &str, args: &ToolArgs) -> Result<Value, ToolError> {
        let session = self.ensure_session().await?;
        let body = rpc::request(
            self.next_id(),
            "tools/call",
            json!({ "name": name, "arguments": args }),
        );
        let (result, _) = self.post(&body, session.as_deref(), true).await?;
        extract_tool_payload(&result)
    }
}

#[async_trait]
impl ToolBackend for McpHttpClient {
    async fn list(&self) -> Result<Vec<ToolInfo>, ToolError> {
        let url = rpc::tools_url(&self.config.url);
        let mut request = self.http.get(&url);
        if let Some(key) = &self.config.api_key {
            request = request.header("X-API-Key", key);
        }
        let response = request
            .send()
            .await
            .map_err(|e| ToolError::Connection(format!("HTTP request failed: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::Http {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        let listing: ToolListing = response
            .json()
            .await
            .map_err(|e| ToolError::InvalidResponse(format!("bad tool listing: {e}")))?;
        info!(count = listing.tools.len(), "discovered tools");
        Ok(listing.tools)
    }

    async fn call(&self, name: &str, args: &ToolArgs) -> Result<Value, ToolError> {
        debug!(tool = name, "calling tool");
        let result = self.call_once(name, args).await;
        if let Err(ToolError::Http { status: 404, .. }) = &result {
            let had_session = matches!(*self.session.lock().await, Some(Some(_)));
            if had_session {
                info!("MCP session expired, re-initializing");
                self.reset_session().await;
                return self.call_once(name, args).await;
            }
        }
        result
    }
}
