//! Tool backend access for fplchat.
//!
//! The dialogue engine talks to league data only through [`ToolBackend`]:
//! a discovery call and a named-tool invocation returning JSON. The
//! production implementation is [`McpHttpClient`], a JSON-RPC 2.0 client
//! for an MCP server reachable over HTTP.

mod client;
mod rpc;

#[cfg(test)]
mod tests;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use client::{McpClientConfig, McpHttpClient};
pub use rpc::{extract_tool_payload, parse_rpc_body, tools_url};

/// Named arguments for a tool call.
pub type ToolArgs = serde_json::Map<String, serde_json::Value>;

/// A tool advertised by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[async_trait]
pub trait ToolBackend: Send + Sync {
    /// List the tools the backend exposes.
    async fn list(&self) -> Result<Vec<ToolInfo>, ToolError>;

    /// Invoke `name` with `args`, returning its structured result.
    async fn call(&self, name: &str, args: &ToolArgs) -> Result<serde_json::Value, ToolError>;
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ToolError {
    /// The tool ran and reported a failure. The message is the tool's own.
    #[error("{0}")]
    Tool(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("rpc error: {0}")]
    Rpc(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
