//! Anthropic Claude API client.
//!
//! Implements `LlmService` via the Messages API
//! (https://api.anthropic.com/v1/messages) with `x-api-key` auth.

mod client;
mod config;


pub use client::ClaudeClient;
pub use config::ClaudeConfig;
