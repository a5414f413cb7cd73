//! Validation for the external collaborators: tool backend, LLM, memory.

use crate::schema::{FplChatConfig, LlmProvider};

use super::helpers::{validate_range, validate_range_f64};

pub(crate) fn validate_tools(errors: &mut Vec<String>, config: &FplChatConfig) {
    let url = config.tools.url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        errors.push(format!("tools.url = {url:?} must be an http(s) URL"));
    }
    validate_range(errors, "tools.timeout_secs", config.tools.timeout_secs, 1, 600);
}

pub(crate) fn validate_llm(errors: &mut Vec<String>, config: &FplChatConfig) {
    if config.llm.provider == LlmProvider::None {
        return;
    }
    validate_range(errors, "llm.max_tokens", config.llm.max_tokens, 16, 32_000);
    validate_range_f64(errors, "llm.temperature", config.llm.temperature, 0.0, 2.0);
}

pub(crate) fn validate_memory(errors: &mut Vec<String>, config: &FplChatConfig) {
    if !config.memory.enabled {
        return;
    }
    validate_range(errors, "memory.max_docs", config.memory.max_docs, 1, 10_000);
    validate_range(errors, "memory.max_chars", config.memory.max_chars, 100, 100_000);
}
