//! In-memory collaborators for driving `Agent::run` in tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use fplchat_ai::{LlmError, LlmService};
use fplchat_mcp::{ToolArgs, ToolBackend, ToolError, ToolInfo};

use crate::agent::{Agent, AgentSettings};

/// Canned results per tool name; records every call.
#[derive(Default)]
pub(crate) struct FakeBackend {
    responses: HashMap<String, Value>,
    failures: HashMap<String, String>,
    calls: Mutex<Vec<(String, ToolArgs)>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, tool: &str, result: Value) -> Self {
        self.responses.insert(tool.to_string(), result);
        self
    }

    pub fn failing(mut self, tool: &str, message: &str) -> Self {
        self.failures.insert(tool.to_string(), message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<(String, ToolArgs)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, tool: &str) -> Vec<ToolArgs> {
        self.calls()
            .into_iter()
            .filter(|(name, _)| name == tool)
            .map(|(_, args)| args)
            .collect()
    }
}

#[async_trait]
impl ToolBackend for FakeBackend {
    async fn list(&self) -> Result<Vec<ToolInfo>, ToolError> {
        let mut names: Vec<&String> = self.responses.keys().chain(self.failures.keys()).collect();
        names.sort();
        names.dedup();
        Ok(names
            .into_iter()
            .map(|name| ToolInfo {
                name: name.clone(),
                description: format!("{name} tool"),
            })
            .collect())
    }

    async fn call(&self, name: &str, args: &ToolArgs) -> Result<Value, ToolError> {
        self.calls.lock().unwrap().push((name.to_string(), args.clone()));
        if let Some(message) = self.failures.get(name) {
            return Err(ToolError::Tool(message.clone()));
        }
        self.responses
            .get(name)
            .cloned()
            .ok_or_else(|| ToolError::Tool(format!("unknown tool: {name}")))
    }
}

/// Returns queued outputs in order and records the prompts it saw.
pub(crate) struct ScriptedLlm {
    available: bool,
    outputs: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    pub fn new<I, S>(outputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            available: true,
            outputs: Mutex::new(outputs.into_iter().map(|s| Ok(s.into())).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new(Vec::<String>::new())
        }
    }

    pub fn then_fail(self, message: &str) -> Self {
        self.outputs.lock().unwrap().push_back(Err(message.to_string()));
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmService for ScriptedLlm {
    fn available(&self) -> bool {
        self.available
    }

    async fn generate(&self, _system_prompt: &str, user_prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(user_prompt.to_string());
        match self.outputs.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(LlmError::ApiError(message)),
            None => Err(LlmError::ApiError("script exhausted".into())),
        }
    }
}

/// Four teams; "BG" is the short name of two of them.
pub(crate) fn league_entries() -> Value {
    json!({
        "league_id": 14204,
        "teams": [
            { "entry_id": 100, "entry_name": "Boot Gang", "short_name": "BG" },
            { "entry_id": 200, "entry_name": "Glock Tua", "short_name": "GT" },
            { "entry_id": 300, "entry_name": "Luckier Than You", "short_name": "LTY" },
            { "entry_id": 400, "entry_name": "Big Goals", "short_name": "BG" },
        ]
    })
}

pub(crate) fn agent(backend: &Arc<FakeBackend>, llm: &Arc<ScriptedLlm>) -> Agent {
    agent_with(backend, llm, AgentSettings::default())
}

pub(crate) fn agent_with(backend: &Arc<FakeBackend>, llm: &Arc<ScriptedLlm>, settings: AgentSettings) -> Agent {
    Agent::new(backend.clone(), llm.clone(), settings)
}
