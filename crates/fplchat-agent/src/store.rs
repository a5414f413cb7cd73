//! Conversation store: one agent per session id.
//!
//! Each agent sits behind its own async mutex, so turns within a
//! conversation run one at a time while separate conversations proceed
//! in parallel. The map lock is only held to look up or insert an entry.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use fplchat_common::SessionId;

use crate::agent::{Agent, AgentReply};
use crate::state::TurnContext;

/// Builds a fresh agent for a new conversation.
pub type AgentFactory = Arc<dyn Fn() -> Agent + Send + Sync>;

struct Conversation {
    agent: Arc<Mutex<Agent>>,
    last_used: Instant,
}

/// Thread-safe map of live conversations.
#[derive(Clone)]
pub struct ConversationStore {
    conversations: Arc<RwLock<HashMap<SessionId, Conversation>>>,
    factory: AgentFactory,
}

impl ConversationStore {
    pub fn new(factory: AgentFactory) -> Self {
        Self {
            conversations: Arc::new(RwLock::new(HashMap::new())),
            factory,
        }
    }

    /// The agent for `session_id`, created on first use.
    pub async fn get_or_create(&self, session_id: &SessionId) -> Arc<Mutex<Agent>> {
        let mut map = self.conversations.write().await;
        let conversation = map.entry(session_id.clone()).or_insert_with(|| {
            debug!(session = %session_id, "New conversation");
            Conversation {
                agent: Arc::new(Mutex::new((self.factory)())),
                last_used: Instant::now(),
            }
        });
        conversation.last_used = Instant::now();
        conversation.agent.clone()
    }

    /// Run one turn in `session_id`'s conversation.
    pub async fn run(&self, session_id: &SessionId, message: &str, context: Option<&TurnContext>) -> AgentReply {
        let agent = self.get_or_create(session_id).await;
        let mut agent = agent.lock().await;
        agent.run(message, context).await
    }

    /// Clear a conversation's state. Returns false if it does not exist.
    pub async fn reset(&self, session_id: &SessionId) -> bool {
        let agent = {
            let map = self.conversations.read().await;
            match map.get(session_id) {
                Some(conversation) => conversation.agent.clone(),
                None => return false,
            }
        };
        agent.lock().await.reset();
        true
    }

    pub async fn remove(&self, session_id: &SessionId) -> bool {
        self.conversations.write().await.remove(session_id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.conversations.read().await.is_empty()
    }

    /// Drop conversations idle for longer than `max_idle`.
    pub async fn reap_idle(&self, max_idle: Duration) -> usize {
        let mut map = self.conversations.write().await;
        let now = Instant::now();
        let before = map.len();
        map.retain(|_, c| now.duration_since(c.last_used) <= max_idle);
        let reaped = before - map.len();
        if reaped > 0 {
            info!(reaped, remaining = map.len(), "Reaped idle conversations");
        }
        reaped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{league_entries, FakeBackend, ScriptedLlm};
    use crate::AgentSettings;
    use serde_json::json;

    fn store(backend: Arc<FakeBackend>) -> ConversationStore {
        let llm = Arc::new(ScriptedLlm::unavailable());
        ConversationStore::new(Arc::new(move || {
            Agent::new(backend.clone(), llm.clone(), AgentSettings::default())
        }))
    }

    fn backend() -> Arc<FakeBackend> {
        Arc::new(
            FakeBackend::new()
                .with("league_entries", league_entries())
                .with("manager_streak", json!({ "start_win_streak": 1, "current_win_streak": 2, "max_win_streak": 3 })),
        )
    }

    #[tokio::test]
    async fn conversations_keep_separate_sessions() {
        let store = store(backend());
        let a = SessionId::from("a");
        let b = SessionId::from("b");

        store.run(&a, "win streak for Glock Tua", None).await;
        let reply = store.run(&b, "win streak", None).await;
        assert_eq!(reply.content, "Which team should I check for win streaks?");

        let reply = store.run(&a, "win streak", None).await;
        assert!(reply.content.starts_with("Glock Tua win streaks"));
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn reset_clears_one_conversation() {
        let store = store(backend());
        let a = SessionId::from("a");
        store.run(&a, "win streak for Glock Tua", None).await;

        assert!(store.reset(&a).await);
        assert!(!store.reset(&SessionId::from("missing")).await);

        let agent = store.get_or_create(&a).await;
        let agent = agent.lock().await;
        assert!(agent.history().is_empty());
        assert_eq!(agent.session().entry_id, None);
    }

    #[tokio::test]
    async fn remove_and_reap() {
        let store = store(backend());
        store.get_or_create(&SessionId::from("a")).await;
        store.get_or_create(&SessionId::from("b")).await;

        assert!(store.remove(&SessionId::from("a")).await);
        assert!(!store.remove(&SessionId::from("a")).await);
        assert_eq!(store.reap_idle(Duration::from_secs(3600)).await, 0);
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(store.reap_idle(Duration::ZERO).await, 1);
        assert!(store.is_empty().await);
    }
}
