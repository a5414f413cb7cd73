//! Dialogue engine for the fplchat league assistant.
//!
//! An [`Agent`] owns one conversation. Each message is matched against a
//! table of intents and answered by a deterministic handler that calls a
//! single league-data tool. Messages no handler claims go to an LLM that
//! plans tool calls through a JSON action envelope. Ambiguous team names
//! turn into a numbered question whose answer re-runs the original request.

pub mod agent;
pub mod defaults;
pub mod events;
mod handlers;
pub mod intent;
mod llm_loop;
pub mod memory;
pub mod players;
pub mod render;
pub mod resolver;
pub mod sanitize;
pub mod state;
pub mod store;
pub mod text;
pub mod values;

#[cfg(test)]
mod test_support;

pub use agent::{Agent, AgentReply, AgentSettings};
pub use events::ToolEvent;
pub use handlers::format_candidates;
pub use memory::{MemoryDoc, MemoryIndex, ReportIndex};
pub use players::PlayerDirectory;
pub use state::{Session, TurnContext};
pub use store::{AgentFactory, ConversationStore};
