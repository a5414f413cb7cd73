//! Per-conversation state: session defaults, the pending disambiguation
//! slot, and bounded history.

mod history;
mod pending;
mod session;

pub use history::{ConversationHistory, HistoryEntry, Role};
pub use pending::{match_candidate, resolve_pending, PendingChoice, PendingOutcome};
pub use session::{Session, TurnContext};
