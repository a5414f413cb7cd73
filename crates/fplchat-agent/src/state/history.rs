use std::collections::VecDeque;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

/// Most recent `2 × limit` messages, oldest evicted first.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl ConversationHistory {
    pub fn new(limit: usize) -> Self {
        let capacity = limit.max(1) * 2;
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append a trimmed message. Blank content is ignored.
    pub fn push(&mut self, role: Role, content: &str) {
        let content = content.trim();
        if content.is_empty() {
            return;
        }
        self.entries.push_back(HistoryEntry {
            role,
            content: content.to_string(),
        });
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn record_exchange(&mut self, user: &str, reply: &str) {
        self.push(Role::User, user);
        self.push(Role::Assistant, reply);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Prompt block, or `None` when there is nothing to show.
    pub fn render(&self) -> Option<String> {
        if self.entries.is_empty() {
            return None;
        }
        let lines: Vec<String> = self
            .entries
            .iter()
            .map(|e| match e.role {
                Role::User => format!("User: {}", e.content),
                Role::Assistant => format!("Assistant: {}", e.content),
            })
            .collect();
        Some(format!("Recent conversation:\n{}", lines.join("\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_most_recent_entries() {
        let mut history = ConversationHistory::new(2);
        for i in 0..7 {
            history.push(Role::User, &format!("message {i}"));
        }
        assert_eq!(history.len(), 4);
        let contents: Vec<&str> = history.iter().map(|e| e.content.as_str()).collect();
        assert_eq!(contents, ["message 3", "message 4", "message 5", "message 6"]);
    }

    #[test]
    fn blank_messages_are_skipped() {
        let mut history = ConversationHistory::new(6);
        history.record_exchange("   ", "");
        assert!(history.is_empty());
        history.record_exchange("  hi  ", "hello");
        assert_eq!(history.iter().next().map(|e| e.content.as_str()), Some("hi"));
    }

    #[test]
    fn render_labels_roles() {
        let mut history = ConversationHistory::new(6);
        assert_eq!(history.render(), None);
        history.record_exchange("standings?", "Here they are.");
        assert_eq!(
            history.render().unwrap(),
            "Recent conversation:\nUser: standings?\nAssistant: Here they are."
        );
    }
}
