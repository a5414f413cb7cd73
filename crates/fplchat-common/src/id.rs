use serde::{Deserialize, Serialize};
use std::fmt;

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Identifies one conversation at the transport boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new() -> Self {
        Self(new_id())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_id_is_v4_uuid() {
        let parsed = uuid::Uuid::parse_str(&new_id()).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
    }

    #[test]
    fn session_ids_are_unique() {
        assert_ne!(SessionId::new(), SessionId::new());
    }

    #[test]
    fn session_id_from_caller_string() {
        let sid = SessionId::from("web-42");
        assert_eq!(sid.as_str(), "web-42");
        assert_eq!(sid.to_string(), "web-42");
    }

    #[test]
    fn session_id_serializes_as_plain_string() {
        let sid = SessionId::from("abc");
        assert_eq!(serde_json::to_string(&sid).unwrap(), "\"abc\"");
    }
}
