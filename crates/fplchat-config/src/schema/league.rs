use serde::{Deserialize, Serialize};

/// League defaults used when neither the message nor the session names one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LeagueConfig {
    pub league_id: i64,
    /// The user's own team. `0` means unset.
    pub entry_id: i64,
}

impl Default for LeagueConfig {
    fn default() -> Self {
        Self {
            league_id: 14204,
            entry_id: 0,
        }
    }
}

impl LeagueConfig {
    pub fn entry(&self) -> Option<i64> {
        (self.entry_id > 0).then_some(self.entry_id)
    }
}
