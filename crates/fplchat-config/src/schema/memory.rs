use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Cached-report retrieval used for "what changed" style questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    pub enabled: bool,
    /// Root holding `gw_<n>/*.md` report folders.
    pub reports_dir: PathBuf,
    /// Root holding `<kind>/<league>/gw/<n>.json` summaries.
    pub summary_dir: PathBuf,
    pub max_docs: u32,
    pub max_chars: u32,
    /// Minimum seconds between index rebuilds.
    pub refresh_secs: u64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            reports_dir: PathBuf::from("reports"),
            summary_dir: PathBuf::from("data/derived/summary"),
            max_docs: 120,
            max_chars: 2000,
            refresh_secs: 60,
        }
    }
}
