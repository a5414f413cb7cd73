//! Element id → player display name, read from the bootstrap file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::SystemTime;

use serde_json::Value;

use crate::values::{get_array, get_i64, get_str};

#[derive(Debug, Default)]
struct Cache {
    modified: Option<SystemTime>,
    names: HashMap<i64, String>,
}

/// Owned player-name cache. [`PlayerDirectory::refresh`] reloads it when the
/// file's modification time changes; lookups never touch the filesystem.
#[derive(Debug)]
pub struct PlayerDirectory {
    path: PathBuf,
    cache: RwLock<Cache>,
}

impl PlayerDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: RwLock::new(Cache::default()),
        }
    }

    /// A directory with a fixed set of names and no backing file.
    pub fn from_names(names: HashMap<i64, String>) -> Self {
        Self {
            path: PathBuf::new(),
            cache: RwLock::new(Cache {
                modified: None,
                names,
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self, element: i64) -> Option<String> {
        let cache = self.cache.read().ok()?;
        cache.names.get(&element).cloned()
    }

    /// Display name, or "Unknown player".
    pub fn label(&self, element: i64) -> String {
        self.name(element).unwrap_or_else(|| "Unknown player".to_string())
    }

    pub fn len(&self) -> usize {
        self.cache.read().map(|c| c.names.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Re-read the bootstrap file if it changed since the last attempt.
    /// A file that fails to parse keeps the previous names until it changes again.
    pub fn refresh(&self) {
        if self.path.as_os_str().is_empty() {
            return;
        }
        let Ok(modified) = std::fs::metadata(&self.path).and_then(|m| m.modified()) else {
            return;
        };
        let stale = self
            .cache
            .read()
            .map(|c| c.modified != Some(modified))
            .unwrap_or(true);
        if !stale {
            return;
        }

        match load_names(&self.path) {
            Ok(names) => {
                tracing::debug!(path = %self.path.display(), players = names.len(), "Loaded player names");
                if let Ok(mut cache) = self.cache.write() {
                    cache.names = names;
                    cache.modified = Some(modified);
                }
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to load player names");
                if let Ok(mut cache) = self.cache.write() {
                    cache.modified = Some(modified);
                }
            }
        }
    }
}

fn load_names(path: &Path) -> Result<HashMap<i64, String>, String> {
    let raw = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let data: Value = serde_json::from_str(&raw).map_err(|e| e.to_string())?;
    Ok(parse_elements(&data))
}

fn parse_elements(data: &Value) -> HashMap<i64, String> {
    get_array(data, "elements")
        .iter()
        .filter_map(|e| {
            let id = get_i64(e, "id").filter(|id| *id > 0)?;
            let name = match get_str(e, "web_name") {
                Some(web) => web.to_string(),
                None => {
                    let full = format!(
                        "{} {}",
                        get_str(e, "first_name").unwrap_or_default(),
                        get_str(e, "second_name").unwrap_or_default()
                    );
                    full.trim().to_string()
                }
            };
            Some((id, name))
        })
        .collect()
}
