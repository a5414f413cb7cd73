//! Cached-report lookup used to give the LLM context for comparison questions.
//!
//! [`ReportIndex`] scans two trees:
//!
//! - `reports/gw_<n>/<kind>.md`
//! - `summary/<kind>/<league>/gw/<n>.json` for the kinds in [`SUMMARY_KINDS`]
//!
//! Newest files win when the tree holds more than `max_docs` documents.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex};
use std::time::{Duration, Instant, SystemTime};

use regex::Regex;

use crate::text::{contains_phrase, extract, Param};

pub const SUMMARY_KINDS: &[&str] = &["league", "transactions", "standings", "lineup_efficiency", "matchup"];

const TRIGGERS: &[&str] = &[
    "why",
    "changed",
    "change",
    "since",
    "difference",
    "compare",
    "what changed",
    "last week",
    "previous",
    "earlier",
];

/// Number of documents included in a prompt.
pub const MEMORY_RESULTS: usize = 3;

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z0-9]{2,}").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryDoc {
    pub title: String,
    pub text: String,
}

/// Similarity search over cached reports.
pub trait MemoryIndex: Send + Sync {
    fn search(&self, query: &str, k: usize) -> Vec<MemoryDoc>;
}

/// Whether `text` asks about change over time.
pub fn should_use_memory(text: &str) -> bool {
    TRIGGERS.iter().any(|t| contains_phrase(text, t))
}

/// Prompt block: `[title]\ntext` per document, blank-line separated.
pub fn format_docs(docs: &[MemoryDoc]) -> Option<String> {
    if docs.is_empty() {
        return None;
    }
    let chunks: Vec<String> = docs.iter().map(|d| format!("[{}]\n{}", d.title, d.text)).collect();
    Some(chunks.join("\n\n"))
}

fn tokenize(text: &str) -> HashSet<String> {
    TOKEN_RE
        .find_iter(&text.to_lowercase())
        .map(|m| m.as_str().to_string())
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct DocMeta {
    kind: Option<String>,
    gameweek: Option<i64>,
    league_id: Option<i64>,
}

impl DocMeta {
    fn title(&self) -> String {
        let mut parts = Vec::new();
        if let Some(kind) = &self.kind {
            parts.push(kind.clone());
        }
        if let Some(gw) = self.gameweek {
            parts.push(format!("GW{gw}"));
        }
        if let Some(league) = self.league_id {
            parts.push(format!("league {league}"));
        }
        if parts.is_empty() {
            "cached_doc".to_string()
        } else {
            parts.join(" ")
        }
    }
}

#[derive(Debug, Clone)]
struct IndexedDoc {
    meta: DocMeta,
    text: String,
    tokens: HashSet<String>,
}

#[derive(Debug, Default)]
struct IndexState {
    docs: Vec<IndexedDoc>,
    refreshed_at: Option<Instant>,
}

/// File-backed [`MemoryIndex`], rebuilt at most once per refresh interval.
#[derive(Debug)]
pub struct ReportIndex {
    reports_dir: PathBuf,
    summary_dir: PathBuf,
    max_docs: usize,
    max_chars: usize,
    refresh: Duration,
    state: Mutex<IndexState>,
}

impl ReportIndex {
    pub fn new(reports_dir: impl Into<PathBuf>, summary_dir: impl Into<PathBuf>) -> Self {
        Self {
            reports_dir: reports_dir.into(),
            summary_dir: summary_dir.into(),
            max_docs: 120,
            max_chars: 2000,
            refresh: Duration::from_secs(60),
            state: Mutex::new(IndexState::default()),
        }
    }

    pub fn with_limits(mut self, max_docs: usize, max_chars: usize) -> Self {
        self.max_docs = max_docs;
        self.max_chars = max_chars;
        self
    }

    pub fn with_refresh(mut self, refresh: Duration) -> Self {
        self.refresh = refresh;
        self
    }

    /// Rebuild now, ignoring the refresh interval.
    pub fn reload(&self) {
        let docs = self.build();
        if let Ok(mut state) = self.state.lock() {
            state.docs = docs;
            state.refreshed_at = Some(Instant::now());
        }
    }

    fn refresh_if_stale(&self) {
        let stale = match self.state.lock() {
            Ok(state) => match state.refreshed_at {
                Some(at) => at.elapsed() >= self.refresh || state.docs.is_empty(),
                None => true,
            },
            Err(_) => true,
        };
        if stale {
            self.reload();
        }
    }

    fn collect_paths(&self) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        for gw_dir in read_dirs(&self.reports_dir) {
            let is_gw = gw_dir
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("gw_"));
            if is_gw {
                paths.extend(read_files(&gw_dir, "md"));
            }
        }
        for kind in SUMMARY_KINDS {
            for league_dir in read_dirs(&self.summary_dir.join(kind)) {
                paths.extend(read_files(&league_dir.join("gw"), "json"));
            }
        }
        paths
    }

    fn build(&self) -> Vec<IndexedDoc> {
        let mut paths: Vec<(SystemTime, PathBuf)> = self
            .collect_paths()
            .into_iter()
            .map(|p| {
                let modified = std::fs::metadata(&p)
                    .and_then(|m| m.modified())
                    .unwrap_or(SystemTime::UNIX_EPOCH);
                (modified, p)
            })
            .collect();
        paths.sort_by(|a, b| b.0.cmp(&a.0));
        paths.truncate(self.max_docs);

        let mut docs = Vec::with_capacity(paths.len());
        for (_, path) in paths {
            let text = match std::fs::read(&path) {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable memory file");
                    continue;
                }
            };
            let text = clip(&text, self.max_chars);
            if text.is_empty() {
                continue;
            }
            docs.push(IndexedDoc {
                meta: parse_meta(&path),
                tokens: tokenize(&text),
                text,
            });
        }
        tracing::debug!(documents = docs.len(), "Memory index rebuilt");
        docs
    }
}

impl MemoryIndex for ReportIndex {
    fn search(&self, query: &str, k: usize) -> Vec<MemoryDoc> {
        if query.trim().is_empty() || k == 0 {
            return Vec::new();
        }
        self.refresh_if_stale();
        let Ok(state) = self.state.lock() else {
            return Vec::new();
        };

        let query_tokens = tokenize(query);
        let query_gw = extract(Param::Gameweek, query);
        let lower = query.to_lowercase();

        let mut scored: Vec<(usize, &IndexedDoc)> = state
            .docs
            .iter()
            .filter_map(|doc| {
                let mut score = query_tokens.intersection(&doc.tokens).count();
                if query_gw.is_some() && doc.meta.gameweek == query_gw {
                    score += 5;
                }
                if doc.meta.kind.as_ref().is_some_and(|kind| lower.contains(kind.as_str())) {
                    score += 2;
                }
                if doc.meta.league_id.is_some_and(|id| lower.contains(&id.to_string())) {
                    score += 1;
                }
                (score > 0).then_some((score, doc))
            })
            .collect();
        // Stable: equal scores keep newest-first order.
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        scored
            .into_iter()
            .take(k)
            .map(|(_, doc)| MemoryDoc {
                title: doc.meta.title(),
                text: doc.text.clone(),
            })
            .collect()
    }
}

fn read_dirs(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect()
}

fn read_files(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().and_then(|e| e.to_str()) == Some(extension))
        .collect()
}

fn clip(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", trimmed[..idx].trim_end()),
        None => trimmed.to_string(),
    }
}

static REPORT_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"reports/gw_(\d+)/([^/]+)\.md$").unwrap());

static SUMMARY_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"summary/([^/]+)/(\d+)/gw/(\d+)\.json$").unwrap());

fn parse_meta(path: &Path) -> DocMeta {
    let norm = path.to_string_lossy().replace('\\', "/");
    let mut meta = DocMeta::default();
    if let Some(caps) = REPORT_PATH_RE.captures(&norm) {
        meta.gameweek = caps[1].parse().ok();
        meta.kind = Some(caps[2].to_string());
    }
    if let Some(caps) = SUMMARY_PATH_RE.captures(&norm) {
        meta.kind = Some(caps[1].to_string());
        meta.league_id = caps[2].parse().ok();
        meta.gameweek = caps[3].parse().ok();
    }
    meta
}
