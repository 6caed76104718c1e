use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::DictError;

/// Marks the inflection boundary at the end of a yomi key, e.g. `かく—`.
pub const INFLECTION_MARKER: char = '—';

const CANDIDATE_DELIMITER: char = '/';

/// Split a slash-delimited candidate list, dropping empty alternatives.
pub fn split_candidates(list: &str) -> impl Iterator<Item = &str> {
    list.split(CANDIDATE_DELIMITER).filter(|s| !s.is_empty())
}

/// Static Mazegaki dictionary: yomi key → slash-delimited candidate list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MazegakiDict {
    entries: HashMap<String, String>,
}

impl MazegakiDict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `yomi /cand1/cand2/` lines. Malformed lines are logged and
    /// skipped; for a repeated key the first line wins.
    pub fn parse(text: &str) -> Self {
        let mut entries = HashMap::new();
        let mut skipped = 0usize;
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }
            match parse_line(line) {
                Some((key, list)) => {
                    entries
                        .entry(key.to_string())
                        .or_insert_with(|| list.to_string());
                }
                None => {
                    warn!(line = lineno + 1, content = line, "mazegaki: malformed line skipped");
                    skipped += 1;
                }
            }
        }
        debug!(entries = entries.len(), skipped, "mazegaki dictionary loaded");
        Self { entries }
    }

    /// Open a text dictionary.
    pub fn open(path: &Path) -> Result<Self, DictError> {
        Ok(Self::parse(&fs::read_to_string(path)?))
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Raw candidate list for a key.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// True when `key` has at least one non-empty candidate.
    pub fn has_candidates(&self, key: &str) -> bool {
        self.lookup(key)
            .is_some_and(|list| split_candidates(list).next().is_some())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys sorted, for diagnostics.
    pub fn keys_sorted(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

fn parse_line(line: &str) -> Option<(&str, &str)> {
    let (key, list) = line.split_once(' ')?;
    let list = list.trim();
    if key.is_empty() || !list.starts_with(CANDIDATE_DELIMITER) {
        return None;
    }
    split_candidates(list).next()?;
    Some((key, list))
}
