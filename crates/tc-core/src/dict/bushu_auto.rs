//! Learned Bushu compositions that fire without an explicit trigger.

use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use tracing::{debug, warn};

use super::{read_optional, write_atomic};

/// Stored value that disables auto-composition for a pair.
pub const DISABLED_MARKER: char = 'N';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoEntry {
    Composed(char),
    Disabled,
}

/// Ordered source pair → learned composition or tombstone.
#[derive(Debug, Clone, Default)]
pub struct BushuAutoDict {
    entries: BTreeMap<(char, char), AutoEntry>,
    dirty: bool,
}

impl BushuAutoDict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, a: char, b: char) -> Option<AutoEntry> {
        self.entries.get(&(a, b)).copied()
    }

    /// The learned composition for `a b`, unless absent or disabled.
    pub fn composition(&self, a: char, b: char) -> Option<char> {
        match self.get(a, b)? {
            AutoEntry::Composed(c) => Some(c),
            AutoEntry::Disabled => None,
        }
    }

    /// Record the preferred result for an ordered pair. A tombstone is kept.
    pub fn record(&mut self, a: char, b: char, result: char) {
        match self.entries.get(&(a, b)) {
            Some(AutoEntry::Disabled) => {
                debug!(%a, %b, "bushu auto: pair disabled, not recording");
            }
            Some(AutoEntry::Composed(c)) if *c == result => {}
            _ => {
                self.entries.insert((a, b), AutoEntry::Composed(result));
                self.dirty = true;
            }
        }
    }

    pub fn disable(&mut self, a: char, b: char) {
        if self.entries.insert((a, b), AutoEntry::Disabled) != Some(AutoEntry::Disabled) {
            self.dirty = true;
        }
    }

    /// Remove every tombstone. Returns how many were removed.
    pub fn clear_disabled(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, e| *e != AutoEntry::Disabled);
        let removed = before - self.entries.len();
        if removed > 0 {
            self.dirty = true;
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Parse 3-character records: two source characters then the result,
    /// or `N` for a disabled pair.
    pub fn parse(text: &str) -> Self {
        let mut entries = BTreeMap::new();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }
            let chars: Vec<char> = line.chars().collect();
            let &[a, b, v] = chars.as_slice() else {
                warn!(line = lineno + 1, content = line, "bushu auto: malformed record skipped");
                continue;
            };
            let entry = if v == DISABLED_MARKER {
                AutoEntry::Disabled
            } else {
                AutoEntry::Composed(v)
            };
            entries.insert((a, b), entry);
        }
        Self {
            entries,
            dirty: false,
        }
    }

    /// Records sorted by key, one per line.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.entries.len() * 10);
        for (&(a, b), entry) in &self.entries {
            out.push(a);
            out.push(b);
            out.push(match entry {
                AutoEntry::Composed(c) => *c,
                AutoEntry::Disabled => DISABLED_MARKER,
            });
            out.push('\n');
        }
        out
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        write_atomic(path, self.to_text().as_bytes())
    }

    /// Save only when something changed since the last load or save.
    /// Returns whether a write happened.
    pub fn save_if_dirty(&mut self, path: &Path) -> io::Result<bool> {
        if !self.dirty {
            return Ok(false);
        }
        self.save(path)?;
        self.dirty = false;
        Ok(true)
    }

    /// Open from file, returning an empty overlay if the file doesn't exist.
    pub fn open(path: &Path) -> io::Result<Self> {
        Ok(read_optional(path)?
            .map(|text| Self::parse(&text))
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_and_lookup() {
        let mut auto = BushuAutoDict::new();
        assert!(!auto.is_dirty());
        auto.record('日', '月', '明');
        assert_eq!(auto.composition('日', '月'), Some('明'));
        // Order matters for the learned key.
        assert_eq!(auto.composition('月', '日'), None);
        assert!(auto.is_dirty());
    }

    #[test]
    fn disabled_pair_suppresses_composition() {
        let mut auto = BushuAutoDict::new();
        auto.record('日', '月', '明');
        auto.disable('日', '月');
        assert_eq!(auto.get('日', '月'), Some(AutoEntry::Disabled));
        assert_eq!(auto.composition('日', '月'), None);
        // Recording does not resurrect a tombstone.
        auto.record('日', '月', '明');
        assert_eq!(auto.get('日', '月'), Some(AutoEntry::Disabled));
    }

    #[test]
    fn clear_disabled_removes_only_tombstones() {
        let mut auto = BushuAutoDict::new();
        auto.record('木', '木', '林');
        auto.disable('日', '月');
        auto.disable('口', '口');
        assert_eq!(auto.clear_disabled(), 2);
        assert_eq!(auto.len(), 1);
        assert_eq!(auto.composition('木', '木'), Some('林'));
    }

    #[test]
    fn text_is_sorted_by_key() {
        let mut auto = BushuAutoDict::new();
        auto.record('木', '木', '林');
        auto.disable('口', '口');
        auto.record('日', '月', '明');
        let text = auto.to_text();
        let lines: Vec<&str> = text.lines().collect();
        let mut sorted = lines.clone();
        sorted.sort();
        assert_eq!(lines, sorted);
        assert!(lines.contains(&"口口N"));

        let reparsed = BushuAutoDict::parse(&text);
        assert_eq!(reparsed.get('口', '口'), Some(AutoEntry::Disabled));
        assert_eq!(reparsed.composition('日', '月'), Some('明'));
        assert!(!reparsed.is_dirty());
    }

    #[test]
    fn save_if_dirty_writes_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bushu_auto.txt");

        let mut auto = BushuAutoDict::new();
        assert!(!auto.save_if_dirty(&path).unwrap());
        assert!(!path.exists());

        auto.record('日', '月', '明');
        assert!(auto.save_if_dirty(&path).unwrap());
        assert!(!auto.save_if_dirty(&path).unwrap());

        let loaded = BushuAutoDict::open(&path).unwrap();
        assert_eq!(loaded.composition('日', '月'), Some('明'));
    }

    #[test]
    fn open_nonexistent_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let auto = BushuAutoDict::open(&dir.path().join("missing.txt")).unwrap();
        assert!(auto.is_empty());
    }
}
