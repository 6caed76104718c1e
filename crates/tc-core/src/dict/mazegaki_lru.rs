//! Learned Mazegaki preferences, bounded and least-recently-used first out.

use std::io;
use std::num::NonZeroUsize;
use std::path::Path;

use lru::LruCache;
use tracing::warn;

use super::{read_optional, split_candidates, write_atomic};

pub struct MazegakiLru {
    cache: LruCache<String, String>,
    dirty: bool,
}

impl MazegakiLru {
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)),
            dirty: false,
        }
    }

    /// Preferred candidate for a yomi key. Does not touch recency.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.cache.peek(key).map(String::as_str)
    }

    /// Make `candidate` the preferred conversion of `key`.
    pub fn record(&mut self, key: &str, candidate: &str) {
        if self.cache.peek(key).is_some_and(|c| c == candidate) {
            // Already preferred; only bump recency.
            self.cache.promote(key);
        } else {
            self.cache.put(key.to_string(), candidate.to_string());
        }
        self.dirty = true;
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.cache.cap().get()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Entries, most recently used first.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cache.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parse `key /candidate/` lines, most recently used first.
    pub fn parse(text: &str, capacity: usize) -> Self {
        let mut records = Vec::new();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }
            let parsed = line
                .split_once(' ')
                .and_then(|(key, list)| Some((key, split_candidates(list.trim()).next()?)))
                .filter(|(key, _)| !key.is_empty());
            match parsed {
                Some(record) => records.push(record),
                None => warn!(line = lineno + 1, content = line, "mazegaki lru: malformed line skipped"),
            }
        }
        let mut lru = Self::new(capacity);
        for (key, candidate) in records.into_iter().rev() {
            lru.cache.put(key.to_string(), candidate.to_string());
        }
        lru
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (key, candidate) in self.iter() {
            out.push_str(key);
            out.push_str(" /");
            out.push_str(candidate);
            out.push_str("/\n");
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
    pub fn open(path: &Path, capacity: usize) -> io::Result<Self> {
        Ok(match read_optional(path)? {
            Some(text) => Self::parse(&text, capacity),
            None => Self::new(capacity),
        })
    }
}

impl std::fmt::Debug for MazegakiLru {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MazegakiLru")
            .field("len", &self.cache.len())
            .field("capacity", &self.capacity())
            .field("dirty", &self.dirty)
            .finish()
    }
}
