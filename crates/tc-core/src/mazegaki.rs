//! Mazegaki matching: segment the tail of a reading into dictionary keys,
//! optionally cutting off trailing okurigana as an inflection.

use std::cell::OnceCell;

use tracing::debug;

use crate::dict::{split_candidates, MazegakiDict, MazegakiLru, INFLECTION_MARKER};
use crate::settings::MazegakiSettings;
use crate::unicode::is_inflection_eligible;

/// Parameters for one [`find`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FindOptions {
    /// Only try the full reading (it was selected explicitly).
    pub fixed: bool,
    /// Also try inflected keys (`stem—`).
    pub inflection: bool,
    /// Longest okurigana cut off during inflection search.
    pub max_offset: usize,
}

impl FindOptions {
    pub fn new(fixed: bool, inflection: bool, settings: &MazegakiSettings) -> Self {
        Self {
            fixed,
            inflection,
            max_offset: settings.max_inflection_offset,
        }
    }
}

/// One segmentation of a reading's tail.
#[derive(Debug, Clone)]
pub struct MazegakiHit {
    /// The trailing part of the reading this hit replaces.
    pub yomi: String,
    /// Dictionary key: the yomi, or its stem followed by `—`.
    pub key: String,
    /// Length of `yomi` in chars.
    pub length: usize,
    /// Number of trailing okurigana chars cut off (0 = no inflection).
    pub offset: usize,
    pub found: bool,
    entry: Option<String>,
    preferred: Option<String>,
    candidates: OnceCell<Vec<String>>,
}

impl MazegakiHit {
    /// The okurigana re-appended to every candidate.
    pub fn suffix(&self) -> &str {
        let start = self
            .yomi
            .char_indices()
            .nth(self.length - self.offset)
            .map_or(self.yomi.len(), |(i, _)| i);
        &self.yomi[start..]
    }

    /// Conversion candidates, learned preference first. Computed once.
    pub fn candidates(&self) -> &[String] {
        self.candidates.get_or_init(|| {
            let suffix = self.suffix();
            let mut out: Vec<String> = Vec::new();
            let stems = self
                .preferred
                .as_deref()
                .into_iter()
                .chain(self.entry.as_deref().into_iter().flat_map(split_candidates));
            for stem in stems {
                let candidate = format!("{stem}{suffix}");
                if !out.contains(&candidate) {
                    out.push(candidate);
                }
            }
            out
        })
    }

    /// The `(key, stem)` pair the LRU overlay learns when `candidate` is
    /// committed.
    pub fn learn_entry<'a>(&'a self, candidate: &'a str) -> (&'a str, &'a str) {
        let stem = candidate.strip_suffix(self.suffix()).unwrap_or(candidate);
        (&self.key, stem)
    }
}

/// All dictionary hits for the tail of `reading`, ordered by inflection
/// offset ascending, then length descending.
pub fn find(
    dict: &MazegakiDict,
    lru: Option<&MazegakiLru>,
    reading: &str,
    opts: FindOptions,
) -> Vec<MazegakiHit> {
    let chars: Vec<char> = reading.chars().collect();
    let n = chars.len();
    if n == 0 {
        return Vec::new();
    }
    let shortest = if opts.fixed { n } else { 1 };

    let mut hits = Vec::new();
    for len in (shortest..=n).rev() {
        let tail = &chars[n - len..];
        let yomi: String = tail.iter().collect();

        if let Some(hit) = lookup(dict, lru, &yomi, yomi.clone(), len, 0) {
            hits.push(hit);
        }
        if !opts.inflection {
            continue;
        }
        for offset in 1..len.min(opts.max_offset + 1) {
            let (stem, okuri) = tail.split_at(len - offset);
            if !okuri.iter().all(|&c| is_inflection_eligible(c)) {
                continue;
            }
            let mut key: String = stem.iter().collect();
            key.push(INFLECTION_MARKER);
            if let Some(hit) = lookup(dict, lru, &yomi, key, len, offset) {
                hits.push(hit);
            }
        }
    }

    hits.sort_by(|a, b| a.offset.cmp(&b.offset).then(b.length.cmp(&a.length)));
    debug!(reading, hits = hits.len(), "mazegaki find");
    hits
}

fn lookup(
    dict: &MazegakiDict,
    lru: Option<&MazegakiLru>,
    yomi: &str,
    key: String,
    length: usize,
    offset: usize,
) -> Option<MazegakiHit> {
    let preferred = lru.and_then(|l| l.get(&key)).map(str::to_string);
    let entry = dict
        .lookup(&key)
        .filter(|list| split_candidates(list).next().is_some())
        .map(str::to_string);
    if preferred.is_none() && entry.is_none() {
        return None;
    }
    Some(MazegakiHit {
        yomi: yomi.to_string(),
        key,
        length,
        offset,
        found: true,
        entry,
        preferred,
        candidates: OnceCell::new(),
    })
}
