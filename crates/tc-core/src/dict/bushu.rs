use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use super::DictError;

/// First character of an equivalence record.
const EQUIVALENCE_TAG: char = 'N';

/// Static Bushu tables: composition of character pairs, decomposition of a
/// character into its two parts, and visual-variant equivalence.
///
/// Composition is keyed by the unordered pair, stored smaller-first.
#[derive(Debug, Clone, Default)]
pub struct BushuDict {
    compose: HashMap<(char, char), char>,
    decompose: HashMap<char, (char, char)>,
    equivalence: HashMap<char, char>,
}

impl BushuDict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse newline-separated 3-character records.
    ///
    /// `abc` means `a + b → c`; `Nxy` means `x` is the canonical form of `y`.
    /// Other lines are logged and skipped. The first record for a pair or a
    /// decomposed character wins.
    pub fn parse(text: &str) -> Self {
        let mut dict = Self::new();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }
            let chars: Vec<char> = line.chars().collect();
            let &[a, b, c] = chars.as_slice() else {
                warn!(line = lineno + 1, content = line, "bushu: malformed record skipped");
                continue;
            };
            dict.insert_record(a, b, c);
        }
        debug!(
            pairs = dict.compose.len(),
            equivalences = dict.equivalence.len(),
            "bushu table loaded"
        );
        dict
    }

    pub fn open(path: &Path) -> Result<Self, DictError> {
        Ok(Self::parse(&fs::read_to_string(path)?))
    }

    fn insert_record(&mut self, a: char, b: char, c: char) {
        if a == EQUIVALENCE_TAG {
            self.equivalence.entry(c).or_insert(b);
            return;
        }
        self.compose.entry(unordered(a, b)).or_insert(c);
        self.decompose.entry(c).or_insert((a, b));
    }

    /// Direct table lookup of the unordered pair.
    pub fn lookup_pair(&self, a: char, b: char) -> Option<char> {
        self.compose.get(&unordered(a, b)).copied()
    }

    pub fn decompose(&self, c: char) -> Option<(char, char)> {
        self.decompose.get(&c).copied()
    }

    /// Canonical form of `c`, or `c` itself.
    pub fn canonical(&self, c: char) -> char {
        self.equivalence.get(&c).copied().unwrap_or(c)
    }

    /// All tabulated pairs, for property checks and diagnostics.
    pub fn pairs(&self) -> impl Iterator<Item = ((char, char), char)> + '_ {
        self.compose.iter().map(|(k, v)| (*k, *v))
    }

    pub fn len(&self) -> usize {
        self.compose.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compose.is_empty()
    }
}

fn unordered(a: char, b: char) -> (char, char) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
