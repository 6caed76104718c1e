//! Bushu composition: combine two kanji (or radicals) into a third.
//!
//! The heuristic runs through a fixed sequence of strategies and returns the
//! first result that is neither of the inputs:
//!
//! 1. direct lookup of the pair,
//! 2. the same lookup after visual-variant normalization,
//! 3. subtraction (one character contains the other as a part),
//! 4. composition of parts,
//! 5. subtraction of a shared part.

use tracing::trace;

use crate::dict::BushuDict;

/// Which strategy produced a composition. Diagnostic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Direct,
    Equivalence,
    Subtraction,
    Parts,
    SharedPart,
}

impl Strategy {
    pub fn name(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Equivalence => "equivalence",
            Self::Subtraction => "subtraction",
            Self::Parts => "parts",
            Self::SharedPart => "shared_part",
        }
    }
}

impl BushuDict {
    /// Compose `a` and `b`. `None` when no strategy applies.
    pub fn compose(&self, a: char, b: char) -> Option<char> {
        self.compose_explained(a, b).map(|(c, _)| c)
    }

    /// Like [`compose`](Self::compose), also reporting the strategy used.
    pub fn compose_explained(&self, a: char, b: char) -> Option<(char, Strategy)> {
        if let Some(c) = self.lookup_pair(a, b) {
            return Some((c, Strategy::Direct));
        }

        let (na, nb) = (self.canonical(a), self.canonical(b));
        if (na, nb) != (a, b) {
            if let Some(c) = self.lookup_pair(na, nb) {
                return Some((c, Strategy::Equivalence));
            }
        }

        let parts_a = self.decompose(na);
        let parts_b = self.decompose(nb);
        let nontrivial = |c: char| c != na && c != nb;

        let result = subtract(na, nb, parts_a, parts_b, nontrivial)
            .map(|c| (c, Strategy::Subtraction))
            .or_else(|| {
                self.compose_parts(na, nb, parts_a, parts_b, nontrivial)
                    .map(|c| (c, Strategy::Parts))
            })
            .or_else(|| {
                shared_part(parts_a?, parts_b?, nontrivial).map(|c| (c, Strategy::SharedPart))
            });

        if let Some((c, strategy)) = result {
            trace!(%a, %b, %c, strategy = strategy.name(), "bushu composed");
        }
        result
    }

    fn compose_parts(
        &self,
        a: char,
        b: char,
        parts_a: Option<(char, char)>,
        parts_b: Option<(char, char)>,
        accept: impl Fn(char) -> bool,
    ) -> Option<char> {
        let mut tries: Vec<(char, char)> = Vec::with_capacity(8);
        if let Some((b1, b2)) = parts_b {
            tries.extend([(a, b1), (a, b2)]);
        }
        if let Some((a1, a2)) = parts_a {
            tries.extend([(a1, b), (a2, b)]);
        }
        if let (Some((a1, a2)), Some((b1, b2))) = (parts_a, parts_b) {
            tries.extend([(a1, b1), (a1, b2), (a2, b1), (a2, b2)]);
        }
        tries
            .into_iter()
            .filter_map(|(x, y)| self.lookup_pair(x, y))
            .find(|&c| accept(c))
    }
}

/// One character's breakdown contains the other: return the remaining part.
/// Each of the four orders is checked against `accept` on its own.
fn subtract(
    a: char,
    b: char,
    parts_a: Option<(char, char)>,
    parts_b: Option<(char, char)>,
    accept: impl Fn(char) -> bool,
) -> Option<char> {
    let mut tries: Vec<(char, char, char)> = Vec::with_capacity(4);
    if let Some((a1, a2)) = parts_a {
        tries.extend([(a1, b, a2), (a2, b, a1)]);
    }
    if let Some((b1, b2)) = parts_b {
        tries.extend([(b1, a, b2), (b2, a, b1)]);
    }
    tries
        .into_iter()
        .find(|&(part, other, rest)| part == other && accept(rest))
        .map(|(_, _, rest)| rest)
}

/// Both breakdowns share a part: return the first character's other part.
fn shared_part(
    (a1, a2): (char, char),
    (b1, b2): (char, char),
    accept: impl Fn(char) -> bool,
) -> Option<char> {
    [(a1, b1, a2), (a1, b2, a2), (a2, b1, a1), (a2, b2, a1)]
        .into_iter()
        .find(|&(x, y, rest)| x == y && accept(rest))
        .map(|(_, _, rest)| rest)
}
