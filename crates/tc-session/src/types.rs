use tc_core::mazegaki::MazegakiHit;

use crate::yomi::YomiContext;

/// What the host should do with its candidate panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateAction {
    /// Leave the panel as-is.
    Keep,
    /// Show or update the candidate panel with these surfaces.
    Show {
        surfaces: Vec<String>,
        selected: u32,
    },
    /// Hide the candidate panel.
    Hide,
}

/// Response from handle_key, returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyResponse {
    /// False when the host should handle the key itself.
    pub consumed: bool,
    /// Text the engine inserted into the host while handling the key.
    pub commit: Option<String>,
    pub candidates: CandidateAction,
}

impl KeyResponse {
    pub(crate) fn not_consumed() -> Self {
        Self {
            consumed: false,
            commit: None,
            candidates: CandidateAction::Keep,
        }
    }

    pub(crate) fn consumed() -> Self {
        Self {
            consumed: true,
            ..Self::not_consumed()
        }
    }

    pub(crate) fn push_commit(&mut self, text: &str) {
        self.commit.get_or_insert_with(String::new).push_str(text);
    }
}

/// Counts of pending-commit transitions, for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingStats {
    pub opened: usize,
    pub accepted: usize,
    pub cancelled: usize,
}

/// Mazegaki candidate selection in progress.
pub(crate) struct Selection {
    pub hits: Vec<MazegakiHit>,
    pub hit: usize,
    pub candidate: usize,
    pub context: YomiContext,
}

impl Selection {
    pub fn current(&self) -> &MazegakiHit {
        &self.hits[self.hit]
    }

    pub fn show(&self) -> CandidateAction {
        CandidateAction::Show {
            surfaces: self.current().candidates().to_vec(),
            selected: self.candidate as u32,
        }
    }
}

pub(crate) fn cyclic_index(current: usize, delta: i32, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    let c = current as i32;
    let n = count as i32;
    ((c + delta + n) % n) as usize
}
