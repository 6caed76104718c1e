//! Tentative commits: a conversion can be cancelled until its deadline, after
//! which the next event accepts it and the learned overlays are updated.

use std::time::{Duration, Instant};

use tc_core::keymap::KeySymbol;

use crate::host::TextRange;

/// What accepting a pending commit teaches the learned overlays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LearnPayload {
    Bushu { source: [char; 2], result: char },
    Mazegaki { key: String, candidate: String },
}

/// A provisional conversion awaiting accept or cancel.
#[derive(Debug, Clone)]
pub struct PendingCommit {
    /// The reading that was replaced.
    pub original: String,
    /// The text that replaced it.
    pub committed: String,
    /// Host range of `committed`; `None` when the edit went through the mirror.
    pub range: Option<TextRange>,
    pub deadline: Instant,
    pub payload: LearnPayload,
}

/// How the next event resolves a pending commit.
#[derive(Debug)]
pub enum Transition {
    /// Learn from the payload; the event proceeds normally.
    Accepted(LearnPayload),
    /// Revert to the original reading; the event is consumed.
    Cancelled(Revert),
}

/// The compensating edit for a cancelled commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revert {
    pub original: String,
    pub committed: String,
    pub range: Option<TextRange>,
}

impl Revert {
    pub fn committed_len(&self) -> usize {
        self.committed.chars().count()
    }
}

impl PendingCommit {
    pub fn new(
        original: impl Into<String>,
        committed: impl Into<String>,
        range: Option<TextRange>,
        payload: LearnPayload,
        now: Instant,
        cancel_period: Duration,
    ) -> Self {
        Self {
            original: original.into(),
            committed: committed.into(),
            range,
            deadline: now + cancel_period,
            payload,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.deadline
    }

    /// Resolve against the next input event. Consumes the commit, so each one
    /// is acted on exactly once.
    pub fn on_key(self, key: &KeySymbol, now: Instant) -> Transition {
        if !self.is_expired(now) && is_cancel_key(key) {
            Transition::Cancelled(Revert {
                original: self.original,
                committed: self.committed,
                range: self.range,
            })
        } else {
            Transition::Accepted(self.payload)
        }
    }

    pub fn accept(self) -> LearnPayload {
        self.payload
    }
}

pub fn is_cancel_key(key: &KeySymbol) -> bool {
    matches!(key, KeySymbol::Delete | KeySymbol::Escape | KeySymbol::Control('g'))
}
