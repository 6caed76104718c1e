//! Stateful input session: key resolution, composer triggers, tentative
//! commits and edits against the host text surface.
//!
//! `InputSession` processes one keystroke at a time and applies its edits to
//! a [`TextSurface`]. Shared dictionaries live in [`Resources`], usually
//! handed out by an [`Engine`].

pub(crate) mod types;

mod commit;
mod compose;
pub mod engine;
pub mod host;
mod key_handlers;
pub mod mirror;
pub mod pending;
pub mod replay;
pub mod yomi;

#[cfg(test)]
mod tests;

use std::sync::{Arc, RwLock};
use std::time::Instant;

use tc_core::dict::{BushuAutoDict, BushuDict, MazegakiDict, MazegakiLru};
use tc_core::keymap::{KeySymbol, Keymaps, SequenceResolver};
use tc_core::settings::Settings;

pub use engine::{Engine, EngineError, LearnedPaths, SaveReport};
pub use host::{TextRange, TextSurface};
pub use pending::{LearnPayload, PendingCommit};
pub use types::{CandidateAction, KeyResponse, PendingStats};

use mirror::TextMirror;
use replay::ReplayQueue;
use types::Selection;

/// Shared, read-mostly state used by every session.
#[derive(Clone)]
pub struct Resources {
    pub settings: Arc<Settings>,
    pub keymaps: Arc<Keymaps>,
    pub bushu: Arc<BushuDict>,
    pub mazegaki: Arc<MazegakiDict>,
    pub bushu_auto: Arc<RwLock<BushuAutoDict>>,
    pub mazegaki_lru: Arc<RwLock<MazegakiLru>>,
}

/// Stateful session encapsulating all input processing for one client.
pub struct InputSession {
    res: Resources,
    resolver: SequenceResolver,
    pending: Option<PendingCommit>,
    selection: Option<Selection>,
    mirror: TextMirror,
    replay: ReplayQueue,
    /// Source pair of the latest Bushu conversion, for `@bushu_disable`.
    last_bushu: Option<[char; 2]>,
    stats: PendingStats,
}

impl InputSession {
    pub fn new(res: Resources) -> Self {
        let mirror = TextMirror::new(res.settings.mirror.capacity);
        let replay = ReplayQueue::new(
            res.settings.replay.synthetic_delete_delay(),
            res.settings.replay.synthetic_delete_count_limit,
        );
        Self {
            res,
            resolver: SequenceResolver::new(),
            pending: None,
            selection: None,
            mirror,
            replay,
            last_bushu: None,
            stats: PendingStats::default(),
        }
    }

    pub fn pending_commit(&self) -> Option<&PendingCommit> {
        self.pending.as_ref()
    }

    /// Keys buffered for an incomplete multi-stroke sequence.
    pub fn pending_keys(&self) -> &[KeySymbol] {
        self.resolver.pending()
    }

    pub fn is_selecting(&self) -> bool {
        self.selection.is_some()
    }

    /// `(hit, candidate, hit count, candidate count)` while selecting.
    pub fn selection_position(&self) -> Option<(usize, usize, usize, usize)> {
        self.selection.as_ref().map(|s| {
            (
                s.hit,
                s.candidate,
                s.hits.len(),
                s.current().candidates().len(),
            )
        })
    }

    pub fn mirror(&self) -> &TextMirror {
        &self.mirror
    }

    pub fn expected_deletes(&self) -> usize {
        self.replay.expected_deletes()
    }

    pub fn replay_idle(&self) -> bool {
        self.replay.is_idle()
    }

    pub fn stats(&self) -> PendingStats {
        self.stats
    }

    /// Run replay tasks that are due. Call from the host's timer.
    pub fn tick(&mut self, host: &mut dyn TextSurface, now: Instant) -> usize {
        self.replay.tick(host, &mut self.mirror, now)
    }

    /// Accept the outstanding pending commit, if any, regardless of its
    /// deadline.
    pub fn force_accept(&mut self) {
        if let Some(pending) = self.pending.take() {
            self.accept(pending.accept());
        }
    }

    /// Flush learning state before the session goes away.
    pub fn teardown(&mut self) {
        self.force_accept();
        self.replay.cancel();
        self.resolver.reset();
        self.selection = None;
    }
}
