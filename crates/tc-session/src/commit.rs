use std::time::Instant;

use tracing::{debug, warn};

use super::host::{TextRange, TextSurface};
use super::pending::{LearnPayload, PendingCommit, Revert};
use super::InputSession;

/// Where replaced text ended up.
pub(super) enum Applied {
    /// Replaced in place; the new text occupies this range.
    Direct(TextRange),
    /// Scheduled as backspaces plus insert.
    Replayed,
}

impl Applied {
    pub fn range(&self) -> Option<TextRange> {
        match self {
            Self::Direct(r) => Some(*r),
            Self::Replayed => None,
        }
    }
}

impl InputSession {
    /// Insert literal text at the cursor.
    pub(super) fn insert(&mut self, host: &mut dyn TextSurface, text: &str) {
        host.insert_text(text, None);
        self.mirror.push_str(text);
    }

    /// Replace `old` (ending at the cursor, at `range` when known) with `new`.
    /// `None` when a replay was refused.
    pub(super) fn replace(
        &mut self,
        host: &mut dyn TextSurface,
        range: Option<TextRange>,
        old: &str,
        new: &str,
        now: Instant,
    ) -> Option<Applied> {
        match range {
            Some(r) => {
                host.insert_text(new, Some(r));
                self.mirror.replace_tail(old, new);
                Some(Applied::Direct(TextRange::new(r.location, new.chars().count())))
            }
            None => self
                .replay
                .schedule_replace(now, old.chars().count(), new)
                .then_some(Applied::Replayed),
        }
    }

    pub(super) fn open_pending(
        &mut self,
        original: &str,
        committed: &str,
        applied: Applied,
        payload: LearnPayload,
        now: Instant,
    ) {
        if let Some(previous) = self.pending.take() {
            warn!("can't happen: pending commit still open, accepting it");
            self.accept(previous.accept());
        }
        debug!(original, committed, "pending commit opened");
        self.stats.opened += 1;
        self.pending = Some(PendingCommit::new(
            original,
            committed,
            applied.range(),
            payload,
            now,
            self.res.settings.pending.cancel_period(),
        ));
    }

    /// Hand an accepted payload to the learned overlays.
    pub(super) fn accept(&mut self, payload: LearnPayload) {
        self.stats.accepted += 1;
        let learning = self.res.settings.learning;
        match payload {
            LearnPayload::Bushu { source: [a, b], result } => {
                debug!(%a, %b, %result, "bushu accepted");
                if !learning.bushu {
                    return;
                }
                if let Ok(mut auto) = self.res.bushu_auto.write() {
                    auto.record(a, b, result);
                }
            }
            LearnPayload::Mazegaki { key, candidate } => {
                debug!(key, candidate, "mazegaki accepted");
                if !learning.mazegaki {
                    return;
                }
                if let Ok(mut lru) = self.res.mazegaki_lru.write() {
                    lru.record(&key, &candidate);
                }
            }
        }
    }

    /// Put the original reading back. Learned state is not touched.
    pub(super) fn revert(&mut self, host: &mut dyn TextSurface, revert: Revert, now: Instant) {
        self.stats.cancelled += 1;
        debug!(committed = revert.committed, original = revert.original, "pending commit cancelled");
        let Revert {
            original,
            committed,
            range,
        } = revert;
        if self.replace(host, range, &committed, &original, now).is_none() {
            warn!(committed, "revert refused; committed text left in place");
        }
    }
}
