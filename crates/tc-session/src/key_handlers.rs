use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, debug_span};

use tc_core::keymap::{KeySymbol, Step};

use super::compose::SelectionStep;
use super::host::TextSurface;
use super::pending::Transition;
use super::types::KeyResponse;
use super::InputSession;

impl InputSession {
    /// Process a key event. Edits are applied to `host` directly; the response
    /// says whether the host should still handle the key itself.
    pub fn handle_key(
        &mut self,
        host: &mut dyn TextSurface,
        key: KeySymbol,
        now: Instant,
    ) -> KeyResponse {
        let _span = debug_span!("handle_key", ?key).entered();

        self.mirror.sync_owner(host.identity());

        // Our own backspaces coming back: let the host apply them. Classify
        // before running anything, since deletes posted now echo later.
        if key == KeySymbol::Delete && self.replay.observe_delete() {
            debug!(remaining = self.replay.expected_deletes(), "synthetic delete");
            return KeyResponse::not_consumed();
        }
        // A real key finishes any replay still in flight first.
        self.replay.flush(host, &mut self.mirror);

        let mut resp = KeyResponse::consumed();

        if self.resolve_pending(host, &key, now) {
            return resp;
        }

        if let Some(sel) = self.selection.take() {
            match self.handle_selection(host, sel, &key, &mut resp, now) {
                SelectionStep::Handled => return resp,
                // The key may reach the host; the replacement lands first.
                // The commit it just made answers to this same key.
                SelectionStep::Continue => {
                    self.replay.flush(host, &mut self.mirror);
                    if self.resolve_pending(host, &key, now) {
                        resp.commit = None;
                        return resp;
                    }
                }
            }
        }

        self.feed(host, key, &mut resp, now);
        resp
    }

    /// Settle an open commit against `key`. True when the key cancelled it
    /// and is used up.
    fn resolve_pending(&mut self, host: &mut dyn TextSurface, key: &KeySymbol, now: Instant) -> bool {
        let Some(pending) = self.pending.take() else {
            return false;
        };
        match pending.on_key(key, now) {
            Transition::Accepted(payload) => {
                self.accept(payload);
                false
            }
            Transition::Cancelled(revert) => {
                self.resolver.reset();
                self.revert(host, revert, now);
                true
            }
        }
    }

    /// Run one key (and any keys it leaves over) through the resolver.
    fn feed(&mut self, host: &mut dyn TextSurface, key: KeySymbol, resp: &mut KeyResponse, now: Instant) {
        let keymaps = Arc::clone(&self.res.keymaps);
        let mut queue = VecDeque::from([key]);
        let mut first = true;

        while let Some(key) = queue.pop_front() {
            let outcome = self.resolver.feed(&keymaps.main, &keymaps.quick, key);
            for k in outcome.leftover.into_iter().rev() {
                queue.push_front(k);
            }
            match outcome.step {
                Step::Pending | Step::Processed => {}
                Step::Text(text) => {
                    self.insert(host, &text);
                    resp.push_commit(&text);
                    self.try_auto_bushu(host, resp, now);
                }
                Step::Flushed(text) => {
                    if !text.is_empty() {
                        self.insert(host, &text);
                        resp.push_commit(&text);
                    }
                }
                Step::Action(action) => self.run_action(host, action, resp, now),
                Step::Passthrough { mut keys } => {
                    if keys.len() != 1 {
                        debug!(?keys, "unmapped sequence discarded");
                    } else if first && queue.is_empty() {
                        let key = keys.remove(0);
                        self.observe_passthrough(&key);
                        resp.consumed = false;
                    } else if let Some(text) = keys[0].literal() {
                        // A re-fed key can't go back to the host; type it.
                        let text = text.to_string();
                        self.insert(host, &text);
                        resp.push_commit(&text);
                    }
                }
            }
            first = false;
        }
    }

    /// Keep the mirror in step with a key the host handles itself.
    fn observe_passthrough(&mut self, key: &KeySymbol) {
        match key {
            KeySymbol::Text(_) | KeySymbol::Space => {
                if let Some(text) = key.literal() {
                    self.mirror.push_str(text);
                }
            }
            KeySymbol::Delete => self.mirror.pop(1),
            _ => self.mirror.clear(),
        }
    }
}
