//! Composer triggers: Bushu, Mazegaki, and the Mazegaki selection state.

use std::time::Instant;

use tracing::{debug, warn};

use tc_core::keymap::{Action, KeySymbol};
use tc_core::mazegaki::{self, FindOptions};
use tc_core::unicode::YomiClass;

use super::host::{TextRange, TextSurface};
use super::pending::LearnPayload;
use super::types::{cyclic_index, CandidateAction, KeyResponse, Selection};
use super::yomi::{get_reading, ReadingRequest};
use super::InputSession;

/// What the selection state did with a key.
pub(super) enum SelectionStep {
    /// Fully handled.
    Handled,
    /// The current candidate was committed; the key settles that commit and,
    /// unless it cancelled it, is processed normally.
    Continue,
}

impl InputSession {
    pub(super) fn run_action(
        &mut self,
        host: &mut dyn TextSurface,
        action: Action,
        resp: &mut KeyResponse,
        now: Instant,
    ) {
        debug!(%action, "action");
        match action {
            Action::Bushu => self.bushu(host, resp, now),
            Action::Mazegaki => self.mazegaki(host, false, resp, now),
            Action::MazegakiInflection => self.mazegaki(host, true, resp, now),
            Action::BushuDisable => match self.last_bushu {
                Some([a, b]) => {
                    if let Ok(mut auto) = self.res.bushu_auto.write() {
                        auto.disable(a, b);
                        debug!(%a, %b, "bushu auto disabled");
                    }
                }
                None => debug!("bushu disable: no recent conversion"),
            },
            Action::BushuClearDisabled => {
                if let Ok(mut auto) = self.res.bushu_auto.write() {
                    let removed = auto.clear_disabled();
                    debug!(removed, "bushu auto tombstones cleared");
                }
            }
            Action::Flush | Action::Reset | Action::DeleteLast => {
                warn!(%action, "can't happen: quick action reached the main keymap");
            }
        }
    }

    fn bushu(&mut self, host: &mut dyn TextSurface, resp: &mut KeyResponse, now: Instant) {
        let req = ReadingRequest {
            min: 2,
            max: 2,
            class: self.res.settings.bushu.yomi_class,
        };
        let Some(ctx) = get_reading(host, &self.mirror, req) else {
            debug!("bushu: no reading");
            return;
        };
        let chars: Vec<char> = ctx.text.chars().collect();
        let &[a, b] = chars.as_slice() else {
            warn!(reading = ctx.text, "can't happen: bushu reading is not two chars");
            return;
        };
        let Some(result) = self.res.bushu.compose(a, b) else {
            debug!(%a, %b, "bushu: no composition");
            return;
        };
        self.commit_bushu(host, [a, b], result, ctx.range, resp, now);
    }

    fn commit_bushu(
        &mut self,
        host: &mut dyn TextSurface,
        source: [char; 2],
        result: char,
        range: Option<TextRange>,
        resp: &mut KeyResponse,
        now: Instant,
    ) {
        let original: String = source.iter().collect();
        let committed = result.to_string();
        let Some(applied) = self.replace(host, range, &original, &committed, now) else {
            return;
        };
        resp.push_commit(&committed);
        self.last_bushu = Some(source);
        self.open_pending(
            &original,
            &committed,
            applied,
            LearnPayload::Bushu { source, result },
            now,
        );
    }

    /// After a literal commit, compose the last two characters if the auto
    /// overlay has learned them.
    pub(super) fn try_auto_bushu(
        &mut self,
        host: &mut dyn TextSurface,
        resp: &mut KeyResponse,
        now: Instant,
    ) {
        let tail: Vec<char> = self.mirror.tail(2).chars().collect();
        let &[a, b] = tail.as_slice() else {
            return;
        };
        let learned = self
            .res
            .bushu_auto
            .read()
            .ok()
            .and_then(|auto| auto.composition(a, b));
        let Some(result) = learned else {
            return;
        };
        let req = ReadingRequest {
            min: 2,
            max: 2,
            class: YomiClass::NonSpace,
        };
        let ctx = get_reading(host, &self.mirror, req);
        let Some(ctx) = ctx.filter(|c| c.text.chars().eq([a, b])) else {
            debug!(%a, %b, "auto bushu: host text disagrees with mirror");
            return;
        };
        debug!(%a, %b, %result, "auto bushu");
        self.commit_bushu(host, [a, b], result, ctx.range, resp, now);
    }

    fn mazegaki(
        &mut self,
        host: &mut dyn TextSurface,
        inflection: bool,
        resp: &mut KeyResponse,
        now: Instant,
    ) {
        let settings = &self.res.settings.mazegaki;
        let req = ReadingRequest {
            min: 1,
            max: settings.max_reading_length,
            class: settings.yomi_class,
        };
        let Some(ctx) = get_reading(host, &self.mirror, req) else {
            debug!("mazegaki: no reading");
            return;
        };
        let opts = FindOptions::new(ctx.is_fixed(), inflection, settings);
        let hits = {
            let lru = self.res.mazegaki_lru.read().ok();
            mazegaki::find(&self.res.mazegaki, lru.as_deref(), &ctx.text, opts)
        };
        if hits.is_empty() {
            debug!(reading = ctx.text, "mazegaki: no hit");
            return;
        }

        let selection = Selection {
            hits,
            hit: 0,
            candidate: 0,
            context: ctx,
        };
        if selection.hits.len() == 1 && selection.current().candidates().len() == 1 {
            self.commit_selection(host, selection, resp, now);
            return;
        }
        resp.candidates = selection.show();
        self.selection = Some(selection);
    }

    /// Handle a key while Mazegaki candidates are displayed.
    pub(super) fn handle_selection(
        &mut self,
        host: &mut dyn TextSurface,
        mut sel: Selection,
        key: &KeySymbol,
        resp: &mut KeyResponse,
        now: Instant,
    ) -> SelectionStep {
        let candidate_count = sel.current().candidates().len();
        match key {
            KeySymbol::Space | KeySymbol::Down => {
                sel.candidate = cyclic_index(sel.candidate, 1, candidate_count);
            }
            KeySymbol::Up => {
                sel.candidate = cyclic_index(sel.candidate, -1, candidate_count);
            }
            KeySymbol::Left => {
                sel.hit = cyclic_index(sel.hit, 1, sel.hits.len());
                sel.candidate = 0;
            }
            KeySymbol::Right => {
                sel.hit = cyclic_index(sel.hit, -1, sel.hits.len());
                sel.candidate = 0;
            }
            KeySymbol::Enter => {
                self.commit_selection(host, sel, resp, now);
                return SelectionStep::Handled;
            }
            KeySymbol::Escape | KeySymbol::Control('g') => {
                debug!("mazegaki selection abandoned");
                resp.candidates = CandidateAction::Hide;
                return SelectionStep::Handled;
            }
            _ => {
                self.commit_selection(host, sel, resp, now);
                return SelectionStep::Continue;
            }
        }
        resp.candidates = sel.show();
        self.selection = Some(sel);
        SelectionStep::Handled
    }

    fn commit_selection(
        &mut self,
        host: &mut dyn TextSurface,
        sel: Selection,
        resp: &mut KeyResponse,
        now: Instant,
    ) {
        resp.candidates = CandidateAction::Hide;
        let hit = sel.current();
        let Some(candidate) = hit.candidates().get(sel.candidate).cloned() else {
            warn!(index = sel.candidate, "can't happen: candidate index out of range");
            return;
        };
        let (key, stem) = hit.learn_entry(&candidate);
        let payload = LearnPayload::Mazegaki {
            key: key.to_string(),
            candidate: stem.to_string(),
        };
        let yomi = hit.yomi.clone();
        let range = sel.context.tail_range(hit.length);
        let Some(applied) = self.replace(host, range, &yomi, &candidate, now) else {
            return;
        };
        resp.push_commit(&candidate);
        self.open_pending(&yomi, &candidate, applied, payload, now);
    }
}
