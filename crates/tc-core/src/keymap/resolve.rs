use tracing::{debug, warn};

use super::{Action, Command, KeySymbol, Keymap};

/// What a key sequence resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<'a> {
    /// A submap was reached with no further input.
    Pending,
    Passthrough,
    Processed,
    Text(&'a str),
    Action(Action),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution<'a> {
    pub resolved: Resolved<'a>,
    /// Keys used to reach `resolved`. Less than the sequence length when a
    /// terminal command (or a gap) was hit early.
    pub consumed: usize,
}

/// Walk `seq` through `root`, descending through submaps. Stops at the first
/// non-submap command, which is returned even when keys remain.
pub fn resolve<'a>(root: &'a Keymap, seq: &[KeySymbol]) -> Resolution<'a> {
    let mut node = root;
    for (i, key) in seq.iter().enumerate() {
        let resolved = match node.get(key) {
            Some(Command::Submap(sub)) => {
                if i + 1 == seq.len() {
                    return Resolution {
                        resolved: Resolved::Pending,
                        consumed: seq.len(),
                    };
                }
                node = sub;
                continue;
            }
            None | Some(Command::Passthrough) => Resolved::Passthrough,
            Some(Command::Processed) => Resolved::Processed,
            Some(Command::Pending) => Resolved::Pending,
            Some(Command::Text(text)) => Resolved::Text(text),
            Some(Command::Action(action)) => Resolved::Action(*action),
        };
        return Resolution {
            resolved,
            consumed: i + 1,
        };
    }
    Resolution {
        resolved: Resolved::Passthrough,
        consumed: 0,
    }
}

/// Result of feeding one key to the resolver.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Key buffered; the sequence is incomplete.
    Pending,
    /// Key consumed with no output.
    Processed,
    Text(String),
    Action(Action),
    /// A quick flush: the buffered keys' literal text.
    Flushed(String),
    /// Nothing is mapped. `keys` is the sequence that failed to resolve;
    /// a single key should reach the host untouched.
    Passthrough { keys: Vec<KeySymbol> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub step: Step,
    /// Keys after an early terminal command; the caller feeds them again.
    pub leftover: Vec<KeySymbol>,
}

impl Outcome {
    fn new(step: Step) -> Self {
        Self {
            step,
            leftover: Vec::new(),
        }
    }
}

/// Accumulates keys while a multi-stroke sequence is incomplete.
#[derive(Debug, Default)]
pub struct SequenceResolver {
    pending: Vec<KeySymbol>,
}

impl SequenceResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> &[KeySymbol] {
        &self.pending
    }

    pub fn is_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn reset(&mut self) {
        self.pending.clear();
    }

    /// Feed one key. The quick keymap is consulted first; a quick command that
    /// declines (nothing buffered) falls through to the main keymap.
    pub fn feed(&mut self, main: &Keymap, quick: &Keymap, key: KeySymbol) -> Outcome {
        if let Some(step) = self.try_quick(quick, &key) {
            return Outcome::new(step);
        }

        self.pending.push(key);
        let res = resolve(main, &self.pending);
        if res.resolved == Resolved::Pending && res.consumed == self.pending.len() {
            return Outcome::new(Step::Pending);
        }

        let mut keys = std::mem::take(&mut self.pending);
        let leftover = keys.split_off(res.consumed.min(keys.len()));
        let step = match res.resolved {
            Resolved::Pending | Resolved::Processed => Step::Processed,
            Resolved::Text(text) => Step::Text(text.to_string()),
            Resolved::Action(action) => Step::Action(action),
            Resolved::Passthrough => Step::Passthrough { keys },
        };
        Outcome { step, leftover }
    }

    fn try_quick(&mut self, quick: &Keymap, key: &KeySymbol) -> Option<Step> {
        match resolve(quick, std::slice::from_ref(key)).resolved {
            Resolved::Action(action) if action.is_quick() => self.apply_quick(action),
            Resolved::Action(action) => {
                self.pending.clear();
                Some(Step::Action(action))
            }
            Resolved::Text(text) => {
                self.pending.clear();
                Some(Step::Text(text.to_string()))
            }
            Resolved::Processed => Some(Step::Processed),
            Resolved::Pending => {
                warn!(?key, "can't happen: quick keymap holds a multi-key entry");
                None
            }
            Resolved::Passthrough => None,
        }
    }

    fn apply_quick(&mut self, action: Action) -> Option<Step> {
        if self.pending.is_empty() {
            return None;
        }
        debug!(%action, pending = self.pending.len(), "quick action");
        match action {
            Action::Flush => {
                let keys = std::mem::take(&mut self.pending);
                Some(Step::Flushed(
                    keys.iter().filter_map(KeySymbol::literal).collect(),
                ))
            }
            Action::Reset => {
                self.pending.clear();
                Some(Step::Processed)
            }
            Action::DeleteLast => {
                self.pending.pop();
                Some(Step::Processed)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(s: &str) -> Vec<KeySymbol> {
        KeySymbol::sequence(s)
    }

    fn main_map() -> Keymap {
        let mut km = Keymap::new();
        km.define(&keys("jf"), Command::Action(Action::Bushu)).unwrap();
        km.define(&keys("ka"), Command::Text("か".into())).unwrap();
        km.define(&keys("kia"), Command::Text("きゃ".into())).unwrap();
        km.define(&keys("x"), Command::Text("x!".into())).unwrap();
        km.define(&keys("p"), Command::Processed).unwrap();
        km.define(&[KeySymbol::Space], Command::Text(" ".into()))
            .unwrap();
        km
    }

    fn quick_map() -> Keymap {
        let mut km = Keymap::new();
        km.replace(KeySymbol::Space, Command::Action(Action::Flush));
        km.replace(KeySymbol::Escape, Command::Action(Action::Reset));
        km.replace(KeySymbol::Delete, Command::Action(Action::DeleteLast));
        km
    }

    fn feed_all(r: &mut SequenceResolver, s: &str) -> Vec<Step> {
        let (main, quick) = (main_map(), quick_map());
        keys(s)
            .into_iter()
            .map(|k| r.feed(&main, &quick, k).step)
            .collect()
    }

    #[test]
    fn resolve_reports_pending_at_submap() {
        let km = main_map();
        let r = resolve(&km, &keys("k"));
        assert_eq!(r.resolved, Resolved::Pending);
        assert_eq!(r.consumed, 1);
    }

    #[test]
    fn resolve_terminal_before_end() {
        let km = main_map();
        let r = resolve(&km, &keys("xyz"));
        assert_eq!(r.resolved, Resolved::Text("x!"));
        assert_eq!(r.consumed, 1);
    }

    #[test]
    fn resolve_divergence_is_passthrough() {
        let km = main_map();
        let r = resolve(&km, &keys("kz"));
        assert_eq!(r.resolved, Resolved::Passthrough);
        assert_eq!(r.consumed, 2);
        assert_eq!(resolve(&km, &keys("q")).resolved, Resolved::Passthrough);
        assert_eq!(resolve(&km, &[]).consumed, 0);
    }

    #[test]
    fn feed_two_stroke_text() {
        let mut r = SequenceResolver::new();
        let steps = feed_all(&mut r, "ka");
        assert_eq!(steps, vec![Step::Pending, Step::Text("か".into())]);
        assert!(!r.is_pending());
    }

    #[test]
    fn feed_action() {
        let mut r = SequenceResolver::new();
        let steps = feed_all(&mut r, "jf");
        assert_eq!(steps[1], Step::Action(Action::Bushu));
    }

    #[test]
    fn feed_processed_command() {
        let mut r = SequenceResolver::new();
        assert_eq!(feed_all(&mut r, "p"), vec![Step::Processed]);
    }

    #[test]
    fn feed_unmapped_single_key_passes_through() {
        let mut r = SequenceResolver::new();
        let steps = feed_all(&mut r, "q");
        assert_eq!(
            steps,
            vec![Step::Passthrough {
                keys: keys("q")
            }]
        );
    }

    #[test]
    fn feed_divergent_sequence_reports_all_keys() {
        let mut r = SequenceResolver::new();
        let steps = feed_all(&mut r, "kz");
        assert_eq!(
            steps[1],
            Step::Passthrough {
                keys: keys("kz")
            }
        );
        assert!(!r.is_pending());
    }

    #[test]
    fn quick_flush_emits_buffered_keys() {
        let mut r = SequenceResolver::new();
        let mut steps = feed_all(&mut r, "ki");
        steps.extend(feed_all(&mut r, " "));
        assert_eq!(steps[2], Step::Flushed("ki".into()));
        assert!(!r.is_pending());
    }

    #[test]
    fn quick_flush_without_pending_falls_through() {
        let mut r = SequenceResolver::new();
        assert_eq!(feed_all(&mut r, " "), vec![Step::Text(" ".into())]);
    }

    #[test]
    fn quick_delete_last_drops_one_key() {
        let (main, quick) = (main_map(), quick_map());
        let mut r = SequenceResolver::new();
        r.feed(&main, &quick, KeySymbol::text("k"));
        r.feed(&main, &quick, KeySymbol::text("i"));
        let out = r.feed(&main, &quick, KeySymbol::Delete);
        assert_eq!(out.step, Step::Processed);
        assert_eq!(r.pending(), keys("k").as_slice());
        let out = r.feed(&main, &quick, KeySymbol::text("a"));
        assert_eq!(out.step, Step::Text("か".into()));
    }

    #[test]
    fn quick_reset_discards_buffer() {
        let (main, quick) = (main_map(), quick_map());
        let mut r = SequenceResolver::new();
        r.feed(&main, &quick, KeySymbol::text("k"));
        let out = r.feed(&main, &quick, KeySymbol::Escape);
        assert_eq!(out.step, Step::Processed);
        assert!(!r.is_pending());
        // With nothing buffered, escape is not a quick command any more.
        let out = r.feed(&main, &quick, KeySymbol::Escape);
        assert_eq!(
            out.step,
            Step::Passthrough {
                keys: vec![KeySymbol::Escape]
            }
        );
    }

    #[test]
    fn early_terminal_returns_leftover() {
        // An explicit Pending entry turned into text after "k" was buffered.
        let mut main = Keymap::new();
        main.define(&keys("k"), Command::Pending).unwrap();
        let quick = Keymap::new();
        let mut r = SequenceResolver::new();
        assert_eq!(r.feed(&main, &quick, KeySymbol::text("k")).step, Step::Pending);
        main.define(&keys("k"), Command::Text("K".into())).unwrap();
        let out = r.feed(&main, &quick, KeySymbol::text("a"));
        assert_eq!(out.step, Step::Text("K".into()));
        assert_eq!(out.leftover, keys("a"));
    }
}
