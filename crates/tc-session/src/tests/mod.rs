mod proptest_fsm;
mod replay;

use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use tc_core::dict::{BushuAutoDict, BushuDict, MazegakiDict, MazegakiLru};
use tc_core::keymap::{parse_keymap_toml, KeySymbol};
use tc_core::settings::Settings;

use super::host::{TextRange, TextSurface};
use super::{InputSession, KeyResponse, Resources};

pub(super) const KEYMAP: &str = r#"
[sequences]
"jf" = "@bushu"
"fj" = "@mazegaki"
"58" = "@mazegaki_inflection"
"44" = "@bushu_disable"
"33" = "@bushu_clear_disabled"
"ka" = "日"
"kb" = "月"
"kc" = "木"
"ke" = "イ"
"ma" = "か"
"mb" = "ん"
"mc" = "じ"
"md" = "よ"
"me" = "む"
"mf" = "く"

[quick]
space = "@flush"
escape = "@reset"
"C-g" = "@reset"
delete = "@delete_last"
"#;

pub(super) const BUSHU: &str = "日月明\n木木林\nイ木休\n";

pub(super) const MAZEGAKI: &str = "\
かんじ /漢字/幹事/
じ /字/
よ— /読/詠/
か— /書/
";

/// A text widget held in memory. With `replacement_ranges` off it refuses
/// every range query, like hosts that only accept typed input.
pub(super) struct FakeHost {
    pub text: Vec<char>,
    pub cursor: usize,
    pub selection: Option<TextRange>,
    pub replacement_ranges: bool,
    /// Backspaces posted by the engine, waiting to be echoed back as keys.
    pub echoes: usize,
    id: String,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            text: Vec::new(),
            cursor: 0,
            selection: None,
            replacement_ranges: true,
            echoes: 0,
            id: "fake".to_string(),
        }
    }

    pub fn without_ranges() -> Self {
        Self {
            replacement_ranges: false,
            ..Self::new()
        }
    }

    pub fn with_text(s: &str) -> Self {
        let mut host = Self::new();
        host.text = s.chars().collect();
        host.cursor = host.text.len();
        host
    }

    pub fn contents(&self) -> String {
        self.text.iter().collect()
    }

    pub fn select(&mut self, location: usize, length: usize) {
        self.selection = Some(TextRange::new(location, length));
    }

    /// What the widget does with a key the engine passed on.
    pub fn apply_key(&mut self, key: &KeySymbol) {
        match key {
            KeySymbol::Delete => self.backspace(),
            KeySymbol::Left => self.cursor = self.cursor.saturating_sub(1),
            KeySymbol::Right => self.cursor = (self.cursor + 1).min(self.text.len()),
            _ => {
                if let Some(text) = key.literal() {
                    self.insert_text(text, None);
                }
            }
        }
    }

    fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.text.remove(self.cursor);
        }
    }
}

impl TextSurface for FakeHost {
    fn selected_range(&self) -> Option<TextRange> {
        if !self.replacement_ranges {
            return None;
        }
        Some(self.selection.unwrap_or(TextRange::cursor(self.cursor)))
    }

    fn text_in_range(&self, range: TextRange) -> Option<String> {
        if !self.replacement_ranges || range.end() > self.text.len() {
            return None;
        }
        Some(self.text[range.location..range.end()].iter().collect())
    }

    fn insert_text(&mut self, text: &str, replacement: Option<TextRange>) {
        let target = replacement
            .filter(|_| self.replacement_ranges)
            .or(self.selection.take())
            .unwrap_or(TextRange::cursor(self.cursor));
        let new: Vec<char> = text.chars().collect();
        let end = target.end().min(self.text.len());
        self.text.splice(target.location..end, new.iter().copied());
        self.cursor = target.location + new.len();
        self.selection = None;
    }

    fn delete_one_unit(&mut self) {
        self.backspace();
        self.echoes += 1;
    }

    fn identity(&self) -> &str {
        &self.id
    }
}

pub(super) fn resources_with(settings: Settings) -> Resources {
    let lru = MazegakiLru::new(settings.mazegaki.lru_capacity);
    Resources {
        settings: Arc::new(settings),
        keymaps: Arc::new(parse_keymap_toml(KEYMAP).unwrap()),
        bushu: Arc::new(BushuDict::parse(BUSHU)),
        mazegaki: Arc::new(MazegakiDict::parse(MAZEGAKI)),
        bushu_auto: Arc::new(RwLock::new(BushuAutoDict::new())),
        mazegaki_lru: Arc::new(RwLock::new(lru)),
    }
}

pub(super) fn make_session() -> InputSession {
    InputSession::new(resources_with(Settings::default()))
}

pub(super) fn cancel_period() -> Duration {
    Settings::default().pending.cancel_period()
}

/// Feed one key and let the host apply it when the engine passes it on.
pub(super) fn press(
    session: &mut InputSession,
    host: &mut FakeHost,
    key: KeySymbol,
    now: Instant,
) -> KeyResponse {
    let resp = session.handle_key(host, key.clone(), now);
    if !resp.consumed {
        host.apply_key(&key);
    }
    resp
}

// Helper: simulate typing a string one character at a time
pub(super) fn type_keys(
    session: &mut InputSession,
    host: &mut FakeHost,
    s: &str,
    now: Instant,
) -> Vec<KeyResponse> {
    KeySymbol::sequence(s)
        .into_iter()
        .map(|key| press(session, host, key, now))
        .collect()
}

/// Deliver the engine's own backspaces back to it, as the OS would.
/// The deletion already happened in `delete_one_unit`.
pub(super) fn echo_deletes(session: &mut InputSession, host: &mut FakeHost, now: Instant) {
    while host.echoes > 0 {
        host.echoes -= 1;
        let resp = session.handle_key(host, KeySymbol::Delete, now);
        assert!(!resp.consumed, "synthetic delete must be forwarded");
    }
}
