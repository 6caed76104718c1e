//! Reading ("yomi") extraction: the text just before the cursor that a
//! composer converts.

use tracing::debug;

use tc_core::unicode::YomiClass;

use crate::host::{TextRange, TextSurface};
use crate::mirror::TextMirror;

/// Where a reading came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YomiOrigin {
    /// The user's selection. Its length is fixed.
    Selection,
    /// Text before the cursor, read from the host.
    LiveClient,
    /// The engine's own mirror; the host range is unknown.
    Mirror,
}

/// Snapshot of a reading used for one composition attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YomiContext {
    pub text: String,
    /// Host range holding `text`; `None` for mirror readings.
    pub range: Option<TextRange>,
    pub origin: YomiOrigin,
}

impl YomiContext {
    /// Length in chars.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Whether the reading length was chosen by the user.
    pub fn is_fixed(&self) -> bool {
        self.origin == YomiOrigin::Selection
    }

    /// Host range of the last `length` chars, if the host is addressable.
    pub fn tail_range(&self, length: usize) -> Option<TextRange> {
        self.range.map(|r| r.tail(length))
    }
}

/// Bounds and character class for one reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadingRequest {
    pub min: usize,
    pub max: usize,
    pub class: YomiClass,
}

/// Resolve the reading before the cursor: selection first, then the live
/// client, then the mirror.
pub fn get_reading(
    host: &dyn TextSurface,
    mirror: &TextMirror,
    req: ReadingRequest,
) -> Option<YomiContext> {
    let cursor = host.selected_range();
    if let Some(sel) = cursor.filter(|r| !r.is_empty()) {
        return from_selection(host, sel, req);
    }
    if let Some(cur) = cursor.filter(|r| r.location >= req.min) {
        if let Some(ctx) = from_live_client(host, mirror, cur, req) {
            return Some(ctx);
        }
    }
    from_mirror(mirror, req)
}

fn from_selection(host: &dyn TextSurface, sel: TextRange, req: ReadingRequest) -> Option<YomiContext> {
    if sel.length < req.min || sel.length > req.max {
        debug!(length = sel.length, req.min, req.max, "yomi: selection length out of bounds");
        return None;
    }
    let text = host.text_in_range(sel)?;
    let run = req.class.trailing_run(&text);
    let len = run.chars().count();
    if len < req.min {
        return None;
    }
    let range = probe_range(host, sel, run).unwrap_or_else(|| sel.tail(len));
    Some(YomiContext {
        text: run.to_string(),
        range: Some(range),
        origin: YomiOrigin::Selection,
    })
}

fn from_live_client(
    host: &dyn TextSurface,
    mirror: &TextMirror,
    cursor: TextRange,
    req: ReadingRequest,
) -> Option<YomiContext> {
    let start = cursor.location.saturating_sub(req.max);
    let fetch = TextRange::new(start, cursor.location - start);
    let text = host.text_in_range(fetch)?;
    let run = last_chars(req.class.trailing_run(&text), req.max);
    let len = run.chars().count();

    let mirrored = req.class.trailing_run(mirror.tail(req.max)).chars().count();
    if mirrored > len {
        debug!(host = len, mirror = mirrored, "yomi: host returned less than the mirror holds");
        return None;
    }
    if len < req.min {
        return None;
    }
    let range = probe_range(host, fetch, run).unwrap_or_else(|| fetch.tail(len));
    Some(YomiContext {
        text: run.to_string(),
        range: Some(range),
        origin: YomiOrigin::LiveClient,
    })
}

fn from_mirror(mirror: &TextMirror, req: ReadingRequest) -> Option<YomiContext> {
    let run = req.class.trailing_run(mirror.tail(req.max));
    if run.chars().count() < req.min {
        return None;
    }
    Some(YomiContext {
        text: run.to_string(),
        range: None,
        origin: YomiOrigin::Mirror,
    })
}

/// Find `text` inside `within` by sliding a same-length window from the end
/// backward.
pub(crate) fn probe_range(host: &dyn TextSurface, within: TextRange, text: &str) -> Option<TextRange> {
    let n = text.chars().count();
    if n == 0 || n > within.length {
        return None;
    }
    (within.location..=within.end() - n)
        .rev()
        .map(|start| TextRange::new(start, n))
        .find(|&window| host.text_in_range(window).as_deref() == Some(text))
}

fn last_chars(s: &str, n: usize) -> &str {
    let skip = s.chars().count().saturating_sub(n);
    let start = s.char_indices().nth(skip).map_or(s.len(), |(i, _)| i);
    &s[start..]
}
