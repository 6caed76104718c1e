//! The host text widget, as seen by the engine.

/// A span of host text, in `char` units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextRange {
    pub location: usize,
    pub length: usize,
}

impl TextRange {
    pub fn new(location: usize, length: usize) -> Self {
        Self { location, length }
    }

    /// Zero-length range at `location`.
    pub fn cursor(location: usize) -> Self {
        Self::new(location, 0)
    }

    pub fn end(&self) -> usize {
        self.location + self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The last `length` units of this range.
    pub fn tail(&self, length: usize) -> Self {
        let length = length.min(self.length);
        Self::new(self.end() - length, length)
    }
}

/// Capabilities the engine needs from the text widget it edits.
///
/// Hosts that cannot address text by range return `None` from the query
/// methods; the engine then works from its own mirror and replays edits as
/// single-unit deletes followed by an insert.
pub trait TextSurface {
    /// The current selection; zero-length at the cursor.
    fn selected_range(&self) -> Option<TextRange>;

    fn text_in_range(&self, range: TextRange) -> Option<String>;

    /// Insert `text`, replacing `replacement` when given, else at the cursor.
    fn insert_text(&mut self, text: &str, replacement: Option<TextRange>);

    /// Post one backspace to the host.
    fn delete_one_unit(&mut self);

    /// Identifies the client widget; the mirror is dropped when it changes.
    fn identity(&self) -> &str;
}
