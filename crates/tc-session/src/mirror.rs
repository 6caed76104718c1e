//! In-memory record of text recently committed through the engine.

use tracing::debug;

#[derive(Debug, Clone)]
pub struct TextMirror {
    text: String,
    chars: usize,
    capacity: usize,
    owner: Option<String>,
}

impl TextMirror {
    pub fn new(capacity: usize) -> Self {
        Self {
            text: String::new(),
            chars: 0,
            capacity: capacity.max(1),
            owner: None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in chars.
    pub fn len(&self) -> usize {
        self.chars
    }

    pub fn is_empty(&self) -> bool {
        self.chars == 0
    }

    pub fn push_str(&mut self, s: &str) {
        self.text.push_str(s);
        self.chars += s.chars().count();
        if self.chars > self.capacity {
            let excess = self.chars - self.capacity;
            let cut = self
                .text
                .char_indices()
                .nth(excess)
                .map_or(self.text.len(), |(i, _)| i);
            self.text.drain(..cut);
            self.chars = self.capacity;
        }
    }

    /// Drop up to `n` trailing chars.
    pub fn pop(&mut self, n: usize) {
        for _ in 0..n {
            if self.text.pop().is_none() {
                break;
            }
            self.chars -= 1;
        }
    }

    /// Record that `old` just before the cursor became `new`. When the mirror
    /// does not end with `old`, what precedes the cursor is unknown.
    pub fn replace_tail(&mut self, old: &str, new: &str) {
        if self.text.ends_with(old) {
            self.pop(old.chars().count());
        } else {
            self.clear();
        }
        self.push_str(new);
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.chars = 0;
    }

    /// The last `n` chars (fewer if the mirror is shorter).
    pub fn tail(&self, n: usize) -> &str {
        let skip = self.chars.saturating_sub(n);
        let start = self
            .text
            .char_indices()
            .nth(skip)
            .map_or(self.text.len(), |(i, _)| i);
        &self.text[start..]
    }

    /// Forget everything when the host widget changed.
    pub fn sync_owner(&mut self, identity: &str) {
        if self.owner.as_deref() != Some(identity) {
            if self.owner.is_some() {
                debug!(from = ?self.owner, to = identity, "mirror: client changed");
            }
            self.clear();
            self.owner = Some(identity.to_string());
        }
    }
}
