//! Multi-stroke keymap.
//!
//! A `Keymap` maps single key symbols to commands; a `Submap` command nests
//! another keymap so that sequences such as `j f` resolve in two steps.
//! Keymaps are built once (from flat lists, 2D stroke tables or TOML) and
//! afterwards only change through `define` / `replace`, where the last write
//! wins.

pub mod config;
mod resolve;
mod table;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use tracing::debug;

pub use config::{default_keymaps, parse_keymap_toml, KeymapConfigError, Keymaps};
pub use resolve::{resolve, Outcome, Resolution, Resolved, SequenceResolver, Step};
pub use table::{Alphabet, TCODE_KEYS, UNASSIGNED};

/// One physical keystroke category. Printable keys carry their text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeySymbol {
    Text(String),
    Enter,
    Left,
    Right,
    Up,
    Down,
    Space,
    Delete,
    Escape,
    Tab,
    /// Control-modified key, e.g. `Control('g')`.
    Control(char),
    Unknown,
}

impl KeySymbol {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn from_char(c: char) -> Self {
        if c == ' ' {
            Self::Space
        } else {
            Self::Text(c.to_string())
        }
    }

    /// Split a string into one key per character.
    pub fn sequence(s: &str) -> Vec<KeySymbol> {
        s.chars().map(Self::from_char).collect()
    }

    /// Literal text this key would insert if typed without the IME.
    pub fn literal(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Space => Some(" "),
            _ => None,
        }
    }

    /// Parse a key name as used in keymap files: `space`, `delete`, `escape`,
    /// `enter`, `tab`, `left`, `right`, `up`, `down`, `C-<c>`, or a single character.
    pub fn from_name(name: &str) -> Option<Self> {
        let key = match name {
            "space" => Self::Space,
            "delete" => Self::Delete,
            "escape" => Self::Escape,
            "enter" => Self::Enter,
            "tab" => Self::Tab,
            "left" => Self::Left,
            "right" => Self::Right,
            "up" => Self::Up,
            "down" => Self::Down,
            _ => {
                if let Some(rest) = name.strip_prefix("C-") {
                    let mut chars = rest.chars();
                    return match (chars.next(), chars.next()) {
                        (Some(c), None) => Some(Self::Control(c.to_ascii_lowercase())),
                        _ => None,
                    };
                }
                let mut chars = name.chars();
                return match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Self::from_char(c)),
                    _ => None,
                };
            }
        };
        Some(key)
    }
}

/// Named operations a key sequence can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Compose the two characters before the cursor.
    Bushu,
    /// Convert the reading before the cursor.
    Mazegaki,
    /// Convert the reading before the cursor, trying inflected forms too.
    MazegakiInflection,
    /// Stop auto-composing the source pair of the latest Bushu conversion.
    BushuDisable,
    /// Re-enable every disabled auto-composition.
    BushuClearDisabled,
    /// Emit the buffered keys literally.
    Flush,
    /// Discard the buffered keys.
    Reset,
    /// Drop the last buffered key.
    DeleteLast,
}

impl Action {
    pub fn name(self) -> &'static str {
        match self {
            Self::Bushu => "bushu",
            Self::Mazegaki => "mazegaki",
            Self::MazegakiInflection => "mazegaki_inflection",
            Self::BushuDisable => "bushu_disable",
            Self::BushuClearDisabled => "bushu_clear_disabled",
            Self::Flush => "flush",
            Self::Reset => "reset",
            Self::DeleteLast => "delete_last",
        }
    }

    /// Quick actions only make sense while keys are buffered.
    pub fn is_quick(self) -> bool {
        matches!(self, Self::Flush | Self::Reset | Self::DeleteLast)
    }
}

impl FromStr for Action {
    type Err = KeymapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "bushu" => Self::Bushu,
            "mazegaki" => Self::Mazegaki,
            "mazegaki_inflection" => Self::MazegakiInflection,
            "bushu_disable" => Self::BushuDisable,
            "bushu_clear_disabled" => Self::BushuClearDisabled,
            "flush" => Self::Flush,
            "reset" => Self::Reset,
            "delete_last" => Self::DeleteLast,
            other => return Err(KeymapError::UnknownAction(other.to_string())),
        })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Let the host handle the key.
    Passthrough,
    /// Swallow the key without output.
    Processed,
    /// Buffer and wait for more keys.
    Pending,
    Text(String),
    Action(Action),
    Submap(Box<Keymap>),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum KeymapError {
    #[error("flat table has {actual} entries, alphabet has {expected}")]
    FlatLength { expected: usize, actual: usize },
    #[error("stroke table has {actual} rows, expected {expected}")]
    RowCount { expected: usize, actual: usize },
    #[error("stroke table row {row} has {actual} cells, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("empty key sequence")]
    EmptySequence,
    #[error("unknown action: {0}")]
    UnknownAction(String),
    #[error("unknown key name: {0}")]
    UnknownKey(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Keymap {
    entries: HashMap<KeySymbol, Command>,
}

impl Keymap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &KeySymbol) -> Option<&Command> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&KeySymbol, &Command)> {
        self.entries.iter()
    }

    /// Set the command for a single key at this level. Last write wins.
    pub fn replace(&mut self, key: KeySymbol, command: Command) {
        if let Some(old) = self.entries.get(&key) {
            debug!(?key, ?old, new = ?command, "keymap redefinition");
        }
        self.entries.insert(key, command);
    }

    /// Bind `command` to a full key sequence, creating submaps along the way.
    /// A terminal command sitting on a prefix is replaced by a submap.
    pub fn define(&mut self, seq: &[KeySymbol], command: Command) -> Result<(), KeymapError> {
        let Some((last, init)) = seq.split_last() else {
            return Err(KeymapError::EmptySequence);
        };
        let mut node = self;
        for key in init {
            node = node.child_mut(key);
        }
        node.replace(last.clone(), command);
        Ok(())
    }

    /// Number of sequences that end in a non-submap command, at any depth.
    pub fn count_terminals(&self) -> usize {
        self.entries
            .values()
            .map(|c| match c {
                Command::Submap(sub) => sub.count_terminals(),
                _ => 1,
            })
            .sum()
    }

    fn child_mut(&mut self, key: &KeySymbol) -> &mut Keymap {
        let entry = self
            .entries
            .entry(key.clone())
            .or_insert_with(|| Command::Submap(Box::default()));
        if !matches!(entry, Command::Submap(_)) {
            debug!(?key, old = ?entry, "keymap redefinition: terminal becomes prefix");
            *entry = Command::Submap(Box::default());
        }
        match entry {
            Command::Submap(sub) => &mut **sub,
            _ => unreachable!("entry was just made a submap"),
        }
    }
}
