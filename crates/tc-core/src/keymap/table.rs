//! Building keymaps from fixed-size stroke tables.

use super::{Command, KeySymbol, Keymap, KeymapError};

/// The 40 stroke keys of the T-Code layout, in table column order.
pub const TCODE_KEYS: &str = "1234567890qwertyuiopasdfghjkl;zxcvbnm,./";

/// Cell value that leaves a table position undefined.
pub const UNASSIGNED: char = '■';

/// Ordered set of stroke keys a table is indexed by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    keys: Vec<KeySymbol>,
}

impl Alphabet {
    pub fn new(keys: Vec<KeySymbol>) -> Self {
        Self { keys }
    }

    pub fn from_chars(chars: &str) -> Self {
        Self::new(KeySymbol::sequence(chars))
    }

    pub fn tcode() -> Self {
        Self::from_chars(TCODE_KEYS)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[KeySymbol] {
        &self.keys
    }

    pub fn position(&self, key: &KeySymbol) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }
}

fn is_unassigned(cell: &str) -> bool {
    cell.is_empty() || cell.chars().eq([UNASSIGNED])
}

impl Keymap {
    /// One literal per alphabet key. Empty or `■` entries are left undefined.
    pub fn from_flat(alphabet: &Alphabet, literals: &[&str]) -> Result<Self, KeymapError> {
        if literals.len() != alphabet.len() {
            return Err(KeymapError::FlatLength {
                expected: alphabet.len(),
                actual: literals.len(),
            });
        }
        let mut km = Keymap::new();
        for (key, literal) in alphabet.keys().iter().zip(literals) {
            if !is_unassigned(literal) {
                km.replace(key.clone(), Command::Text((*literal).to_string()));
            }
        }
        Ok(km)
    }

    /// Build a two-stroke keymap from an N×N table.
    pub fn from_table(alphabet: &Alphabet, rows: &[&str]) -> Result<Self, KeymapError> {
        let mut km = Keymap::new();
        km.define_table(alphabet, rows)?;
        Ok(km)
    }

    /// Define two-stroke sequences from an N×N table: row = second stroke,
    /// column = first stroke. The whole table is validated before anything
    /// is defined.
    pub fn define_table(&mut self, alphabet: &Alphabet, rows: &[&str]) -> Result<(), KeymapError> {
        let n = alphabet.len();
        if rows.len() != n {
            return Err(KeymapError::RowCount {
                expected: n,
                actual: rows.len(),
            });
        }
        for (row, line) in rows.iter().enumerate() {
            let width = line.chars().count();
            if width != n {
                return Err(KeymapError::RowWidth {
                    row,
                    expected: n,
                    actual: width,
                });
            }
        }

        let keys = alphabet.keys();
        for (row, line) in rows.iter().enumerate() {
            for (col, cell) in line.chars().enumerate() {
                if cell == UNASSIGNED {
                    continue;
                }
                let seq = [keys[col].clone(), keys[row].clone()];
                self.define(&seq, Command::Text(cell.to_string()))?;
            }
        }
        Ok(())
    }
}
