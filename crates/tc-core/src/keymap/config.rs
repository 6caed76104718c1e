use std::collections::BTreeMap;

use serde::Deserialize;

use super::{Action, Alphabet, Command, KeySymbol, Keymap, KeymapError};

pub const DEFAULT_KEYMAP_TOML: &str = include_str!("default_keymap.toml");

#[derive(Deserialize)]
struct KeymapConfig {
    #[serde(default)]
    sequences: BTreeMap<String, String>,
    #[serde(default)]
    quick: BTreeMap<String, String>,
    table: Option<TableConfig>,
}

#[derive(Deserialize)]
struct TableConfig {
    rows: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum KeymapConfigError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("in {context}: {source}")]
    Keymap {
        context: String,
        #[source]
        source: KeymapError,
    },
}

/// The main keymap plus the quick keymap checked before it on every key.
#[derive(Debug, Clone, Default)]
pub struct Keymaps {
    pub main: Keymap,
    pub quick: Keymap,
}

/// Parse keymap TOML. The optional `[table]` is applied first so that
/// `[sequences]` entries override table cells.
pub fn parse_keymap_toml(toml_str: &str) -> Result<Keymaps, KeymapConfigError> {
    let config: KeymapConfig =
        toml::from_str(toml_str).map_err(|e| KeymapConfigError::Parse(e.to_string()))?;

    let mut main = Keymap::new();
    if let Some(table) = &config.table {
        let rows: Vec<&str> = table.rows.iter().map(String::as_str).collect();
        main.define_table(&Alphabet::tcode(), &rows)
            .map_err(|source| KeymapConfigError::Keymap {
                context: "[table]".to_string(),
                source,
            })?;
    }

    for (seq, value) in &config.sequences {
        let wrap = |source| KeymapConfigError::Keymap {
            context: format!("sequences.{seq}"),
            source,
        };
        let command = parse_command(value).map_err(wrap)?;
        main.define(&KeySymbol::sequence(seq), command)
            .map_err(wrap)?;
    }

    let mut quick = Keymap::new();
    for (name, value) in &config.quick {
        let wrap = |source| KeymapConfigError::Keymap {
            context: format!("quick.{name}"),
            source,
        };
        let key = KeySymbol::from_name(name)
            .ok_or_else(|| wrap(KeymapError::UnknownKey(name.clone())))?;
        quick.replace(key, parse_command(value).map_err(wrap)?);
    }

    Ok(Keymaps { main, quick })
}

/// Keymaps built from the embedded default TOML.
pub fn default_keymaps() -> Keymaps {
    parse_keymap_toml(DEFAULT_KEYMAP_TOML).expect("embedded keymap TOML must be valid")
}

fn parse_command(value: &str) -> Result<Command, KeymapError> {
    match value.strip_prefix('@') {
        Some(name) => Ok(Command::Action(name.parse::<Action>()?)),
        None => Ok(Command::Text(value.to_string())),
    }
}
