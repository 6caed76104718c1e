use std::fs;

use tc_core::keymap::config::DEFAULT_KEYMAP_TOML;
use tc_core::keymap::parse_keymap_toml;
use tc_core::settings::{default_toml, init_custom, parse_settings_toml};

/// Which embedded default file `dump-defaults` prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DefaultFile {
    Settings,
    Keymap,
}

pub fn dump_defaults(which: DefaultFile) {
    match which {
        DefaultFile::Settings => print!("{}", default_toml()),
        DefaultFile::Keymap => print!("{DEFAULT_KEYMAP_TOML}"),
    }
}

pub fn check_keymap(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let maps = die!(parse_keymap_toml(&content), "Error: {}");
    println!(
        "OK: {} sequences, {} quick keys",
        maps.main.count_terminals(),
        maps.quick.len()
    );
}

pub fn check_settings(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let s = die!(parse_settings_toml(&content), "Error: {}");
    println!(
        "OK: mazegaki.max_reading_length={}, mazegaki.max_inflection_offset={}, pending.cancel_period_ms={}",
        s.mazegaki.max_reading_length, s.mazegaki.max_inflection_offset, s.pending.cancel_period_ms
    );
}

/// Install a settings file as the process-wide configuration.
pub fn load_settings(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    die!(init_custom(content), "Error in {file}: {}");
}
