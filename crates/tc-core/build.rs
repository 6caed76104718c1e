// Embedded defaults are parsed with `expect` at runtime; reject a broken file
// at build time instead.

const SETTINGS: &str = "src/default_settings.toml";
const KEYMAP: &str = "src/keymap/default_keymap.toml";

fn main() {
    println!("cargo:rerun-if-changed={SETTINGS}");
    println!("cargo:rerun-if-changed={KEYMAP}");

    require_sections(
        SETTINGS,
        include_str!("src/default_settings.toml"),
        &["mazegaki", "bushu", "pending", "replay", "learning", "mirror"],
    );
    require_sections(
        KEYMAP,
        include_str!("src/keymap/default_keymap.toml"),
        &["sequences", "quick"],
    );
}

fn require_sections(path: &str, content: &str, sections: &[&str]) {
    let table: toml::Table = match content.parse() {
        Ok(t) => t,
        Err(e) => panic!("{path} contains invalid TOML: {e}"),
    };
    for section in sections {
        if !table.get(*section).is_some_and(toml::Value::is_table) {
            panic!("{path} is missing the [{section}] table");
        }
    }
}
