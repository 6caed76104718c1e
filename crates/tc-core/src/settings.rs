//! Engine settings loaded from TOML.
//!
//! - `init_custom(toml_content)` sets a custom TOML before first `settings()` call
//! - `settings()` returns `&'static Settings` (lazy-init singleton)
//! - Default values are embedded via `include_str!("default_settings.toml")`
//!
//! The engine itself takes a `Settings` value; the singleton exists for tools
//! that only ever need one configuration.

use std::sync::OnceLock;
use std::time::Duration;

use serde::Deserialize;

use crate::unicode::YomiClass;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Set custom TOML before first `settings()` call.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// Get or initialize the global settings singleton.
pub fn settings() -> &'static Settings {
    static INSTANCE: OnceLock<Settings> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let toml_str = CUSTOM_TOML
            .get()
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_SETTINGS_TOML);
        parse_settings_toml(toml_str).expect("settings TOML must be valid")
    })
}

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("settings already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub mazegaki: MazegakiSettings,
    pub bushu: BushuSettings,
    pub pending: PendingSettings,
    pub replay: ReplaySettings,
    pub learning: LearningSettings,
    pub mirror: MirrorSettings,
}

impl Default for Settings {
    fn default() -> Self {
        parse_settings_toml(DEFAULT_SETTINGS_TOML).expect("embedded settings TOML must be valid")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MazegakiSettings {
    pub max_inflection_offset: usize,
    pub max_reading_length: usize,
    pub yomi_class: YomiClass,
    pub lru_capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BushuSettings {
    pub yomi_class: YomiClass,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PendingSettings {
    pub cancel_period_ms: u64,
}

impl PendingSettings {
    pub fn cancel_period(&self) -> Duration {
        Duration::from_millis(self.cancel_period_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReplaySettings {
    pub synthetic_delete_delay_ms: u64,
    pub synthetic_delete_count_limit: usize,
}

impl ReplaySettings {
    pub fn synthetic_delete_delay(&self) -> Duration {
        Duration::from_millis(self.synthetic_delete_delay_ms)
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LearningSettings {
    pub bushu: bool,
    pub mazegaki: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MirrorSettings {
    pub capacity: usize,
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! check_positive {
        ($section:ident . $field:ident) => {
            if s.$section.$field == 0 {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must be positive".to_string(),
                });
            }
        };
    }

    check_positive!(mazegaki.max_inflection_offset);
    check_positive!(mazegaki.max_reading_length);
    check_positive!(mazegaki.lru_capacity);
    check_positive!(pending.cancel_period_ms);
    check_positive!(replay.synthetic_delete_count_limit);
    check_positive!(mirror.capacity);

    if s.mazegaki.max_inflection_offset >= s.mazegaki.max_reading_length {
        return Err(SettingsError::InvalidValue {
            field: "mazegaki.max_inflection_offset".to_string(),
            reason: "must be shorter than mazegaki.max_reading_length".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_section(section: &str, body: &str) -> String {
        // Swap one section of the default file for `body`.
        let mut out = String::new();
        let mut skipping = false;
        for line in DEFAULT_SETTINGS_TOML.lines() {
            if line.starts_with('[') {
                skipping = line == format!("[{section}]");
                if skipping {
                    out.push_str(&format!("[{section}]\n{body}\n"));
                }
            }
            if !skipping {
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }

    #[test]
    fn parse_default_toml() {
        let s = parse_settings_toml(DEFAULT_SETTINGS_TOML).unwrap();
        assert_eq!(s.mazegaki.max_inflection_offset, 4);
        assert_eq!(s.mazegaki.max_reading_length, 10);
        assert_eq!(s.mazegaki.yomi_class, YomiClass::Japanese);
        assert_eq!(s.mazegaki.lru_capacity, 1000);
        assert_eq!(s.bushu.yomi_class, YomiClass::NonSpace);
        assert_eq!(s.pending.cancel_period(), Duration::from_millis(1500));
        assert_eq!(s.replay.synthetic_delete_delay(), Duration::from_millis(20));
        assert_eq!(s.replay.synthetic_delete_count_limit, 32);
        assert!(s.learning.bushu);
        assert!(s.learning.mazegaki);
        assert_eq!(s.mirror.capacity, 256);
    }

    #[test]
    fn default_impl_matches_embedded_toml() {
        let s = Settings::default();
        assert_eq!(s.mazegaki.max_reading_length, 10);
    }

    #[test]
    fn parse_custom_learning_section() {
        let toml = with_section("learning", "bushu = false\nmazegaki = true");
        let s = parse_settings_toml(&toml).unwrap();
        assert!(!s.learning.bushu);
        assert!(s.learning.mazegaki);
    }

    #[test]
    fn error_zero_cancel_period() {
        let toml = with_section("pending", "cancel_period_ms = 0");
        let err = parse_settings_toml(&toml).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidValue { .. }));
        assert!(err.to_string().contains("pending.cancel_period_ms"));
    }

    #[test]
    fn error_offset_not_shorter_than_reading() {
        let toml = with_section(
            "mazegaki",
            "max_inflection_offset = 5\nmax_reading_length = 5\nyomi_class = \"kana\"\nlru_capacity = 10",
        );
        let err = parse_settings_toml(&toml).unwrap_err();
        assert!(err.to_string().contains("max_inflection_offset"));
    }

    #[test]
    fn error_unknown_yomi_class() {
        let toml = with_section("bushu", "yomi_class = \"emoji\"");
        let err = parse_settings_toml(&toml).unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn error_invalid_toml() {
        let err = parse_settings_toml("not valid toml {{{").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn error_missing_section() {
        let toml = r#"
[pending]
cancel_period_ms = 1000
"#;
        let err = parse_settings_toml(toml).unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }
}
