//! Character-level Unicode classification for Japanese text.

use serde::Deserialize;

/// Check the full Hiragana block (U+3040..U+309F). This includes a few unassigned
/// codepoints (U+3040, U+3097-3098) but these never appear in typed text, so the
/// simpler block-level check is preferred over an exact range.
pub fn is_hiragana(c: char) -> bool {
    ('\u{3040}'..='\u{309F}').contains(&c)
}

/// Check the full Katakana block (U+30A0..U+30FF). Includes the prolonged
/// sound mark ー (U+30FC).
pub fn is_katakana(c: char) -> bool {
    ('\u{30A0}'..='\u{30FF}').contains(&c)
}

pub fn is_kanji(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
        || ('\u{3400}'..='\u{4DBF}').contains(&c)
        || ('\u{20000}'..='\u{2A6DF}').contains(&c)
        || c == '々'
}

/// Characters that may be cut off as okurigana during inflection search:
/// assigned hiragana ぁ..ゖ.
pub fn is_inflection_eligible(c: char) -> bool {
    ('\u{3041}'..='\u{3096}').contains(&c)
}

/// Which characters may form a reading extracted from before the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YomiClass {
    /// Hiragana, katakana and ー.
    Kana,
    /// Kana plus kanji (including 々).
    Japanese,
    /// Anything that is not whitespace or a control character.
    NonSpace,
}

impl YomiClass {
    pub fn contains(self, c: char) -> bool {
        match self {
            Self::Kana => is_hiragana(c) || is_katakana(c),
            Self::Japanese => is_hiragana(c) || is_katakana(c) || is_kanji(c),
            Self::NonSpace => !c.is_whitespace() && !c.is_control(),
        }
    }

    /// Byte offset where the trailing run of class members in `s` starts.
    pub fn trailing_run_start(self, s: &str) -> usize {
        s.char_indices()
            .rev()
            .take_while(|&(_, c)| self.contains(c))
            .last()
            .map_or(s.len(), |(i, _)| i)
    }

    /// The trailing run of class members in `s`.
    pub fn trailing_run(self, s: &str) -> &str {
        &s[self.trailing_run_start(s)..]
    }
}
