use std::fmt;

use crate::analyzer::Morpheme;
use crate::kana_utils;

// @module: Token classification and reading resolution

// @const: Category markers that make a morpheme verbatim regardless of surface
const VERBATIM_CATEGORY_MARKERS: [&str; 2] = ["記号", "空白"];
const VERBATIM_CATEGORY_NAMES: [&str; 2] = ["symbol", "whitespace"];

// @const: Detail suffix for words without a usable reading
pub const UNRESOLVED_MARKER: &str = "(?)";

/// How a token's reading was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Symbol, whitespace or kana/Latin/digit run, read as written
    Verbatim,
    /// Dictionary word with a reading from the analyzer
    Dictionary,
    /// Dictionary word with no usable reading (out of vocabulary or empty)
    Unresolved,
}

/// A morpheme with its resolved reading and detail annotation
///
/// Tokens are immutable: both derived fields are computed once from the
/// morpheme at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    surface: String,
    kind: TokenKind,
    reading: String,
    detail: String,
}

impl Token {
    // @creates: Token from one analyzer morpheme
    pub fn from_morpheme(morpheme: &Morpheme) -> Self {
        let surface = morpheme.surface.clone();

        if is_verbatim(morpheme) {
            let reading = if kana_utils::starts_with_hiragana(&surface) {
                kana_utils::to_katakana(&surface)
            } else {
                surface.clone()
            };
            return Self {
                detail: surface.clone(),
                surface,
                kind: TokenKind::Verbatim,
                reading,
            };
        }

        if morpheme.out_of_vocabulary || morpheme.reading.is_empty() {
            return Self {
                detail: format!("{}{}", surface, UNRESOLVED_MARKER),
                reading: surface.clone(),
                surface,
                kind: TokenKind::Unresolved,
            };
        }

        let reading = morpheme.reading.clone();
        Self {
            detail: format!("{}({})", surface, reading),
            surface,
            kind: TokenKind::Dictionary,
            reading,
        }
    }

    /// Surface text of the underlying morpheme
    pub fn surface(&self) -> &str {
        &self.surface
    }

    /// Which resolution branch produced the reading
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Whether the token is read as written
    pub fn is_verbatim(&self) -> bool {
        self.kind == TokenKind::Verbatim
    }

    /// Contribution to the line reading
    pub fn reading(&self) -> &str {
        &self.reading
    }

    /// Contribution to the line detail
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl From<&Morpheme> for Token {
    fn from(morpheme: &Morpheme) -> Self {
        Self::from_morpheme(morpheme)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.detail)
    }
}

/// Check whether a category marks punctuation, symbols or whitespace
pub fn is_verbatim_category(category: &str) -> bool {
    VERBATIM_CATEGORY_MARKERS
        .iter()
        .any(|marker| category.contains(marker))
        || VERBATIM_CATEGORY_NAMES
            .iter()
            .any(|name| category.eq_ignore_ascii_case(name))
}

/// Check whether a morpheme is read verbatim
pub fn is_verbatim(morpheme: &Morpheme) -> bool {
    is_verbatim_category(&morpheme.category) || kana_utils::is_verbatim_surface(&morpheme.surface)
}
