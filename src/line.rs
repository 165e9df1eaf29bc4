/*!
 * Line normalization before analysis.
 *
 * Lines copied from indexes and reference lists carry asides in brackets,
 * cross-reference arrows and page numbers. These are deleted before the
 * text reaches the analyzer, in this order:
 * 1. parenthetical spans
 * 2. a trailing reference arrow (`　→ ...`)
 * 3. a trailing page-number tail (`　　12`)
 *
 * Every step only deletes contiguous spans; nothing is reordered or
 * duplicated.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Parenthetical spans: ASCII and full-width round and square brackets, non-greedy
static PARENTHETICAL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\(.+?\)|\[.+?\]|（.+?）|［.+?］").unwrap()
});

/// Ideographic space followed by a right arrow
pub const REFERENCE_MARKER: &str = "\u{3000}\u{2192}";

/// Two ideographic spaces separating a heading from its page number
pub const PAGE_NUMBER_SEPARATOR: &str = "\u{3000}\u{3000}";

/// Which normalization steps to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeOptions {
    /// Delete bracketed asides
    #[serde(default = "default_true")]
    pub strip_parentheticals: bool,

    /// Delete trailing reference arrows and page numbers
    #[serde(default = "default_true")]
    pub strip_trailing_noise: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            strip_parentheticals: true,
            strip_trailing_noise: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// One input line and its cleaned form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    raw: String,
    text: String,
}

impl Line {
    /// Create a line; the cleaned text starts out equal to the raw text
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        Self {
            text: raw.clone(),
            raw,
        }
    }

    /// The line exactly as it was given
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The line after the normalization steps run so far
    pub fn text(&self) -> &str {
        &self.text
    }

    /// True when nothing but whitespace is left to analyze
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Delete every bracketed span
    pub fn trim_parentheticals(&mut self) {
        if let std::borrow::Cow::Owned(cleaned) = PARENTHETICAL_REGEX.replace_all(&self.text, "") {
            self.text = cleaned;
        }
    }

    /// Truncate at the last reference arrow marker
    pub fn trim_reference(&mut self) {
        if let Some(index) = self.text.rfind(REFERENCE_MARKER) {
            self.text.truncate(index);
        }
    }

    /// Truncate at the last double ideographic space when a digit follows it
    pub fn trim_page_number(&mut self) {
        if let Some(index) = self.text.rfind(PAGE_NUMBER_SEPARATOR) {
            let tail = &self.text[index + PAGE_NUMBER_SEPARATOR.len()..];
            if tail.chars().any(|c| c.is_ascii_digit()) {
                self.text.truncate(index);
            }
        }
    }

    /// Delete trailing annotation noise: reference arrow first, then page number
    pub fn trim_noise(&mut self) {
        self.trim_reference();
        self.trim_page_number();
    }

    /// Run the enabled normalization steps in order
    pub fn normalize(&mut self, options: &NormalizeOptions) {
        if options.strip_parentheticals {
            self.trim_parentheticals();
        }
        if options.strip_trailing_noise {
            self.trim_noise();
        }
    }
}

/// Normalize a raw line with the given options and return the cleaned text
pub fn normalize_line(raw: &str, options: &NormalizeOptions) -> String {
    let mut line = Line::new(raw);
    line.normalize(options);
    line.text
}
