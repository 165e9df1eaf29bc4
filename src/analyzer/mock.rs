/*!
 * Canned analyzer implementation for tests and demos.
 *
 * This module provides an analyzer that simulates different behaviors:
 * - `MockAnalyzer::working()` - Segments text against a small built-in lexicon
 * - `MockAnalyzer::with_lexicon(..)` - Segments text against a caller lexicon
 * - `MockAnalyzer::failing()` - Always fails with an unavailable analyzer
 *
 * Segmentation is greedy longest-match over the lexicon. Text the lexicon
 * does not cover is split into runs of kana, Latin letters, digits and
 * whitespace; any other character becomes a single-character
 * out-of-vocabulary morpheme.
 */

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::analyzer::{Morpheme, MorphemeSource};
use crate::errors::AnalysisError;
use crate::kana_utils;

/// Behavior mode for the mock analyzer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always segments the text
    Working,
    /// Fails every call as if the dictionary could not be loaded
    Failing,
    /// Fails every Nth call (1-based)
    Intermittent { fail_every: usize },
}

/// A lexicon entry: category and reading for a surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexiconEntry {
    /// Coarse part-of-speech category
    pub category: String,
    /// Katakana reading, possibly empty
    pub reading: String,
}

/// Mock analyzer with a canned lexicon
#[derive(Debug, Clone)]
pub struct MockAnalyzer {
    behavior: MockBehavior,
    lexicon: HashMap<String, LexiconEntry>,
    longest_entry: usize,
    // Shared between clones so tests can inspect calls made through an Arc
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockAnalyzer {
    /// Create a new mock analyzer with the specified behavior and an empty lexicon
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            lexicon: HashMap::new(),
            longest_entry: 0,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a working analyzer with the built-in sample lexicon
    pub fn working() -> Self {
        Self::with_lexicon(SAMPLE_LEXICON.iter().copied())
    }

    /// Create a working analyzer from `(surface, category, reading)` triples
    pub fn with_lexicon<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str, &'a str)>) -> Self {
        let mut analyzer = Self::new(MockBehavior::Working);
        for (surface, category, reading) in entries {
            analyzer = analyzer.with_entry(surface, category, reading);
        }
        analyzer
    }

    /// Create a failing analyzer
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create an analyzer failing every Nth call
    pub fn intermittent(fail_every: usize) -> Self {
        Self::with_lexicon(SAMPLE_LEXICON.iter().copied())
            .with_behavior(MockBehavior::Intermittent { fail_every })
    }

    /// Replace the behavior, keeping the lexicon
    pub fn with_behavior(mut self, behavior: MockBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Add or replace one lexicon entry
    pub fn with_entry(mut self, surface: &str, category: &str, reading: &str) -> Self {
        self.longest_entry = self.longest_entry.max(surface.chars().count());
        self.lexicon.insert(
            surface.to_string(),
            LexiconEntry {
                category: category.to_string(),
                reading: reading.to_string(),
            },
        );
        self
    }

    /// Every text passed to `analyze`, in call order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    /// Number of `analyze` calls made so far
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    fn segment(&self, text: &str) -> Vec<Morpheme> {
        let chars: Vec<char> = text.chars().collect();
        let mut morphemes = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            if let Some((len, morpheme)) = self.longest_match(&chars[start..]) {
                morphemes.push(morpheme);
                start += len;
                continue;
            }

            let class = CharClass::of(chars[start]);
            let mut end = start + 1;
            if class != CharClass::Other {
                while end < chars.len()
                    && CharClass::of(chars[end]) == class
                    && self.longest_match(&chars[end..]).is_none()
                {
                    end += 1;
                }
            }

            let surface: String = chars[start..end].iter().collect();
            morphemes.push(class.morpheme(surface));
            start = end;
        }

        morphemes
    }

    fn longest_match(&self, chars: &[char]) -> Option<(usize, Morpheme)> {
        let max = self.longest_entry.min(chars.len());
        (1..=max).rev().find_map(|len| {
            let candidate: String = chars[..len].iter().collect();
            self.lexicon.get(&candidate).map(|entry| {
                (len, Morpheme::new(candidate.clone(), entry.category.clone(), entry.reading.clone()))
            })
        })
    }
}

impl MorphemeSource for MockAnalyzer {
    fn analyze(&self, text: &str) -> Result<Vec<Morpheme>, AnalysisError> {
        let count = {
            let mut requests = self.requests.lock();
            requests.push(text.to_string());
            requests.len()
        };

        match self.behavior {
            MockBehavior::Working => Ok(self.segment(text)),
            MockBehavior::Failing => Err(AnalysisError::Unavailable(
                "Simulated dictionary load failure".to_string(),
            )),
            MockBehavior::Intermittent { fail_every } => {
                if fail_every > 0 && count % fail_every == 0 {
                    Err(AnalysisError::Unavailable(format!(
                        "Simulated intermittent failure (request #{})",
                        count
                    )))
                } else {
                    Ok(self.segment(text))
                }
            }
        }
    }

    fn check(&self) -> Result<(), AnalysisError> {
        match self.behavior {
            MockBehavior::Failing => Err(AnalysisError::Unavailable(
                "Simulated dictionary load failure".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

// Character classes used to group text the lexicon does not cover
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Hiragana,
    Katakana,
    Latin,
    Digit,
    Space,
    Symbol,
    Other,
}

impl CharClass {
    fn of(c: char) -> Self {
        if c.is_whitespace() {
            Self::Space
        } else if kana_utils::is_hiragana(c) {
            Self::Hiragana
        } else if kana_utils::is_katakana(c) {
            Self::Katakana
        } else if kana_utils::is_latin_letter(c) {
            Self::Latin
        } else if kana_utils::is_digit(c) {
            Self::Digit
        } else if kana_utils::is_non_word_or_whitespace(c) {
            Self::Symbol
        } else {
            Self::Other
        }
    }

    fn morpheme(self, surface: String) -> Morpheme {
        match self {
            Self::Space => Morpheme::new(surface, "空白", ""),
            Self::Symbol => Morpheme::new(surface, "補助記号", ""),
            Self::Digit => Morpheme::new(surface, "名詞", ""),
            Self::Hiragana | Self::Katakana | Self::Latin | Self::Other => {
                Morpheme::unknown(surface, "名詞", "")
            }
        }
    }
}

/// Sample lexicon used by `MockAnalyzer::working()`
pub const SAMPLE_LEXICON: &[(&str, &str, &str)] = &[
    ("東京", "名詞", "トウキョウ"),
    ("京都", "名詞", "キョウト"),
    ("大阪", "名詞", "オオサカ"),
    ("日本", "名詞", "ニッポン"),
    ("語", "名詞", "ゴ"),
    ("見出し", "名詞", "ミダシ"),
    ("本文", "名詞", "ホンブン"),
    ("行く", "動詞", "イク"),
    ("行き", "動詞", "イキ"),
    ("学ぶ", "動詞", "マナブ"),
    ("猫", "名詞", "ネコ"),
    ("犬", "名詞", "イヌ"),
    ("山田", "名詞", "ヤマダ"),
    ("太郎", "名詞", "タロウ"),
    ("花子", "名詞", "ハナコ"),
    ("に", "助詞", "ニ"),
    ("は", "助詞", "ハ"),
    ("を", "助詞", "ヲ"),
    ("の", "助詞", "ノ"),
    ("と", "助詞", "ト"),
    ("。", "補助記号", "。"),
    ("、", "補助記号", "、"),
    ("・", "補助記号", "・"),
];
