/*!
 * Morphological analyzer interface.
 *
 * The crate never segments text itself. Segmentation is delegated to an
 * external analyzer reached through the `MorphemeSource` trait:
 * - `command`: drives a Sudachi or MeCab executable over stdin/stdout
 * - `mock`: canned analyzer with a small lexicon, for tests and demos
 */

use std::fmt::Debug;
use std::sync::Arc;

use crate::errors::AnalysisError;

/// One unit of segmentation produced by an analyzer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Morpheme {
    /// Text of the morpheme as it appears in the input
    pub surface: String,

    /// Coarse part-of-speech category (e.g. `名詞`, `記号`, `空白`)
    pub category: String,

    /// Katakana reading supplied by the dictionary, possibly empty
    pub reading: String,

    /// Set when the analyzer could not find the morpheme in its lexicon
    pub out_of_vocabulary: bool,
}

impl Morpheme {
    /// Create an in-dictionary morpheme
    pub fn new(
        surface: impl Into<String>,
        category: impl Into<String>,
        reading: impl Into<String>,
    ) -> Self {
        Self {
            surface: surface.into(),
            category: category.into(),
            reading: reading.into(),
            out_of_vocabulary: false,
        }
    }

    /// Create an out-of-vocabulary morpheme
    pub fn unknown(
        surface: impl Into<String>,
        category: impl Into<String>,
        reading: impl Into<String>,
    ) -> Self {
        Self {
            out_of_vocabulary: true,
            ..Self::new(surface, category, reading)
        }
    }
}

/// Common trait for all morphological analyzers
///
/// Implementations are long-lived services: constructed once, queried for
/// many lines, shared across threads behind an `Arc`. They must always use
/// their finest segmentation granularity.
pub trait MorphemeSource: Send + Sync + Debug {
    /// Segment one text into an ordered sequence of morphemes
    ///
    /// # Arguments
    /// * `text` - Non-blank text to analyze
    fn analyze(&self, text: &str) -> Result<Vec<Morpheme>, AnalysisError>;

    /// Segment several texts, returning exactly one sequence per text
    ///
    /// The default implementation analyzes each text in turn. Adapters with
    /// a high per-call cost override it to analyze the whole batch at once.
    fn analyze_batch(&self, texts: &[&str]) -> Result<Vec<Vec<Morpheme>>, AnalysisError> {
        texts.iter().map(|text| self.analyze(text)).collect()
    }

    /// Verify that the analyzer and its dictionary are usable
    fn check(&self) -> Result<(), AnalysisError> {
        Ok(())
    }

    /// Short name for log messages
    fn name(&self) -> &str;
}

/// Shared handle to an analyzer
pub type SharedSource = Arc<dyn MorphemeSource>;

pub mod command;
pub mod mock;
