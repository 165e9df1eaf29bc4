/*!
 * Analyzer backed by an external command-line tokenizer.
 *
 * Supported backends:
 * - Sudachi (`sudachipy -m A -a`): split mode A, all fields, `(OOV)` marker
 * - MeCab (`mecab`): IPADIC-style feature CSV, unknown words lack a reading
 *
 * A whole batch is written to the child's stdin, one text per line. Both
 * tools answer each input line with its morphemes followed by `EOS`.
 */

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::process::{Command, Stdio};
use std::str::FromStr;

use crate::analyzer::{Morpheme, MorphemeSource};
use crate::errors::{AnalysisError, ConfigError};

// @const: End-of-sentence line emitted by both backends
const EOS: &str = "EOS";

// @const: Sudachi's trailing field for out-of-vocabulary words
const SUDACHI_OOV_MARKER: &str = "(OOV)";

// @const: Sudachi dictionary id of out-of-vocabulary words
const SUDACHI_OOV_DICTIONARY_ID: &str = "-1";

// @const: MeCab feature index of the reading
const MECAB_READING_INDEX: usize = 7;

// @const: Text sent to `check`
const PROBE_TEXT: &str = "テスト";

/// Output dialect of the external tokenizer
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerBackend {
    // @backend: SudachiPy command line
    #[default]
    Sudachi,
    // @backend: MeCab with an IPADIC-compatible dictionary
    Mecab,
}

impl AnalyzerBackend {
    // @returns: Executable used when the config leaves it empty
    pub fn default_command(&self) -> &'static str {
        match self {
            Self::Sudachi => "sudachipy",
            Self::Mecab => "mecab",
        }
    }

    // @returns: Arguments selecting the finest segmentation and full output
    pub fn default_args(&self) -> Vec<String> {
        match self {
            Self::Sudachi => vec!["-m".to_string(), "A".to_string(), "-a".to_string()],
            Self::Mecab => Vec::new(),
        }
    }

    /// Parse tokenizer output into one morpheme sequence per `EOS` block
    pub fn parse_output(&self, output: &str) -> Result<Vec<Vec<Morpheme>>, AnalysisError> {
        let mut sentences = Vec::new();
        let mut current = Vec::new();
        let mut last_line = 0;

        for (index, line) in output.lines().enumerate() {
            last_line = index + 1;
            if line == EOS {
                sentences.push(std::mem::take(&mut current));
                continue;
            }
            if line.is_empty() {
                continue;
            }
            let morpheme = match self {
                Self::Sudachi => parse_sudachi_line(line),
                Self::Mecab => parse_mecab_line(line),
            };
            match morpheme {
                Some(morpheme) => current.push(morpheme),
                None => {
                    return Err(AnalysisError::Malformed {
                        line: index + 1,
                        content: line.to_string(),
                    });
                }
            }
        }

        if !current.is_empty() {
            return Err(AnalysisError::Malformed {
                line: last_line,
                content: "output ended without EOS".to_string(),
            });
        }

        Ok(sentences)
    }
}

impl fmt::Display for AnalyzerBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sudachi => write!(f, "sudachi"),
            Self::Mecab => write!(f, "mecab"),
        }
    }
}

impl FromStr for AnalyzerBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sudachi" | "sudachipy" => Ok(Self::Sudachi),
            "mecab" => Ok(Self::Mecab),
            _ => Err(ConfigError::UnknownBackend(s.to_string())),
        }
    }
}

// surface \t POS,... \t normalized \t dictionary form \t reading \t dict id \t [synonyms] [\t (OOV)]
fn parse_sudachi_line(line: &str) -> Option<Morpheme> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 2 {
        return None;
    }

    let category = fields[1].split(',').next().unwrap_or_default();
    let reading = fields.get(4).copied().unwrap_or_default();
    let out_of_vocabulary = fields.iter().skip(2).any(|field| *field == SUDACHI_OOV_MARKER)
        || fields.get(5).is_some_and(|id| *id == SUDACHI_OOV_DICTIONARY_ID);

    Some(Morpheme {
        surface: fields[0].to_string(),
        category: category.to_string(),
        reading: reading.to_string(),
        out_of_vocabulary,
    })
}

// surface \t pos1,pos2,pos3,pos4,ctype,cform,base,reading,pronunciation
fn parse_mecab_line(line: &str) -> Option<Morpheme> {
    let (surface, features) = line.split_once('\t')?;
    let features: Vec<&str> = features.split(',').collect();

    let reading = features
        .get(MECAB_READING_INDEX)
        .copied()
        .filter(|reading| *reading != "*")
        .unwrap_or_default();

    Some(Morpheme {
        surface: surface.to_string(),
        category: features[0].to_string(),
        reading: reading.to_string(),
        out_of_vocabulary: features.len() <= MECAB_READING_INDEX,
    })
}

// Line breaks would split one text into two sentences; tabs would break field parsing
fn sanitize_input(text: &str) -> String {
    text.chars()
        .map(|c| if matches!(c, '\n' | '\r' | '\t') { ' ' } else { c })
        .collect()
}

/// Analyzer that shells out to a tokenizer executable
#[derive(Debug, Clone)]
pub struct CommandAnalyzer {
    backend: AnalyzerBackend,
    program: String,
    args: Vec<String>,
}

impl CommandAnalyzer {
    /// Create an analyzer running the backend's default command
    pub fn new(backend: AnalyzerBackend) -> Self {
        Self {
            backend,
            program: backend.default_command().to_string(),
            args: backend.default_args(),
        }
    }

    /// Create an analyzer running a custom command line
    ///
    /// An empty program or an empty argument list falls back to the
    /// backend defaults.
    pub fn with_command(backend: AnalyzerBackend, program: &str, args: &[String]) -> Self {
        let mut analyzer = Self::new(backend);
        if !program.trim().is_empty() {
            analyzer.program = program.to_string();
        }
        if !args.is_empty() {
            analyzer.args = args.to_vec();
        }
        analyzer
    }

    /// Output dialect this analyzer parses
    pub fn backend(&self) -> AnalyzerBackend {
        self.backend
    }

    /// Executable this analyzer runs
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments passed to the executable
    pub fn args(&self) -> &[String] {
        &self.args
    }

    fn run(&self, input: String) -> Result<String, AnalysisError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env("PYTHONIOENCODING", "utf-8")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                AnalysisError::Unavailable(format!("failed to start '{}': {}", self.program, e))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| AnalysisError::Unavailable("analyzer stdin was not captured".to_string()))?;

        // Feed stdin from another thread so a full stdout pipe cannot deadlock us
        let writer = std::thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child.wait_with_output().map_err(|e| {
            AnalysisError::Unavailable(format!("failed to wait for '{}': {}", self.program, e))
        })?;

        if !output.status.success() {
            return Err(AnalysisError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        match writer.join() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                return Err(AnalysisError::Unavailable(format!(
                    "failed to write to '{}': {}",
                    self.program, e
                )));
            }
            Err(_) => {
                return Err(AnalysisError::Unavailable(
                    "analyzer input writer panicked".to_string(),
                ));
            }
        }

        String::from_utf8(output.stdout).map_err(|e| AnalysisError::Encoding(e.to_string()))
    }
}

impl MorphemeSource for CommandAnalyzer {
    fn analyze(&self, text: &str) -> Result<Vec<Morpheme>, AnalysisError> {
        let mut sentences = self.analyze_batch(&[text])?;
        Ok(sentences.pop().unwrap_or_default())
    }

    fn analyze_batch(&self, texts: &[&str]) -> Result<Vec<Vec<Morpheme>>, AnalysisError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut input = String::new();
        for text in texts {
            input.push_str(&sanitize_input(text));
            input.push('\n');
        }

        debug!("Running {} on {} line(s)", self.program, texts.len());
        let output = self.run(input)?;
        let sentences = self.backend.parse_output(&output)?;

        if sentences.len() != texts.len() {
            return Err(AnalysisError::CountMismatch {
                expected: texts.len(),
                actual: sentences.len(),
            });
        }

        Ok(sentences)
    }

    fn check(&self) -> Result<(), AnalysisError> {
        self.analyze(PROBE_TEXT).map(|_| ())
    }

    fn name(&self) -> &str {
        &self.program
    }
}
