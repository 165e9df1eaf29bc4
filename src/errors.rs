/*!
 * Error types for the yomi application.
 *
 * This module contains custom error types for the different layers of the
 * application, using the thiserror crate for ergonomic error definitions.
 * The annotation core itself is total; the only failure surface it exposes
 * is the morphological analyzer, reported as `AnalysisError`.
 */

use thiserror::Error;

/// Errors raised by a morphological analyzer.
///
/// Every variant means the analysis is unavailable for the requested text.
/// The annotator never recovers from these: they propagate to the caller
/// and no line is silently skipped.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The analyzer could not be started or its dictionary could not be loaded
    #[error("Morphological analyzer unavailable: {0}")]
    Unavailable(String),

    /// The analyzer process ran but reported a failure
    #[error("Analyzer exited with {status}: {stderr}")]
    Failed {
        /// Exit status as reported by the OS
        status: String,
        /// Captured standard error of the analyzer
        stderr: String,
    },

    /// The analyzer emitted bytes that are not valid UTF-8
    #[error("Analyzer output is not valid UTF-8: {0}")]
    Encoding(String),

    /// A line of analyzer output could not be understood
    #[error("Malformed analyzer output at line {line}: {content}")]
    Malformed {
        /// 1-based line number in the analyzer output
        line: usize,
        /// The offending output line
        content: String,
    },

    /// The analyzer answered a different number of sentences than it was given
    #[error("Analyzer returned {actual} result(s) for {expected} input line(s)")]
    CountMismatch {
        /// Number of texts sent to the analyzer
        expected: usize,
        /// Number of EOS-terminated blocks received
        actual: usize,
    },
}

/// Errors that can occur while validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A numeric setting is out of its allowed range
    #[error("Invalid value for {field}: {message}")]
    InvalidValue {
        /// Dotted path of the setting
        field: &'static str,
        /// Why the value was rejected
        message: String,
    },

    /// Unknown analyzer backend name
    #[error("Unknown analyzer backend: {0}")]
    UnknownBackend(String),

    /// Unknown output format name
    #[error("Unknown output format: {0}")]
    UnknownFormat(String),
}

/// Main application error type that wraps all other errors
///
/// The controller and the binary work with `anyhow::Result`. Library callers
/// that need a matchable error convert at the boundary with `?` or `.into()`:
/// analyzer and config failures keep their typed variant, anything else
/// becomes `File` or `Unknown`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// The morphological analyzer failed
    #[error("Analysis unavailable: {0}")]
    AnalysisUnavailable(#[from] AnalysisError),

    /// Configuration is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        // downcast sees through any context added on the way up
        let error = match error.downcast::<AnalysisError>() {
            Ok(analysis_error) => return Self::AnalysisUnavailable(analysis_error),
            Err(error) => error,
        };
        let error = match error.downcast::<ConfigError>() {
            Ok(config_error) => return Self::Config(config_error),
            Err(error) => error,
        };
        match error.downcast::<std::io::Error>() {
            Ok(io_error) => Self::File(io_error.to_string()),
            Err(error) => Self::Unknown(error.to_string()),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
