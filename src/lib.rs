/*!
 * # yomi - katakana readings for lines of Japanese text
 *
 * A Rust library that turns lines of Japanese text into a katakana reading
 * and a per-word breakdown of how each word was read, for proofreading
 * indexes and reference lists.
 *
 * ## Features
 *
 * - Verbatim classification of symbols, whitespace, Latin letters, digits
 *   and kana runs
 * - Dictionary readings from an external morphological analyzer
 *   (Sudachi or MeCab command line)
 * - Hiragana to katakana conversion for kana runs
 * - Line cleanup: bracketed asides, trailing reference arrows and page
 *   numbers are removed before analysis
 * - TSV or JSON output, single files, folders or stdin
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `analyzer`: the `MorphemeSource` trait and its implementations:
 *   - `analyzer::command`: external tokenizer process
 *   - `analyzer::mock`: canned analyzer for tests
 * - `kana_utils`: character classes and kana conversion
 * - `token`: per-morpheme reading and detail resolution
 * - `line`: line normalization
 * - `annotator`: the line annotation pipeline
 * - `app_config`: Configuration management
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the Apache License 2.0
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod analyzer;
pub mod annotator;
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod kana_utils;
pub mod line;
pub mod token;

// Re-export main types for easier usage
pub use analyzer::{Morpheme, MorphemeSource, SharedSource};
pub use annotator::{Annotation, LineAnnotator};
pub use app_config::Config;
pub use errors::{AnalysisError, AppError, ConfigError};
pub use line::{Line, NormalizeOptions};
pub use token::{Token, TokenKind};
