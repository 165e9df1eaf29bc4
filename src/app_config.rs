use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

use crate::analyzer::command::{AnalyzerBackend, CommandAnalyzer};
use crate::errors::ConfigError;
use crate::line::NormalizeOptions;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Morphological analyzer settings
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Which line normalization steps run before analysis
    #[serde(default)]
    pub normalization: NormalizeOptions,

    /// Output file settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// External analyzer configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AnalyzerConfig {
    // @field: Output dialect of the analyzer
    #[serde(default)]
    pub backend: AnalyzerBackend,

    // @field: Executable, empty for the backend default
    #[serde(default = "String::new")]
    pub command: String,

    // @field: Arguments, empty for the backend default
    #[serde(default)]
    pub args: Vec<String>,

    // @field: Lines per analyzer invocation
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    // @field: Analyzer invocations running at the same time
    #[serde(default = "default_concurrent_batches")]
    pub concurrent_batches: usize,
}

impl AnalyzerConfig {
    /// Build the command analyzer described by this configuration
    pub fn build(&self) -> CommandAnalyzer {
        CommandAnalyzer::with_command(self.backend, &self.command, &self.args)
    }

    /// Executable that will actually run
    pub fn get_command(&self) -> String {
        if self.command.trim().is_empty() {
            self.backend.default_command().to_string()
        } else {
            self.command.clone()
        }
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            backend: AnalyzerBackend::default(),
            command: String::new(),
            args: Vec::new(),
            batch_size: default_batch_size(),
            concurrent_batches: default_concurrent_batches(),
        }
    }
}

/// Serialization of annotation results
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    // @format: Tab-separated line, reading, detail
    #[default]
    Tsv,
    // @format: JSON array of objects
    Json,
}

impl OutputFormat {
    // @returns: File extension used when the config leaves it empty
    pub fn default_extension(&self) -> &'static str {
        match self {
            Self::Tsv => "tsv",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.default_extension())
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tsv" => Ok(Self::Tsv),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::UnknownFormat(s.to_string())),
        }
    }
}

/// Output file configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OutputConfig {
    /// Serialization format
    #[serde(default)]
    pub format: OutputFormat,

    /// Inserted between the input stem and the extension (`notes.yomi.tsv`)
    #[serde(default = "default_suffix")]
    pub suffix: String,

    /// File extension, empty for the format default
    #[serde(default = "String::new")]
    pub extension: String,
}

impl OutputConfig {
    /// Get the extension for output files
    pub fn get_extension(&self) -> String {
        if self.extension.trim().is_empty() {
            self.format.default_extension().to_string()
        } else {
            self.extension.trim_start_matches('.').to_string()
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            suffix: default_suffix(),
            extension: String::new(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching `log` level filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_batch_size() -> usize {
    256
}

fn default_concurrent_batches() -> usize {
    1
}

fn default_suffix() -> String {
    "yomi".to_string()
}

impl Config {
    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Write this configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.analyzer.batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "analyzer.batch_size",
                message: "must be at least 1".to_string(),
            }
            .into());
        }

        if self.analyzer.concurrent_batches == 0 {
            return Err(ConfigError::InvalidValue {
                field: "analyzer.concurrent_batches",
                message: "must be at least 1".to_string(),
            }
            .into());
        }

        if self.output.suffix.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "output.suffix",
                message: "must not be empty".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            analyzer: AnalyzerConfig::default(),
            normalization: NormalizeOptions::default(),
            output: OutputConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
