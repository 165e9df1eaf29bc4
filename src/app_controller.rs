use anyhow::{Result, Context, anyhow};
use log::{error, warn, info, debug};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use indicatif::{ProgressBar, ProgressStyle};

use crate::analyzer::SharedSource;
use crate::annotator::{self, Annotation, LineAnnotator};
use crate::app_config::{Config, OutputFormat};
use crate::file_utils::{self, FileManager};

// @module: Application controller for annotating text files

// @const: Extension of the input files picked up in folder mode
const INPUT_EXTENSION: &str = "txt";

/// Result of annotating one input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Annotations were written to this path
    Written(PathBuf),
    /// Output already existed and overwriting was not requested
    Skipped(PathBuf),
    /// The input had no lines; nothing was written
    Empty,
}

/// Counts reported after a folder run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderSummary {
    /// Files annotated and written
    pub processed: usize,
    /// Files skipped because their output already existed
    pub skipped: usize,
    /// Files without any lines
    pub empty: usize,
    /// Files that failed
    pub failed: usize,
}

/// Main application controller for reading annotation
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Shared annotation pipeline
    annotator: LineAnnotator,
}

impl Controller {
    // @method: Create a controller running the analyzer command from the configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        let source: SharedSource = Arc::new(config.analyzer.build());
        Ok(Self::with_source(config, source))
    }

    // @method: Create a controller around an existing analyzer
    pub fn with_source(config: Config, source: SharedSource) -> Self {
        let annotator = LineAnnotator::new(source).with_options(config.normalization);
        Self { config, annotator }
    }

    /// Configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Annotation pipeline in use
    pub fn annotator(&self) -> &LineAnnotator {
        &self.annotator
    }

    /// Make sure the analyzer can be used before processing any input
    pub fn check_analyzer(&self) -> Result<()> {
        let source = self.annotator.source();
        source
            .check()
            .with_context(|| format!("Analyzer '{}' is not usable", source.name()))
    }

    /// Annotate lines, showing a progress bar for inputs spanning several batches
    pub async fn annotate_lines(&self, lines: Vec<String>) -> Result<Vec<Annotation>> {
        let total = lines.len();
        let batch_size = self.config.analyzer.batch_size;

        let progress_bar = if total > batch_size {
            let progress_bar = ProgressBar::new(total as u64);
            let template_result = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} lines ({percent}%) {msg} {eta}")
                .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            progress_bar.set_style(template_result.progress_chars("█▓▒░"));
            progress_bar.set_message("Annotating");
            progress_bar
        } else {
            ProgressBar::hidden()
        };

        let start_time = std::time::Instant::now();
        let pb = progress_bar.clone();
        let result = self
            .annotator
            .annotate_concurrent(
                lines,
                batch_size,
                self.config.analyzer.concurrent_batches,
                move |done, _total| {
                    pb.set_position(done as u64);
                },
            )
            .await;
        progress_bar.finish_and_clear();

        let annotations = result?;
        debug!("Annotated {} line(s) in {}", total, Self::format_duration(start_time.elapsed()));

        Ok(annotations)
    }

    /// Serialize annotations in the configured format
    pub fn render(&self, annotations: &[Annotation]) -> Result<String> {
        match self.config.output.format {
            OutputFormat::Tsv => Ok(annotator::render_tsv(annotations)),
            OutputFormat::Json => annotator::render_json(annotations),
        }
    }

    /// Annotate a block of text, returning `None` when it has no lines
    pub async fn run_text(&self, text: &str) -> Result<Option<String>> {
        let lines = file_utils::split_lines(text);
        if lines.is_empty() {
            warn!("No input lines to annotate.");
            return Ok(None);
        }

        let annotations = self.annotate_lines(lines).await?;
        Ok(Some(self.render(&annotations)?))
    }

    /// Output path for an input file placed in the given directory
    pub fn output_path_for(&self, input_file: &Path, output_dir: &Path) -> PathBuf {
        FileManager::generate_output_path(
            input_file,
            output_dir,
            &self.config.output.suffix,
            &self.config.output.get_extension(),
        )
    }

    /// Annotate one file into the given output path
    pub async fn run(&self, input_file: PathBuf, output_path: PathBuf, force_overwrite: bool) -> Result<RunOutcome> {
        if !FileManager::file_exists(&input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        if output_path.exists() && !force_overwrite {
            warn!("Skipping {:?}, output already exists (use -f to force overwrite)", output_path);
            return Ok(RunOutcome::Skipped(output_path));
        }

        let lines = FileManager::read_lines(&input_file)?;
        if lines.is_empty() {
            warn!("No lines to annotate in {:?}", input_file);
            return Ok(RunOutcome::Empty);
        }

        let annotations = self.annotate_lines(lines).await
            .with_context(|| format!("Failed to annotate {:?}", input_file))?;
        let rendered = self.render(&annotations)?;
        FileManager::write_to_file(&output_path, &rendered)?;

        info!("Success: {}", output_path.display());
        Ok(RunOutcome::Written(output_path))
    }

    /// Annotate every text file under a directory, writing outputs next to the inputs
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<FolderSummary> {
        let start_time = std::time::Instant::now();

        if !FileManager::dir_exists(&input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let output_marker = format!(".{}", self.config.output.suffix);
        let text_files: Vec<PathBuf> = FileManager::find_files(&input_dir, INPUT_EXTENSION)?
            .into_iter()
            .filter(|path| {
                // Outputs written with a .txt extension must not be annotated again
                !path.file_stem()
                    .is_some_and(|stem| stem.to_string_lossy().ends_with(&output_marker))
            })
            .collect();

        if text_files.is_empty() {
            return Err(anyhow!("No .{} files found in directory: {:?}", INPUT_EXTENSION, input_dir));
        }

        let mut summary = FolderSummary::default();

        for text_file in &text_files {
            let output_dir = text_file.parent().map(Path::to_path_buf).unwrap_or_else(|| input_dir.clone());
            let output_path = self.output_path_for(text_file, &output_dir);

            match self.run(text_file.clone(), output_path, force_overwrite).await {
                Ok(RunOutcome::Written(_)) => summary.processed += 1,
                Ok(RunOutcome::Skipped(_)) => summary.skipped += 1,
                Ok(RunOutcome::Empty) => summary.empty += 1,
                Err(e) => {
                    error!("Error processing file {:?}: {:#}", text_file, e);
                    summary.failed += 1;
                }
            }
        }

        info!(
            "Folder processing completed in {}: {} processed, {} skipped, {} empty, {} errors",
            Self::format_duration(start_time.elapsed()),
            summary.processed, summary.skipped, summary.empty, summary.failed
        );

        Ok(summary)
    }

    // Format duration in a human-readable format (HH:MM:SS)
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
