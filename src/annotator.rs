/*!
 * Line annotation pipeline.
 *
 * For every raw line: normalize, analyze the cleaned text, wrap each
 * morpheme in a `Token`, then join the readings (no separator) and the
 * details (`" / "`). Lines are independent; results always come back in
 * input order, one per line, blank lines included.
 */

use anyhow::{Result, anyhow};
use futures::stream::{self, StreamExt};
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::analyzer::{Morpheme, SharedSource};
use crate::errors::AnalysisError;
use crate::line::{Line, NormalizeOptions};
use crate::token::Token;

/// Separator between token details
pub const DETAIL_SEPARATOR: &str = " / ";

/// Reading and reading breakdown for one input line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// The input line, before normalization
    pub line: String,

    /// Concatenated token readings
    pub reading: String,

    /// Token details joined by `" / "`
    pub detail: String,
}

impl Annotation {
    /// Annotation for a line with nothing to analyze
    pub fn blank(raw: impl Into<String>) -> Self {
        Self {
            line: raw.into(),
            reading: String::new(),
            detail: String::new(),
        }
    }

    /// Join the tokens of one line
    pub fn from_tokens(raw: impl Into<String>, tokens: &[Token]) -> Self {
        Self {
            line: raw.into(),
            reading: tokens.iter().map(Token::reading).collect(),
            detail: tokens
                .iter()
                .map(Token::detail)
                .collect::<Vec<_>>()
                .join(DETAIL_SEPARATOR),
        }
    }

    /// Render as one tab-separated record
    ///
    /// Tabs and line breaks inside fields are written as `\t`, `\r` and
    /// `\n` so every annotation stays on one row with three columns.
    pub fn to_tsv_row(&self) -> String {
        format!(
            "{}\t{}\t{}",
            escape_tsv_field(&self.line),
            escape_tsv_field(&self.reading),
            escape_tsv_field(&self.detail)
        )
    }
}

/// Escape the TSV field and record separators
pub fn escape_tsv_field(field: &str) -> String {
    let mut escaped = String::with_capacity(field.len());
    for c in field.chars() {
        match c {
            '\t' => escaped.push_str("\\t"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render annotations as TSV rows joined by newlines
pub fn render_tsv(annotations: &[Annotation]) -> String {
    annotations
        .iter()
        .map(Annotation::to_tsv_row)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render annotations as a pretty-printed JSON array
pub fn render_json(annotations: &[Annotation]) -> Result<String> {
    Ok(serde_json::to_string_pretty(annotations)?)
}

/// Wrap analyzer output in tokens
pub fn tokenize(morphemes: &[Morpheme]) -> Vec<Token> {
    morphemes.iter().map(Token::from_morpheme).collect()
}

/// Pipeline from raw lines to annotations
#[derive(Debug, Clone)]
pub struct LineAnnotator {
    source: SharedSource,
    options: NormalizeOptions,
}

impl LineAnnotator {
    /// Create an annotator over a shared analyzer with default normalization
    pub fn new(source: SharedSource) -> Self {
        Self {
            source,
            options: NormalizeOptions::default(),
        }
    }

    /// Replace the normalization options
    pub fn with_options(mut self, options: NormalizeOptions) -> Self {
        self.options = options;
        self
    }

    /// Normalization options in use
    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// The analyzer this annotator queries
    pub fn source(&self) -> &SharedSource {
        &self.source
    }

    fn prepare(&self, raw: &str) -> Line {
        let mut line = Line::new(raw);
        line.normalize(&self.options);
        line
    }

    /// Annotate a single line
    pub fn annotate_line(&self, raw: &str) -> Result<Annotation, AnalysisError> {
        let line = self.prepare(raw);
        if line.is_blank() {
            return Ok(Annotation::blank(raw));
        }

        let morphemes = self.source.analyze(line.text())?;
        Ok(Annotation::from_tokens(raw, &tokenize(&morphemes)))
    }

    /// Annotate a batch of lines with one analyzer call
    ///
    /// Blank lines, and lines left blank by normalization, are never sent
    /// to the analyzer. An analyzer failure fails the whole batch.
    pub fn annotate<S: AsRef<str>>(&self, lines: &[S]) -> Result<Vec<Annotation>, AnalysisError> {
        let prepared: Vec<Line> = lines.iter().map(|raw| self.prepare(raw.as_ref())).collect();
        let texts: Vec<&str> = prepared
            .iter()
            .filter(|line| !line.is_blank())
            .map(Line::text)
            .collect();

        let mut analyzed = if texts.is_empty() {
            Vec::new().into_iter()
        } else {
            debug!("Analyzing {} of {} line(s) with {}", texts.len(), lines.len(), self.source.name());
            let results = self.source.analyze_batch(&texts)?;
            if results.len() != texts.len() {
                return Err(AnalysisError::CountMismatch {
                    expected: texts.len(),
                    actual: results.len(),
                });
            }
            results.into_iter()
        };

        let mut annotations = Vec::with_capacity(prepared.len());
        for line in &prepared {
            if line.is_blank() {
                annotations.push(Annotation::blank(line.raw()));
                continue;
            }
            let morphemes = analyzed.next().unwrap_or_default();
            annotations.push(Annotation::from_tokens(line.raw(), &tokenize(&morphemes)));
        }

        Ok(annotations)
    }

    /// Annotate lines in batches on the blocking thread pool
    ///
    /// At most `workers` batches of `batch_size` lines are analyzed at the
    /// same time. `on_progress` receives the number of lines done so far
    /// and the total after every batch. The output keeps the input order.
    pub async fn annotate_concurrent(
        &self,
        lines: Vec<String>,
        batch_size: usize,
        workers: usize,
        on_progress: impl Fn(usize, usize) + Clone + Send + 'static,
    ) -> Result<Vec<Annotation>> {
        let total = lines.len();
        let batches = split_into_batches(lines, batch_size);
        let completed = Arc::new(AtomicUsize::new(0));

        let mut results = stream::iter(batches.into_iter().enumerate())
            .map(|(batch_index, batch)| {
                let annotator = self.clone();
                let completed = completed.clone();
                let on_progress = on_progress.clone();

                async move {
                    let batch_len = batch.len();
                    let result = tokio::task::spawn_blocking(move || annotator.annotate(&batch))
                        .await
                        .map_err(|e| anyhow!("Annotation task for batch {} failed: {}", batch_index + 1, e))
                        .and_then(|result| result.map_err(anyhow::Error::from));

                    let done = completed.fetch_add(batch_len, Ordering::SeqCst) + batch_len;
                    on_progress(done, total);

                    (batch_index, result)
                }
            })
            .buffer_unordered(workers.max(1))
            .collect::<Vec<_>>()
            .await;

        // Sort results by batch index to restore input order
        results.sort_by_key(|(index, _)| *index);

        let mut annotations = Vec::with_capacity(total);
        for (_, result) in results {
            annotations.extend(result?);
        }

        Ok(annotations)
    }
}

/// Split lines into consecutive batches of at most `batch_size` lines
pub fn split_into_batches(lines: Vec<String>, batch_size: usize) -> Vec<Vec<String>> {
    let batch_size = batch_size.max(1);
    let mut batches = Vec::with_capacity(lines.len().div_ceil(batch_size));
    let mut current = Vec::with_capacity(batch_size.min(lines.len()));

    for line in lines {
        current.push(line);
        if current.len() == batch_size {
            batches.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        batches.push(current);
    }

    batches
}
