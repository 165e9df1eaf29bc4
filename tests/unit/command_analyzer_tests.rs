/*!
 * Tests for the command analyzer against real child processes
 *
 * A small `sh -c` script stands in for MeCab so the process plumbing runs
 * without a dictionary installed.
 */

#![cfg(unix)]

use std::sync::Arc;
use anyhow::Result;
use yomi::analyzer::command::{AnalyzerBackend, CommandAnalyzer};
use yomi::analyzer::MorphemeSource;
use yomi::annotator::{Annotation, LineAnnotator};
use yomi::errors::AnalysisError;

/// Answers every input line with one MeCab-style morpheme read ヨミ
const ECHO_ANALYZER: &str =
    r#"awk '{ printf "%s\t名詞,一般,*,*,*,*,%s,ヨミ,ヨミ\nEOS\n", $0, $0 }'"#;

fn shell_analyzer(script: &str) -> CommandAnalyzer {
    let args = vec!["-c".to_string(), script.to_string()];
    CommandAnalyzer::with_command(AnalyzerBackend::Mecab, "sh", &args)
}

#[test]
fn test_annotate_withEchoAnalyzer_shouldKeepBlankLinesAndOrder() -> Result<()> {
    let annotator = LineAnnotator::new(Arc::new(shell_analyzer(ECHO_ANALYZER)));

    let annotations = annotator.annotate(&["猫", "", "犬（いぬ）"])?;

    assert_eq!(
        annotations,
        vec![
            Annotation {
                line: "猫".to_string(),
                reading: "ヨミ".to_string(),
                detail: "猫(ヨミ)".to_string(),
            },
            Annotation::blank(""),
            Annotation {
                line: "犬（いぬ）".to_string(),
                reading: "ヨミ".to_string(),
                detail: "犬(ヨミ)".to_string(),
            },
        ]
    );
    Ok(())
}

#[test]
fn test_check_withEchoAnalyzer_shouldSucceed() {
    assert!(shell_analyzer(ECHO_ANALYZER).check().is_ok());
}

#[test]
fn test_analyze_withTabInText_shouldStayOneSentence() -> Result<()> {
    let analyzer = shell_analyzer(ECHO_ANALYZER);

    let morphemes = analyzer.analyze("猫\tです")?;

    assert_eq!(morphemes.len(), 1);
    assert_eq!(morphemes[0].surface, "猫 です");
    Ok(())
}

#[test]
fn test_analyze_batch_withLineBreaksInText_shouldAnswerOneBlockPerText() -> Result<()> {
    let analyzer = shell_analyzer(ECHO_ANALYZER);

    let sentences = analyzer.analyze_batch(&["猫\r\n犬", "鳥"])?;

    assert_eq!(sentences.len(), 2);
    assert_eq!(sentences[0][0].surface, "猫  犬");
    assert_eq!(sentences[1][0].surface, "鳥");
    Ok(())
}

#[test]
fn test_analyze_withInputLargerThanPipeBuffer_shouldNotDeadlock() -> Result<()> {
    let analyzer = shell_analyzer(ECHO_ANALYZER);
    let text = "猫".repeat(100_000);

    let morphemes = analyzer.analyze(&text)?;

    assert_eq!(morphemes.len(), 1);
    assert_eq!(morphemes[0].surface.len(), text.len());
    Ok(())
}

#[test]
fn test_analyze_withNonZeroExit_shouldReportStatusAndStderr() {
    let analyzer = shell_analyzer("cat > /dev/null; echo boom >&2; exit 3");

    match analyzer.analyze("猫") {
        Err(AnalysisError::Failed { status, stderr }) => {
            assert!(status.contains('3'), "unexpected status {:?}", status);
            assert_eq!(stderr, "boom");
        }
        other => panic!("expected analyzer failure, got {:?}", other),
    }
}

#[test]
fn test_analyze_batch_withMissingSentence_shouldReportCountMismatch() {
    let analyzer = shell_analyzer("cat > /dev/null; echo EOS");

    let result = analyzer.analyze_batch(&["猫", "犬"]);

    assert!(matches!(
        result,
        Err(AnalysisError::CountMismatch { expected: 2, actual: 1 })
    ));
}

#[test]
fn test_analyze_withInvalidUtf8Output_shouldReportEncoding() {
    let analyzer = shell_analyzer(r"cat > /dev/null; printf '\377'");

    assert!(matches!(analyzer.analyze("猫"), Err(AnalysisError::Encoding(_))));
}
