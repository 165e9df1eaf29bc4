/*!
 * Tests for the line annotation pipeline
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use anyhow::Result;
use yomi::analyzer::mock::MockAnalyzer;
use yomi::annotator::{render_json, render_tsv, Annotation, LineAnnotator};
use yomi::errors::AnalysisError;
use yomi::line::NormalizeOptions;
use yomi::SharedSource;
use crate::common;

#[test]
fn test_annotate_line_withParentheticalAndParticle_shouldJoinReadings() -> Result<()> {
    let annotator = common::mock_annotator();

    let annotation = annotator.annotate_line("東京（とうきょう）に行く")?;

    assert_eq!(annotation.line, "東京（とうきょう）に行く");
    assert_eq!(annotation.reading, "トウキョウニイク");
    assert_eq!(annotation.detail, "東京(トウキョウ) / に / 行く(イク)");
    Ok(())
}

#[test]
fn test_annotate_line_withHiraganaWord_shouldConvertToKatakana() -> Result<()> {
    let annotator = common::mock_annotator();

    let annotation = annotator.annotate_line("ねこ")?;

    assert_eq!(annotation.reading, "ネコ");
    assert_eq!(annotation.detail, "ねこ");
    Ok(())
}

#[test]
fn test_annotate_line_withUnknownKanji_shouldMarkUnresolved() -> Result<()> {
    let annotator = common::mock_annotator();

    let annotation = annotator.annotate_line("鰯と猫")?;

    assert_eq!(annotation.reading, "鰯トネコ");
    assert_eq!(annotation.detail, "鰯(?) / と / 猫(ネコ)");
    Ok(())
}

#[test]
fn test_annotate_line_withPageNumber_shouldAnalyzeHeadingOnly() -> Result<()> {
    let (analyzer, source) = common::mock_source();
    let annotator = LineAnnotator::new(source);

    let annotation = annotator.annotate_line("見出し\u{3000}\u{3000}12")?;

    assert_eq!(annotation.line, "見出し\u{3000}\u{3000}12");
    assert_eq!(annotation.reading, "ミダシ");
    assert_eq!(annotation.detail, "見出し(ミダシ)");
    assert_eq!(analyzer.requests(), vec!["見出し".to_string()]);
    Ok(())
}

#[test]
fn test_annotate_line_withBlankLine_shouldNotCallAnalyzer() -> Result<()> {
    let (analyzer, source) = common::mock_source();
    let annotator = LineAnnotator::new(source);

    let annotation = annotator.annotate_line("")?;
    let spaces = annotator.annotate_line("  \u{3000}")?;

    assert_eq!(annotation, Annotation::blank(""));
    assert_eq!(spaces, Annotation::blank("  \u{3000}"));
    assert_eq!(analyzer.request_count(), 0);
    Ok(())
}

#[test]
fn test_annotate_withMixedLines_shouldKeepOrderAndSkipBlanks() -> Result<()> {
    let (analyzer, source) = common::mock_source();
    let annotator = LineAnnotator::new(source);

    let lines = ["猫", "", "（注）", "犬"];
    let annotations = annotator.annotate(&lines)?;

    assert_eq!(annotations.len(), 4);
    assert_eq!(annotations[0].detail, "猫(ネコ)");
    assert_eq!(annotations[1], Annotation::blank(""));
    assert_eq!(annotations[2], Annotation::blank("（注）"));
    assert_eq!(annotations[3].detail, "犬(イヌ)");
    assert_eq!(analyzer.requests(), vec!["猫".to_string(), "犬".to_string()]);
    Ok(())
}

#[test]
fn test_annotate_withKeptParentheticals_shouldAnalyzeThem() -> Result<()> {
    let options = NormalizeOptions {
        strip_parentheticals: false,
        strip_trailing_noise: true,
    };
    let annotator = common::mock_annotator().with_options(options);

    let annotation = annotator.annotate_line("猫（ねこ）")?;

    assert_eq!(annotation.reading, "ネコ（ネコ）");
    assert_eq!(annotation.detail, "猫(ネコ) / （ / ねこ / ）");
    Ok(())
}

#[test]
fn test_annotate_withFailingAnalyzer_shouldPropagateError() {
    let source: SharedSource = Arc::new(MockAnalyzer::failing());
    let annotator = LineAnnotator::new(source);

    let result = annotator.annotate(&["猫", "犬"]);

    assert!(matches!(result, Err(AnalysisError::Unavailable(_))));
}

#[test]
fn test_annotate_withOnlyBlankLines_shouldSucceedEvenIfAnalyzerFails() -> Result<()> {
    let source: SharedSource = Arc::new(MockAnalyzer::failing());
    let annotator = LineAnnotator::new(source);

    let annotations = annotator.annotate(&["", " "])?;

    assert_eq!(annotations, vec![Annotation::blank(""), Annotation::blank(" ")]);
    Ok(())
}

#[tokio::test]
async fn test_annotate_concurrent_withSmallBatches_shouldPreserveInputOrder() -> Result<()> {
    let annotator = common::mock_annotator();
    let words = ["猫", "犬", "東京", "", "大阪", "京都", "ねこ", "日本語", "山田太郎", "花子"];
    let lines: Vec<String> = words.iter().map(|w| w.to_string()).collect();

    let annotations = annotator.annotate_concurrent(lines.clone(), 2, 4, |_, _| {}).await?;

    let sequential = annotator.annotate(&lines)?;
    assert_eq!(annotations, sequential);
    let returned: Vec<&str> = annotations.iter().map(|a| a.line.as_str()).collect();
    assert_eq!(returned, words);
    Ok(())
}

#[tokio::test]
async fn test_annotate_concurrent_shouldReportProgressUpToTotal() -> Result<()> {
    let annotator = common::mock_annotator();
    let lines: Vec<String> = (0..7).map(|_| "猫".to_string()).collect();
    let highest = Arc::new(AtomicUsize::new(0));
    let calls = Arc::new(AtomicUsize::new(0));

    let highest_clone = highest.clone();
    let calls_clone = calls.clone();
    annotator
        .annotate_concurrent(lines, 3, 2, move |done, total| {
            assert_eq!(total, 7);
            highest_clone.fetch_max(done, Ordering::SeqCst);
            calls_clone.fetch_add(1, Ordering::SeqCst);
        })
        .await?;

    assert_eq!(highest.load(Ordering::SeqCst), 7);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    Ok(())
}

#[tokio::test]
async fn test_annotate_concurrent_withIntermittentFailure_shouldFail() {
    let source: SharedSource = Arc::new(MockAnalyzer::intermittent(2));
    let annotator = LineAnnotator::new(source);
    let lines: Vec<String> = (0..4).map(|_| "犬".to_string()).collect();

    let result = annotator.annotate_concurrent(lines, 1, 2, |_, _| {}).await;

    assert!(result.is_err());
}

#[test]
fn test_render_tsv_shouldWriteOneRowPerAnnotation() {
    let annotations = vec![
        Annotation {
            line: "猫".to_string(),
            reading: "ネコ".to_string(),
            detail: "猫(ネコ)".to_string(),
        },
        Annotation::blank(""),
        Annotation {
            line: "a\tb".to_string(),
            reading: "a\tb".to_string(),
            detail: "a\tb".to_string(),
        },
    ];

    let rendered = render_tsv(&annotations);

    assert_eq!(rendered, "猫\tネコ\t猫(ネコ)\n\t\t\na\\tb\ta\\tb\ta\\tb");
}

#[test]
fn test_render_json_shouldSerializeFieldNames() -> Result<()> {
    let annotations = vec![Annotation {
        line: "犬".to_string(),
        reading: "イヌ".to_string(),
        detail: "犬(イヌ)".to_string(),
    }];

    let rendered = render_json(&annotations)?;
    let parsed: Vec<Annotation> = serde_json::from_str(&rendered)?;

    assert!(rendered.contains("\"reading\": \"イヌ\""));
    assert_eq!(parsed, annotations);
    Ok(())
}
