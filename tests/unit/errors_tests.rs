/*!
 * Tests for error types and conversions
 */

use yomi::errors::{AnalysisError, AppError, ConfigError};

#[test]
fn test_analysisError_unavailable_shouldDisplayCorrectly() {
    let error = AnalysisError::Unavailable("dictionary not found".to_string());
    let display = format!("{}", error);
    assert!(display.contains("analyzer unavailable"));
    assert!(display.contains("dictionary not found"));
}

#[test]
fn test_analysisError_failed_shouldDisplayStatusAndStderr() {
    let error = AnalysisError::Failed {
        status: "exit status: 1".to_string(),
        stderr: "no such dictionary".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("exit status: 1"));
    assert!(display.contains("no such dictionary"));
}

#[test]
fn test_analysisError_countMismatch_shouldDisplayBothCounts() {
    let error = AnalysisError::CountMismatch { expected: 3, actual: 2 };
    let display = format!("{}", error);
    assert!(display.contains("2 result(s)"));
    assert!(display.contains("3 input line(s)"));
}

#[test]
fn test_configError_invalidValue_shouldNameField() {
    let error = ConfigError::InvalidValue {
        field: "analyzer.batch_size",
        message: "must be at least 1".to_string(),
    };
    assert_eq!(error.to_string(), "Invalid value for analyzer.batch_size: must be at least 1");
}

#[test]
fn test_appError_fromAnalysisError_shouldWrap() {
    let app_error: AppError = AnalysisError::Encoding("invalid byte".to_string()).into();
    assert!(matches!(app_error, AppError::AnalysisUnavailable(_)));
    assert!(app_error.to_string().contains("invalid byte"));
}

#[test]
fn test_appError_fromConfigError_shouldWrap() {
    let app_error: AppError = ConfigError::UnknownFormat("csv".to_string()).into();
    assert!(matches!(app_error, AppError::Config(_)));
}

#[test]
fn test_appError_fromIoError_shouldBecomeFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.txt");
    let app_error: AppError = io_error.into();
    assert!(matches!(app_error, AppError::File(_)));
    assert!(app_error.to_string().contains("missing.txt"));
}

#[test]
fn test_appError_fromAnyhow_shouldKeepMessage() {
    let app_error: AppError = anyhow::anyhow!("something broke").into();
    assert!(matches!(app_error, AppError::Unknown(ref message) if message == "something broke"));
}
