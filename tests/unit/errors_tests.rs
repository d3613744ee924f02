/*!
 * Tests for error types and conversions
 */

use autotrans::errors::{AppError, ProviderError, RunError};

#[test]
fn test_providerError_apiError_shouldDisplayStatusAndMessage() {
    let error = ProviderError::ApiError {
        status_code: 500,
        message: "Internal error".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("500"));
    assert!(display.contains("Internal error"));
}

#[test]
fn test_providerError_timeout_shouldDisplayCorrectly() {
    let error = ProviderError::Timeout("after 120s".to_string());
    let display = format!("{}", error);
    assert!(display.contains("timed out"));
    assert!(display.contains("after 120s"));
}

#[test]
fn test_providerError_fromStatus_shouldClassifyStatusCodes() {
    assert!(matches!(ProviderError::from_status(401, "bad key"), ProviderError::AuthenticationError(_)));
    assert!(matches!(ProviderError::from_status(403, "forbidden"), ProviderError::AuthenticationError(_)));
    assert!(matches!(ProviderError::from_status(429, "slow down"), ProviderError::RateLimitExceeded(_)));
    assert!(matches!(
        ProviderError::from_status(503, "unavailable"),
        ProviderError::ApiError { status_code: 503, .. }
    ));
}

#[test]
fn test_runError_shouldDisplayReason() {
    let error = RunError::InvalidInput("Select at least one target language".to_string());
    assert!(error.to_string().contains("Select at least one target language"));
    assert!(RunError::AlreadyRunning.to_string().contains("already in progress"));
}

#[test]
fn test_appError_fromRunError_shouldWrapCorrectly() {
    let app_error: AppError = RunError::AlreadyRunning.into();
    assert!(matches!(app_error, AppError::Run(RunError::AlreadyRunning)));
}

#[test]
fn test_appError_fromIoError_shouldBeFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.srt");
    let app_error: AppError = io_error.into();
    assert!(matches!(app_error, AppError::File(_)));
    assert!(app_error.to_string().contains("missing.srt"));
}
