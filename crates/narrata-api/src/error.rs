//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`. Anything that converts into
//! `AppError` converts into `HttpAppError` through `?`, and every failure is
//! rendered as the same `{"success": false, "message": ...}` envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use narrata_core::models::ErrorEnvelope;
use narrata_core::{AppError, ErrorMetadata, LogLevel};
use narrata_services::{SpeechError, VisionError};
use narrata_storage::StorageError;

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from narrata-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::from(err))
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(AppError::from(err))
    }
}

impl From<VisionError> for HttpAppError {
    fn from(err: VisionError) -> Self {
        HttpAppError(AppError::from(err))
    }
}

impl From<SpeechError> for HttpAppError {
    fn from(err: SpeechError) -> Self {
        HttpAppError(AppError::from(err))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(
                error = %error,
                error_type = error_type,
                details = %error.detailed_message(),
                "Error occurred"
            );
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        (status, Json(ErrorEnvelope::new(app_error.client_message()))).into_response()
    }
}
