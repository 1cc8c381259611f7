//! Error types module
//!
//! `AppError` is the tagged error threaded through the image-to-speech sequence.
//! Each variant describes its own HTTP presentation through `ErrorMetadata`, so
//! the HTTP layer only has to render what the error reports about itself.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for client mistakes worth noticing
    Warn,
    /// Error level - for upstream and unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "STORAGE_ERROR")
    fn error_code(&self) -> &'static str;

    /// Client-facing message placed in the response envelope
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Expected attached file")]
    MissingFile,

    #[error("Invalid filetype for file {filename}")]
    InvalidFileType { filename: String },

    #[error("File exceeds maximum upload size of {0} bytes")]
    PayloadTooLarge(usize),

    #[error("No results from computer vision API")]
    NoDescription,

    #[error("Failed to synthesize text.\nReason: {reason}.\nText: {text}")]
    SynthesisFailed { reason: String, text: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Upstream service error: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error: {message}")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

/// Static metadata for each variant: (http_status, error_code, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, LogLevel) {
    match err {
        AppError::MissingFile => (400, "MISSING_FILE", LogLevel::Debug),
        AppError::InvalidFileType { .. } => (400, "INVALID_FILE_TYPE", LogLevel::Debug),
        AppError::PayloadTooLarge(_) => (413, "PAYLOAD_TOO_LARGE", LogLevel::Warn),
        AppError::NoDescription => (500, "NO_DESCRIPTION", LogLevel::Error),
        AppError::SynthesisFailed { .. } => (500, "SYNTHESIS_FAILED", LogLevel::Error),
        AppError::Storage(_) => (500, "STORAGE_ERROR", LogLevel::Error),
        AppError::Upstream(_) => (500, "UPSTREAM_ERROR", LogLevel::Error),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => {
            (500, "INTERNAL_ERROR", LogLevel::Error)
        }
    }
}

impl AppError {
    /// Get the error type name for log fields
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::MissingFile => "MissingFile",
            AppError::InvalidFileType { .. } => "InvalidFileType",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::NoDescription => "NoDescription",
            AppError::SynthesisFailed { .. } => "SynthesisFailed",
            AppError::Storage(_) => "Storage",
            AppError::Upstream(_) => "Upstream",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).2
    }

    fn client_message(&self) -> String {
        match self {
            AppError::MissingFile
            | AppError::InvalidFileType { .. }
            | AppError::PayloadTooLarge(_)
            | AppError::NoDescription
            | AppError::SynthesisFailed { .. } => self.to_string(),
            AppError::Storage(ref detail)
            | AppError::Upstream(ref detail)
            | AppError::Internal(ref detail) => format!("Unhandled exception: {}", detail),
            AppError::InternalWithSource { ref message, .. } => {
                format!("Unhandled exception: {}", message)
            }
        }
    }
}
