//! Response bodies of the image-to-speech endpoint.
//!
//! Every response is a single JSON object carrying `success` and either a
//! `url` or a `message`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of a successful pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SpeechUrlResponse {
    /// Always `true`
    pub success: bool,
    /// Signed read URL of the synthesized audio, valid for 10 minutes
    pub url: String,
}

impl SpeechUrlResponse {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            success: true,
            url: url.into(),
        }
    }
}

/// Body of a failed pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorEnvelope {
    /// Always `false`
    pub success: bool,
    pub message: String,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
