//! Text-to-speech synthesis
//!
//! The Azure client reports each attempt as a [`SynthesisResult`]; callers
//! that only want audio go through [`SpeechSynthesizer::synthesize`], which
//! fails unless synthesis ran to completion.

pub mod azure;
mod ssml;

use std::fmt;

use async_trait::async_trait;
use narrata_core::AppError;
use thiserror::Error;

pub use azure::AzureSpeechClient;

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("Speech client error: {0}")]
    Client(String),

    #[error("Speech synthesis did not complete ({reason}) for text: {text}")]
    NotCompleted { reason: String, text: String },
}

impl From<SpeechError> for AppError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::NotCompleted { reason, text } => {
                AppError::SynthesisFailed { reason, text }
            }
            SpeechError::Client(msg) => AppError::Internal(msg),
        }
    }
}

/// Why a synthesis attempt stopped short of producing audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancellationDetails {
    /// HTTP status of the service response, when one was received.
    pub status: Option<u16>,
    pub error_details: String,
}

/// Completion reason of a synthesis attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultReason {
    SynthesizingAudioCompleted,
    Canceled(CancellationDetails),
}

impl fmt::Display for ResultReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultReason::SynthesizingAudioCompleted => write!(f, "SynthesizingAudioCompleted"),
            ResultReason::Canceled(details) => match details.status {
                Some(status) => write!(f, "Canceled (HTTP {}: {})", status, details.error_details),
                None => write!(f, "Canceled ({})", details.error_details),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct SynthesisResult {
    pub reason: ResultReason,
    /// Encoded audio, empty unless synthesis completed.
    pub audio_data: Vec<u8>,
}

impl SynthesisResult {
    pub fn completed(audio_data: Vec<u8>) -> Self {
        Self {
            reason: ResultReason::SynthesizingAudioCompleted,
            audio_data,
        }
    }

    pub fn canceled(status: Option<u16>, error_details: impl Into<String>) -> Self {
        Self {
            reason: ResultReason::Canceled(CancellationDetails {
                status,
                error_details: error_details.into(),
            }),
            audio_data: Vec::new(),
        }
    }

    /// Audio bytes of a completed attempt, or `NotCompleted` naming `text`.
    pub fn into_audio(self, text: &str) -> Result<Vec<u8>, SpeechError> {
        match self.reason {
            ResultReason::SynthesizingAudioCompleted => Ok(self.audio_data),
            reason => Err(SpeechError::NotCompleted {
                reason: reason.to_string(),
                text: text.to_string(),
            }),
        }
    }
}

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` into encoded audio bytes.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError>;
}
