//! Image description
//!
//! `ImageDescriber` turns a readable image URL into a single caption. The
//! Azure implementation lives in [`azure`].

pub mod azure;

use async_trait::async_trait;
use narrata_core::AppError;
use serde::Deserialize;
use thiserror::Error;

pub use azure::AzureVisionClient;

/// Image description errors
#[derive(Debug, Error)]
pub enum VisionError {
    #[error("Vision request failed: {0}")]
    Request(String),

    #[error("Vision API returned {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Invalid vision response: {0}")]
    InvalidResponse(String),

    #[error("No results from computer vision API")]
    NoCaptions,
}

impl From<VisionError> for AppError {
    fn from(err: VisionError) -> Self {
        match err {
            VisionError::NoCaptions => AppError::NoDescription,
            other => AppError::Upstream(other.to_string()),
        }
    }
}

/// A candidate description with the service's confidence in it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Caption {
    pub text: String,
    pub confidence: f64,
}

#[async_trait]
pub trait ImageDescriber: Send + Sync {
    /// Describe the image at `image_url`, returning the best caption's text.
    async fn describe(&self, image_url: &str) -> Result<String, VisionError>;
}

/// Highest-confidence caption. Ties keep the earliest candidate.
pub fn select_best_caption(captions: &[Caption]) -> Option<&Caption> {
    captions.iter().reduce(|best, candidate| {
        if candidate.confidence > best.confidence {
            candidate
        } else {
            best
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caption(text: &str, confidence: f64) -> Caption {
        Caption {
            text: text.to_string(),
            confidence,
        }
    }

    #[test]
    fn test_selects_highest_confidence() {
        let captions = vec![caption("a cat", 0.7), caption("a dog", 0.95)];
        assert_eq!(select_best_caption(&captions).unwrap().text, "a dog");
    }

    #[test]
    fn test_tie_keeps_first() {
        let captions = vec![
            caption("first", 0.8),
            caption("second", 0.8),
            caption("low", 0.1),
        ];
        assert_eq!(select_best_caption(&captions).unwrap().text, "first");
    }

    #[test]
    fn test_error_conversion() {
        assert!(matches!(AppError::from(VisionError::NoCaptions), AppError::NoDescription));
        assert!(matches!(
            AppError::from(VisionError::Request("timed out".to_string())),
            AppError::Upstream(_)
        ));
    }

    #[test]
    fn test_empty_has_no_caption() {
        assert!(select_best_caption(&[]).is_none());
    }
}
