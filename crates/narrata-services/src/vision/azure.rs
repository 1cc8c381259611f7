//! Azure Computer Vision `describe` client

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use async_trait::async_trait;
use narrata_core::VisionConfig;
use serde::Deserialize;
use serde_json::json;

use super::{select_best_caption, Caption, ImageDescriber, VisionError};

const DESCRIBE_PATH: &str = "/vision/v3.2/describe";

#[derive(Debug, Deserialize)]
struct DescribeResponse {
    description: Option<ImageDescription>,
}

#[derive(Debug, Deserialize)]
struct ImageDescription {
    #[serde(default)]
    captions: Vec<Caption>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ServiceError,
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// Computer Vision client
pub struct AzureVisionClient {
    http_client: reqwest::Client,
    describe_url: String,
    api_key: String,
    language: String,
    max_candidates: u32,
}

impl Debug for AzureVisionClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("AzureVisionClient")
            .field("describe_url", &self.describe_url)
            .field("language", &self.language)
            .field("max_candidates", &self.max_candidates)
            .finish()
    }
}

impl AzureVisionClient {
    pub fn new(config: &VisionConfig) -> Result<Self, VisionError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| VisionError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            describe_url: format!("{}{}", config.endpoint.trim_end_matches('/'), DESCRIBE_PATH),
            api_key: config.api_key.clone(),
            language: config.language.clone(),
            max_candidates: config.max_candidates,
        })
    }

    /// Call `describe` and return every candidate caption in service order.
    pub async fn describe_image(&self, image_url: &str) -> Result<Vec<Caption>, VisionError> {
        let max_candidates = self.max_candidates.to_string();
        let response = self
            .http_client
            .post(&self.describe_url)
            .query(&[
                ("maxCandidates", max_candidates.as_str()),
                ("language", self.language.as_str()),
            ])
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .json(&json!({ "url": image_url }))
            .send()
            .await
            .map_err(|e| VisionError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| VisionError::Request(e.to_string()))?;

        if !status.is_success() {
            let (code, message) = match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(parsed) => (parsed.error.code, parsed.error.message),
                Err(_) => (String::new(), body),
            };
            return Err(VisionError::Api {
                status: status.as_u16(),
                code,
                message,
            });
        }

        let parsed: DescribeResponse = serde_json::from_str(&body)
            .map_err(|e| VisionError::InvalidResponse(e.to_string()))?;

        Ok(parsed
            .description
            .map(|description| description.captions)
            .unwrap_or_default())
    }
}

#[async_trait]
impl ImageDescriber for AzureVisionClient {
    async fn describe(&self, image_url: &str) -> Result<String, VisionError> {
        let captions = self.describe_image(image_url).await?;
        let best = select_best_caption(&captions).ok_or(VisionError::NoCaptions)?;

        tracing::info!(
            description = %best.text,
            confidence = best.confidence,
            candidates = captions.len(),
            "Got image description"
        );

        Ok(best.text.clone())
    }
}
