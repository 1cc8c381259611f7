//! Azure Speech text-to-speech REST client

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use narrata_core::SpeechConfig;

use super::ssml::build_ssml;
use super::{ResultReason, SpeechError, SpeechSynthesizer, SynthesisResult};

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const OUTPUT_FORMAT_HEADER: &str = "X-Microsoft-OutputFormat";
const SSML_CONTENT_TYPE: &str = "application/ssml+xml";
const USER_AGENT: &str = "narrata";

pub struct AzureSpeechClient {
    http_client: reqwest::Client,
    synthesis_url: String,
    api_key: String,
    voice: String,
    language: String,
    output_format: String,
}

impl Debug for AzureSpeechClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("AzureSpeechClient")
            .field("synthesis_url", &self.synthesis_url)
            .field("voice", &self.voice)
            .field("output_format", &self.output_format)
            .finish()
    }
}

impl AzureSpeechClient {
    pub fn new(config: &SpeechConfig) -> Result<Self, SpeechError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| SpeechError::Client(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            synthesis_url: config.synthesis_url(),
            api_key: config.api_key.clone(),
            voice: config.voice.clone(),
            language: config.language.clone(),
            output_format: config.output_format.clone(),
        })
    }

    /// Run one synthesis attempt. Failures of any kind come back as a
    /// canceled result rather than an error.
    pub async fn speak_text(&self, text: &str) -> SynthesisResult {
        let ssml = build_ssml(&self.language, &self.voice, text);
        let start = Instant::now();

        let response = match self
            .http_client
            .post(&self.synthesis_url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
            .header(OUTPUT_FORMAT_HEADER, &self.output_format)
            .header(reqwest::header::CONTENT_TYPE, SSML_CONTENT_TYPE)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .body(ssml)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return SynthesisResult::canceled(None, e.to_string()),
        };

        let status = response.status();
        if !status.is_success() {
            let details = response
                .text()
                .await
                .ok()
                .filter(|body| !body.trim().is_empty())
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("Unknown error")
                        .to_string()
                });
            return SynthesisResult::canceled(Some(status.as_u16()), details);
        }

        let audio = match response.bytes().await {
            Ok(audio) => audio.to_vec(),
            Err(e) => return SynthesisResult::canceled(Some(status.as_u16()), e.to_string()),
        };

        if audio.is_empty() {
            return SynthesisResult::canceled(Some(status.as_u16()), "Service returned no audio");
        }

        tracing::debug!(
            size_bytes = audio.len(),
            duration_ms = start.elapsed().as_millis(),
            "Speech synthesis completed"
        );

        SynthesisResult::completed(audio)
    }
}

#[async_trait]
impl SpeechSynthesizer for AzureSpeechClient {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        let result = self.speak_text(text).await;
        if let ResultReason::Canceled(ref details) = result.reason {
            tracing::warn!(
                status = ?details.status,
                error_details = %details.error_details,
                "Speech synthesis canceled"
            );
        }
        result.into_audio(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::CancellationDetails;

    fn config(endpoint: String) -> SpeechConfig {
        SpeechConfig {
            api_key: "speech-key".to_string(),
            region: "westeurope".to_string(),
            endpoint: Some(endpoint),
            voice: "en-US-JennyNeural".to_string(),
            language: "en-US".to_string(),
            output_format: "riff-16khz-16bit-mono-pcm".to_string(),
        }
    }

    #[tokio::test]
    async fn test_synthesize_posts_ssml() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/cognitiveservices/v1")
            .match_header("Ocp-Apim-Subscription-Key", "speech-key")
            .match_header("X-Microsoft-OutputFormat", "riff-16khz-16bit-mono-pcm")
            .match_header("content-type", "application/ssml+xml")
            .match_body(
                "<speak version='1.0' xml:lang='en-US'><voice name='en-US-JennyNeural'>a dog &amp; a cat</voice></speak>",
            )
            .with_status(200)
            .with_header("content-type", "audio/x-wav")
            .with_body("RIFF....WAVE")
            .create_async()
            .await;

        let client = AzureSpeechClient::new(&config(format!(
            "{}/cognitiveservices/v1",
            server.url()
        )))
        .unwrap();
        let audio = client.synthesize("a dog & a cat").await.unwrap();

        assert_eq!(audio, b"RIFF....WAVE".to_vec());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rejected_request_is_canceled() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/cognitiveservices/v1")
            .with_status(401)
            .create_async()
            .await;

        let client = AzureSpeechClient::new(&config(format!(
            "{}/cognitiveservices/v1",
            server.url()
        )))
        .unwrap();
        let result = client.speak_text("hello").await;

        match result.reason {
            ResultReason::Canceled(details) => {
                assert_eq!(details.status, Some(401));
                assert_eq!(details.error_details, "Unauthorized");
            }
            other => panic!("unexpected reason: {:?}", other),
        }
        assert!(result.audio_data.is_empty());
    }

    #[tokio::test]
    async fn test_empty_audio_is_not_completed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/cognitiveservices/v1")
            .with_status(200)
            .create_async()
            .await;

        let client = AzureSpeechClient::new(&config(format!(
            "{}/cognitiveservices/v1",
            server.url()
        )))
        .unwrap();
        let err = client.synthesize("hello").await.unwrap_err();

        assert!(matches!(
            err,
            SpeechError::NotCompleted { ref text, .. } if text == "hello"
        ));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_canceled() {
        let client = AzureSpeechClient::new(&config(
            "http://127.0.0.1:1/cognitiveservices/v1".to_string(),
        ))
        .unwrap();
        let result = client.speak_text("hello").await;

        assert!(matches!(
            result.reason,
            ResultReason::Canceled(CancellationDetails { status: None, .. })
        ));
    }
}
