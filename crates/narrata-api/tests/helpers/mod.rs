//! Test application wiring: the real router over an in-memory blob store and
//! scripted vision/speech stubs.

#![allow(dead_code)]

pub mod fixtures;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum_test::TestServer;
use narrata_api::setup::routes;
use narrata_api::{AppState, ImageToSpeechPipeline};
use narrata_core::config::LogFormat;
use narrata_core::{SeededIdSource, ServerConfig};
use narrata_services::{
    select_best_caption, Caption, ImageDescriber, SpeechError, SpeechSynthesizer,
    SynthesisResult, VisionError,
};
use narrata_storage::{
    BlobHandle, BlobStore, MemoryBlobStore, StorageBackend, StorageError, StorageResult,
};

pub const MAX_UPLOAD_BYTES: usize = 64 * 1024;

/// Describer returning the best of a fixed caption list.
pub struct StubDescriber {
    captions: Vec<Caption>,
    pub requested_urls: Mutex<Vec<String>>,
}

impl StubDescriber {
    pub fn new(captions: &[(&str, f64)]) -> Self {
        Self {
            captions: captions
                .iter()
                .map(|(text, confidence)| Caption {
                    text: text.to_string(),
                    confidence: *confidence,
                })
                .collect(),
            requested_urls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ImageDescriber for StubDescriber {
    async fn describe(&self, image_url: &str) -> Result<String, VisionError> {
        self.requested_urls
            .lock()
            .unwrap()
            .push(image_url.to_string());
        select_best_caption(&self.captions)
            .map(|caption| caption.text.clone())
            .ok_or(VisionError::NoCaptions)
    }
}

/// Synthesizer that either returns fixed audio or cancels with a reason.
pub struct StubSynthesizer {
    outcome: Result<Vec<u8>, String>,
    pub texts: Mutex<Vec<String>>,
}

impl StubSynthesizer {
    pub fn completing(audio: &[u8]) -> Self {
        Self {
            outcome: Ok(audio.to_vec()),
            texts: Mutex::new(Vec::new()),
        }
    }

    pub fn canceling(details: &str) -> Self {
        Self {
            outcome: Err(details.to_string()),
            texts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for StubSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        self.texts.lock().unwrap().push(text.to_string());
        let result = match self.outcome {
            Ok(ref audio) => SynthesisResult::completed(audio.clone()),
            Err(ref details) => SynthesisResult::canceled(None, details.clone()),
        };
        result.into_audio(text)
    }
}

/// Store whose account rejects every request, like a revoked key.
pub struct RejectingStore;

#[async_trait]
impl BlobStore for RejectingStore {
    async fn ensure_container(&self, container: &str) -> StorageResult<()> {
        Err(StorageError::ContainerFailed(format!(
            "{}: 403 Forbidden (AuthenticationFailed)",
            container
        )))
    }

    async fn upload(
        &self,
        container: &str,
        blob_name: &str,
        _content_type: &str,
        _data: Vec<u8>,
    ) -> StorageResult<BlobHandle> {
        self.ensure_container(container).await?;
        Err(StorageError::UploadFailed(format!(
            "{}/{}: 403 Forbidden (AuthenticationFailed)",
            container, blob_name
        )))
    }

    fn signed_read_url(&self, _blob: &BlobHandle, _validity: Duration) -> StorageResult<String> {
        Err(StorageError::SigningFailed("no account key".to_string()))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Azure
    }
}

/// Test application state
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<MemoryBlobStore>,
    pub describer: Arc<StubDescriber>,
    pub synthesizer: Arc<StubSynthesizer>,
}

impl TestApp {
    /// Get the HTTP test client
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn test_server_config() -> ServerConfig {
    ServerConfig {
        port: 0,
        environment: "test".to_string(),
        cors_origins: vec!["*".to_string()],
        max_upload_bytes: MAX_UPLOAD_BYTES,
        concurrency_limit: 16,
        log_format: LogFormat::Compact,
    }
}

/// Serve the real router over the given collaborators
pub fn test_server(
    store: Arc<dyn BlobStore>,
    describer: Arc<dyn ImageDescriber>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
) -> TestServer {
    let pipeline = ImageToSpeechPipeline::new(
        store,
        describer,
        synthesizer,
        Arc::new(SeededIdSource::new(42)),
    );
    let config = test_server_config();
    let state = AppState::new(pipeline, config.max_upload_bytes);

    let app = routes::setup_routes(&config, state).expect("Failed to setup routes");
    TestServer::new(app.into_make_service()).expect("Failed to create test server")
}

/// Setup a test application around the given stubs
pub fn setup_test_app(describer: StubDescriber, synthesizer: StubSynthesizer) -> TestApp {
    let store = Arc::new(MemoryBlobStore::development());
    let describer = Arc::new(describer);
    let synthesizer = Arc::new(synthesizer);

    let server = test_server(store.clone(), describer.clone(), synthesizer.clone());

    TestApp {
        server,
        store,
        describer,
        synthesizer,
    }
}

/// App whose vision stub sees one caption and whose speech stub completes.
pub fn setup_default_test_app() -> TestApp {
    setup_test_app(
        StubDescriber::new(&[("a dog running on a beach", 0.93)]),
        StubSynthesizer::completing(fixtures::WAV_BYTES),
    )
}
