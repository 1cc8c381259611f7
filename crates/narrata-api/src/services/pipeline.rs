//! Image-to-speech orchestration
//!
//! One run per request, strictly in sequence: validate the filename, store the
//! image, describe it, synthesize the description, store the audio. The first
//! failing step ends the run; nothing already stored is rolled back.

use std::sync::Arc;
use std::time::{Duration, Instant};

use narrata_core::constants::{
    AUDIO_CONTAINER, AUDIO_CONTENT_TYPE, IMAGES_CONTAINER, SIGNED_URL_VALIDITY,
};
use narrata_core::validation::validate_image_filename;
use narrata_core::{AppError, IdSource};
use narrata_services::{ImageDescriber, SpeechSynthesizer};
use narrata_storage::BlobStore;

/// The attached file of a request.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

pub struct ImageToSpeechPipeline {
    store: Arc<dyn BlobStore>,
    describer: Arc<dyn ImageDescriber>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    ids: Arc<dyn IdSource>,
    url_validity: Duration,
}

impl ImageToSpeechPipeline {
    pub fn new(
        store: Arc<dyn BlobStore>,
        describer: Arc<dyn ImageDescriber>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        ids: Arc<dyn IdSource>,
    ) -> Self {
        Self {
            store,
            describer,
            synthesizer,
            ids,
            url_validity: SIGNED_URL_VALIDITY,
        }
    }

    /// Run the pipeline and return the signed URL of the narration.
    pub async fn run(&self, image: UploadedImage) -> Result<String, AppError> {
        let start = Instant::now();
        validate_image_filename(&image.filename)?;

        let id = self.ids.next_id();
        tracing::debug!(artifact_id = %id, filename = %image.filename, "Processing upload");

        let image_url = self
            .store
            .upload_and_sign(
                IMAGES_CONTAINER,
                &id.image_blob_name(),
                &image.content_type,
                image.data,
                self.url_validity,
            )
            .await?;

        let description = self.describer.describe(&image_url).await?;
        tracing::info!(artifact_id = %id, description = %description, "Image described");

        let audio = self.synthesizer.synthesize(&description).await?;
        tracing::info!(artifact_id = %id, size_bytes = audio.len(), "Audio synthesized");

        let audio_url = self
            .store
            .upload_and_sign(
                AUDIO_CONTAINER,
                &id.audio_blob_name(),
                AUDIO_CONTENT_TYPE,
                audio,
                self.url_validity,
            )
            .await?;

        tracing::info!(
            artifact_id = %id,
            duration_ms = start.elapsed().as_millis(),
            "Narration ready"
        );

        Ok(audio_url)
    }
}
