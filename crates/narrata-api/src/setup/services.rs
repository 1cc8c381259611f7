//! Client and pipeline construction

use std::sync::Arc;

use anyhow::{Context, Result};
use narrata_core::{Config, RandomIdSource};
use narrata_services::{AzureSpeechClient, AzureVisionClient};
use narrata_storage::create_blob_store;

use crate::services::pipeline::ImageToSpeechPipeline;

/// Build the pipeline with the configured storage backend and Azure clients.
pub fn initialize_pipeline(config: &Config) -> Result<ImageToSpeechPipeline> {
    let store = create_blob_store(&config.storage).context("Failed to initialize blob storage")?;

    let describer =
        AzureVisionClient::new(&config.vision).context("Failed to initialize vision client")?;
    tracing::info!(
        endpoint = %config.vision.endpoint,
        language = %config.vision.language,
        max_candidates = config.vision.max_candidates,
        "Vision client ready"
    );

    let synthesizer =
        AzureSpeechClient::new(&config.speech).context("Failed to initialize speech client")?;
    tracing::info!(
        url = %config.speech.synthesis_url(),
        voice = %config.speech.voice,
        output_format = %config.speech.output_format,
        "Speech client ready"
    );

    Ok(ImageToSpeechPipeline::new(
        store,
        Arc::new(describer),
        Arc::new(synthesizer),
        Arc::new(RandomIdSource),
    ))
}
