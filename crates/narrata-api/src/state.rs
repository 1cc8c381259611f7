//! Application state shared by the handlers.

use std::sync::Arc;

use crate::services::pipeline::ImageToSpeechPipeline;

pub struct AppState {
    pub pipeline: ImageToSpeechPipeline,
    /// Request body limit, reported back when an upload exceeds it.
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(pipeline: ImageToSpeechPipeline, max_upload_bytes: usize) -> Arc<Self> {
        Arc::new(Self {
            pipeline,
            max_upload_bytes,
        })
    }
}
