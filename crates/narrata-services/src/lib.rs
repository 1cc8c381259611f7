//! Narrata Services Layer
//!
//! Clients for the cognitive services the pipeline calls: image description
//! (`vision`) and text-to-speech (`speech`). Each client sits behind a trait
//! so the API crate can swap in stubs for tests.

pub mod speech;
pub mod vision;

pub use speech::{
    AzureSpeechClient, CancellationDetails, ResultReason, SpeechError, SpeechSynthesizer,
    SynthesisResult,
};
pub use vision::{select_best_caption, AzureVisionClient, Caption, ImageDescriber, VisionError};
