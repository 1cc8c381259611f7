//! Narrata API Library
//!
//! HTTP surface of the image-to-speech pipeline: the multipart handler, the
//! error envelope, routing, telemetry and server setup.

mod api_doc;
pub mod constants;
mod handlers;
pub mod services;
pub mod setup;
mod telemetry;

pub mod error;
pub mod state;

// Re-exports
pub use error::HttpAppError;
pub use services::pipeline::{ImageToSpeechPipeline, UploadedImage};
pub use state::AppState;
