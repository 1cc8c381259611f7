//! Narrata Core Library
//!
//! This crate provides the configuration, error taxonomy, response models and
//! request validation shared by the storage, service and API crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod identifier;
pub mod models;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use config::{Config, ServerConfig, SpeechConfig, StorageConfig, VisionConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use identifier::{ArtifactId, IdSource, RandomIdSource, SeededIdSource};
pub use storage_types::StorageBackend;
