//! Blob storage abstraction
//!
//! This module defines the `BlobStore` trait that all storage backends implement.

use std::time::Duration;

use async_trait::async_trait;
use narrata_core::AppError;
use thiserror::Error;

use crate::StorageBackend;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Create container failed: {0}")]
    ContainerFailed(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ConfigError(msg) => AppError::Internal(msg),
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Reference to a stored blob, returned by `upload`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobHandle {
    pub container: String,
    pub blob_name: String,
    /// Unsigned URL of the blob
    pub url: String,
}

/// Blob storage abstraction
///
/// Backends must treat `ensure_container` as idempotent and `upload` as an
/// overwrite of any blob already stored under the same name.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Create the container unless it already exists.
    async fn ensure_container(&self, container: &str) -> StorageResult<()>;

    /// Ensure the container exists, then write `data` under `blob_name`.
    async fn upload(
        &self,
        container: &str,
        blob_name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<BlobHandle>;

    /// Read-only URL for `blob`, expiring `validity` after now.
    fn signed_read_url(&self, blob: &BlobHandle, validity: Duration) -> StorageResult<String>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;

    /// Upload, then sign a read URL for the stored blob.
    async fn upload_and_sign(
        &self,
        container: &str,
        blob_name: &str,
        content_type: &str,
        data: Vec<u8>,
        validity: Duration,
    ) -> StorageResult<String> {
        let handle = self.upload(container, blob_name, content_type, data).await?;
        self.signed_read_url(&handle, validity)
    }
}
