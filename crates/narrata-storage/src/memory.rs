//! In-process blob store.
//!
//! Keeps blobs in memory and signs URLs exactly like the Azure backend, against
//! the account it was created with. Used for local development without a
//! storage account and by the API tests.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::account::StorageAccount;
use crate::sas::blob_read_sas;
use crate::traits::{BlobHandle, BlobStore, StorageError, StorageResult};
use crate::StorageBackend;

#[derive(Debug, Clone)]
struct StoredBlob {
    content_type: String,
    data: Vec<u8>,
}

/// Memory-backed `BlobStore`
#[derive(Debug)]
pub struct MemoryBlobStore {
    account: StorageAccount,
    containers: RwLock<HashMap<String, HashMap<String, StoredBlob>>>,
}

impl MemoryBlobStore {
    pub fn new(account: StorageAccount) -> Self {
        Self {
            account,
            containers: RwLock::new(HashMap::new()),
        }
    }

    /// Store signing with the local emulator account.
    pub fn development() -> Self {
        Self::new(StorageAccount::development())
    }

    pub async fn container_exists(&self, container: &str) -> bool {
        self.containers.read().await.contains_key(container)
    }

    /// Content of a stored blob, if any.
    pub async fn get(&self, container: &str, blob_name: &str) -> Option<Vec<u8>> {
        self.containers
            .read()
            .await
            .get(container)
            .and_then(|blobs| blobs.get(blob_name))
            .map(|blob| blob.data.clone())
    }

    /// Content type recorded for a stored blob, if any.
    pub async fn content_type(&self, container: &str, blob_name: &str) -> Option<String> {
        self.containers
            .read()
            .await
            .get(container)
            .and_then(|blobs| blobs.get(blob_name))
            .map(|blob| blob.content_type.clone())
    }

    /// Names of the blobs stored in `container`, sorted.
    pub async fn blob_names(&self, container: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .containers
            .read()
            .await
            .get(container)
            .map(|blobs| blobs.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn ensure_container(&self, container: &str) -> StorageResult<()> {
        if container.is_empty() {
            return Err(StorageError::ContainerFailed(
                "Container name cannot be empty".to_string(),
            ));
        }
        self.containers
            .write()
            .await
            .entry(container.to_string())
            .or_default();
        Ok(())
    }

    async fn upload(
        &self,
        container: &str,
        blob_name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<BlobHandle> {
        self.ensure_container(container).await?;

        let size = data.len();
        self.containers
            .write()
            .await
            .entry(container.to_string())
            .or_default()
            .insert(
                blob_name.to_string(),
                StoredBlob {
                    content_type: content_type.to_string(),
                    data,
                },
            );

        tracing::debug!(
            container = %container,
            blob = %blob_name,
            size_bytes = size,
            "Blob stored in memory"
        );

        Ok(BlobHandle {
            container: container.to_string(),
            blob_name: blob_name.to_string(),
            url: self.account.blob_url(container, blob_name),
        })
    }

    fn signed_read_url(&self, blob: &BlobHandle, validity: Duration) -> StorageResult<String> {
        let validity = chrono::Duration::from_std(validity)
            .map_err(|e| StorageError::SigningFailed(format!("Invalid validity: {}", e)))?;
        let sas = blob_read_sas(
            &self.account,
            &blob.container,
            &blob.blob_name,
            Utc::now() + validity,
        )?;
        Ok(format!("{}?{}", blob.url, sas))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ensure_container_is_idempotent() {
        let store = MemoryBlobStore::development();
        store.ensure_container("images").await.unwrap();
        store.ensure_container("images").await.unwrap();
        assert!(store.container_exists("images").await);
    }

    #[tokio::test]
    async fn test_upload_creates_container_and_overwrites() {
        let store = MemoryBlobStore::development();

        store.upload("images", "abc", "image/png", vec![1]).await.unwrap();
        store.upload("images", "abc", "image/jpeg", vec![2, 3]).await.unwrap();

        assert!(store.container_exists("images").await);
        assert_eq!(store.get("images", "abc").await, Some(vec![2, 3]));
        assert_eq!(store.content_type("images", "abc").await.as_deref(), Some("image/jpeg"));
        assert_eq!(store.blob_names("images").await, vec!["abc".to_string()]);
    }

    #[tokio::test]
    async fn test_upload_and_sign_returns_signed_url() {
        let store = MemoryBlobStore::development();
        let url = store
            .upload_and_sign("audio", "abc.wav", "audio/wav", vec![0; 4], Duration::from_secs(600))
            .await
            .unwrap();

        assert!(url.starts_with("http://127.0.0.1:10000/devstoreaccount1/audio/abc.wav?"));
        assert!(url.contains("sp=r"));
        assert!(url.contains("&sig="));
    }

    #[tokio::test]
    async fn test_empty_container_name_is_rejected() {
        let store = MemoryBlobStore::development();
        assert!(store.upload("", "abc", "image/png", vec![1]).await.is_err());
    }
}
