use std::sync::Arc;

use narrata_core::StorageConfig;

use crate::{
    AzureBlobStore, BlobStore, MemoryBlobStore, StorageAccount, StorageBackend, StorageError,
    StorageResult,
};

/// Create a blob store based on configuration
pub fn create_blob_store(config: &StorageConfig) -> StorageResult<Arc<dyn BlobStore>> {
    match config.backend {
        StorageBackend::Azure => {
            let connection_string = config.connection_string.as_deref().ok_or_else(|| {
                StorageError::ConfigError(
                    "STORAGE_CONNECTION_STRING not configured".to_string(),
                )
            })?;

            let store = AzureBlobStore::from_connection_string(connection_string)?;
            tracing::info!(
                account = %store.account().account_name(),
                endpoint = %store.account().blob_endpoint(),
                "Using Azure blob storage"
            );
            Ok(Arc::new(store))
        }

        StorageBackend::Memory => {
            let account = match config.connection_string.as_deref() {
                Some(connection_string) => {
                    StorageAccount::from_connection_string(connection_string)?
                }
                None => StorageAccount::development(),
            };
            tracing::warn!(
                account = %account.account_name(),
                "Using in-memory blob storage; signed URLs will not resolve"
            );
            Ok(Arc::new(MemoryBlobStore::new(account)))
        }
    }
}
