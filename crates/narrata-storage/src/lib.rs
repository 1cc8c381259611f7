//! Narrata Storage Library
//!
//! Blob storage gateway for the image-to-speech pipeline: the `BlobStore`
//! trait, an Azure Blob Storage backend speaking the REST API with Shared Key
//! authorization, and an in-memory backend for local development and tests.
//!
//! # Blob layout
//!
//! Blobs live in flat containers (`images`, `audio`) under the request's
//! artifact identifier. Uploads overwrite; nothing is ever deleted here.
//!
//! # Signed URLs
//!
//! Read access is handed out as service SAS URLs (`sp=r`, `sr=b`) signed with
//! the storage account key, so both backends produce URLs of the same shape.

pub mod account;
pub mod azure;
pub mod factory;
pub mod memory;
pub mod sas;
pub(crate) mod shared_key;
pub mod traits;

// Re-export commonly used types
pub use account::StorageAccount;
pub use azure::AzureBlobStore;
pub use factory::create_blob_store;
pub use memory::MemoryBlobStore;
pub use narrata_core::StorageBackend;
pub use traits::{BlobHandle, BlobStore, StorageError, StorageResult};
