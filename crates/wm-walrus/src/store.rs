//! The upload/fetch contract every blob store implements.

use std::future::Future;

use wm_core::BlobId;

use crate::client::WalrusClient;
use crate::error::StorageError;
use crate::memory::MemoryBlobStore;
use crate::placeholder::PlaceholderStore;

/// Durable storage for opaque blobs.
///
/// `upload` returns an identifier that `fetch` accepts. Stores are free to
/// return the same identifier for identical content.
pub trait BlobStore: Send + Sync {
    /// Store `bytes` and return their identifier.
    fn upload(&self, bytes: Vec<u8>) -> impl Future<Output = Result<BlobId, StorageError>> + Send;

    /// Retrieve the bytes stored under `blob_id`.
    fn fetch(&self, blob_id: &BlobId)
        -> impl Future<Output = Result<Vec<u8>, StorageError>> + Send;
}

/// A store chosen at runtime.
#[derive(Debug, Clone)]
pub enum AnyBlobStore {
    /// Walrus over HTTP.
    Walrus(WalrusClient),
    /// Process-local, content-addressed.
    Memory(MemoryBlobStore),
    /// Fabricates identifiers; cannot fetch.
    Placeholder(PlaceholderStore),
}

impl AnyBlobStore {
    /// Short name of the active backend, for logs and health output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Walrus(_) => "walrus",
            Self::Memory(_) => "memory",
            Self::Placeholder(_) => "placeholder",
        }
    }
}

impl BlobStore for AnyBlobStore {
    async fn upload(&self, bytes: Vec<u8>) -> Result<BlobId, StorageError> {
        match self {
            Self::Walrus(s) => s.upload(bytes).await,
            Self::Memory(s) => s.upload(bytes).await,
            Self::Placeholder(s) => s.upload(bytes).await,
        }
    }

    async fn fetch(&self, blob_id: &BlobId) -> Result<Vec<u8>, StorageError> {
        match self {
            Self::Walrus(s) => s.fetch(blob_id).await,
            Self::Memory(s) => s.fetch(blob_id).await,
            Self::Placeholder(s) => s.fetch(blob_id).await,
        }
    }
}

impl From<WalrusClient> for AnyBlobStore {
    fn from(client: WalrusClient) -> Self {
        Self::Walrus(client)
    }
}

impl From<MemoryBlobStore> for AnyBlobStore {
    fn from(store: MemoryBlobStore) -> Self {
        Self::Memory(store)
    }
}

impl From<PlaceholderStore> for AnyBlobStore {
    fn from(store: PlaceholderStore) -> Self {
        Self::Placeholder(store)
    }
}
