//! Content-addressed in-memory blob store.
//!
//! Blob IDs are the hex SHA-256 of the content, so uploading identical
//! bytes twice yields the same ID and stores them once. Fetch recomputes
//! the digest before returning, mirroring the verify-on-read discipline of
//! a real content-addressed store.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use wm_core::{sha256_digest, BlobId};

use crate::error::StorageError;
use crate::store::BlobStore;

/// Thread-safe in-memory store. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    blobs: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryBlobStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct blobs held.
    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.blobs.read().is_empty()
    }

    /// Store synchronously. See [`BlobStore::upload`].
    pub fn put(&self, bytes: Vec<u8>) -> Result<BlobId, StorageError> {
        let hex = sha256_digest(&bytes).to_hex();
        let blob_id = BlobId::new(hex.clone()).map_err(|e| StorageError::Deserialization {
            endpoint: "memory upload".into(),
            reason: e.to_string(),
        })?;
        self.blobs.write().entry(hex).or_insert(bytes);
        Ok(blob_id)
    }

    /// Fetch synchronously. See [`BlobStore::fetch`].
    pub fn get(&self, blob_id: &BlobId) -> Result<Vec<u8>, StorageError> {
        let bytes = self
            .blobs
            .read()
            .get(blob_id.as_str())
            .cloned()
            .ok_or_else(|| StorageError::NotFound(blob_id.clone()))?;
        if sha256_digest(&bytes).to_hex() != blob_id.as_str() {
            return Err(StorageError::Integrity(blob_id.clone()));
        }
        Ok(bytes)
    }

    #[cfg(test)]
    fn corrupt(&self, blob_id: &BlobId) {
        if let Some(bytes) = self.blobs.write().get_mut(blob_id.as_str()) {
            bytes.push(0);
        }
    }
}

impl BlobStore for MemoryBlobStore {
    async fn upload(&self, bytes: Vec<u8>) -> Result<BlobId, StorageError> {
        self.put(bytes)
    }

    async fn fetch(&self, blob_id: &BlobId) -> Result<Vec<u8>, StorageError> {
        self.get(blob_id)
    }
}
