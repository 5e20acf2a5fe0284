//! A store that only pretends to upload.
//!
//! Useful for wiring up a publisher flow before a storage node is
//! available. Every upload returns a fresh `mock-blob-id-*` identifier and
//! stores nothing, so fetch can never succeed.

use uuid::Uuid;
use wm_core::BlobId;

use crate::error::StorageError;
use crate::store::BlobStore;

/// Prefix of every fabricated identifier.
pub const PLACEHOLDER_PREFIX: &str = "mock-blob-id-";

/// Fabricates blob identifiers without network I/O.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderStore;

impl PlaceholderStore {
    /// Whether `blob_id` was fabricated by a placeholder store.
    pub fn is_placeholder(blob_id: &BlobId) -> bool {
        blob_id.as_str().starts_with(PLACEHOLDER_PREFIX)
    }
}

impl BlobStore for PlaceholderStore {
    async fn upload(&self, bytes: Vec<u8>) -> Result<BlobId, StorageError> {
        let raw = format!("{PLACEHOLDER_PREFIX}{}", Uuid::new_v4().simple());
        tracing::warn!(
            blob_id = %raw,
            bytes = bytes.len(),
            "placeholder store: blob was not persisted"
        );
        BlobId::new(raw).map_err(|e| StorageError::Deserialization {
            endpoint: "placeholder upload".into(),
            reason: e.to_string(),
        })
    }

    async fn fetch(&self, _blob_id: &BlobId) -> Result<Vec<u8>, StorageError> {
        Err(StorageError::NotImplemented("fetch"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upload_never_repeats_ids() {
        let store = PlaceholderStore;
        let a = store.upload(b"same".to_vec()).await.unwrap();
        let b = store.upload(b"same".to_vec()).await.unwrap();
        assert_ne!(a, b);
        assert!(PlaceholderStore::is_placeholder(&a));
        assert!(a.as_str().starts_with("mock-blob-id-"));
    }

    #[tokio::test]
    async fn fetch_is_not_implemented() {
        let store = PlaceholderStore;
        let id = store.upload(vec![1, 2, 3]).await.unwrap();
        assert!(matches!(
            store.fetch(&id).await,
            Err(StorageError::NotImplemented("fetch"))
        ));
    }
}
