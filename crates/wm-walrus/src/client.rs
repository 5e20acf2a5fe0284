//! Typed client for the Walrus publisher and aggregator HTTP APIs.
//!
//! | Method | Service    | Path                         | Operation     |
//! |--------|------------|------------------------------|---------------|
//! | PUT    | publisher  | `/v1/blobs?epochs={n}`       | Store a blob  |
//! | GET    | aggregator | `/v1/blobs/{blobId}`         | Read a blob   |
//!
//! The publisher answers a store request in one of two shapes, depending on
//! whether the content was already certified on-chain. Both carry the blob
//! ID; no other fields are relied upon.

use std::time::Duration;

use serde::Deserialize;
use wm_core::BlobId;

use crate::config::WalrusConfig;
use crate::error::StorageError;
use crate::retry::retry_send;
use crate::store::BlobStore;

// -- Response types matching the publisher schema -----------------------------

/// Body of a successful `PUT /v1/blobs`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StoreResponse {
    /// The blob was registered and certified by this request.
    NewlyCreated {
        /// On-chain blob object.
        #[serde(rename = "blobObject")]
        blob_object: BlobObject,
    },
    /// Identical content was already certified.
    AlreadyCertified {
        /// Existing blob identifier.
        #[serde(rename = "blobId")]
        blob_id: String,
    },
}

/// The Sui object backing a stored blob.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobObject {
    /// Content-derived blob identifier.
    pub blob_id: String,
    /// Object ID on Sui.
    #[serde(default)]
    pub id: Option<String>,
    /// Unencoded size in bytes.
    #[serde(default)]
    pub size: Option<u64>,
}

impl StoreResponse {
    /// The blob identifier, whichever shape the publisher returned.
    pub fn blob_id(&self) -> &str {
        match self {
            Self::NewlyCreated { blob_object } => &blob_object.blob_id,
            Self::AlreadyCertified { blob_id } => blob_id,
        }
    }
}

// -- Client -------------------------------------------------------------------

/// Client for a Walrus publisher/aggregator pair.
#[derive(Debug, Clone)]
pub struct WalrusClient {
    http: reqwest::Client,
    config: WalrusConfig,
}

impl WalrusClient {
    /// Create a client from configuration.
    pub fn new(config: WalrusConfig) -> Result<Self, StorageError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StorageError::Http {
                endpoint: "client build".into(),
                source: e,
            })?;
        Ok(Self { http, config })
    }

    /// Access the configuration.
    pub fn config(&self) -> &WalrusConfig {
        &self.config
    }

    /// Store `bytes` for the configured number of epochs.
    ///
    /// Calls `PUT {publisher}/v1/blobs?epochs={n}`.
    pub async fn store(&self, bytes: Vec<u8>) -> Result<BlobId, StorageError> {
        let endpoint = "PUT /v1/blobs";
        let url = format!(
            "{}/v1/blobs?epochs={}",
            self.config.publisher_url.as_str().trim_end_matches('/'),
            self.config.epochs
        );
        let size = bytes.len();

        let resp = retry_send(endpoint, || self.http.put(&url).body(bytes.clone()).send())
            .await
            .map_err(|e| StorageError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(StorageError::Api {
                endpoint: endpoint.into(),
                status,
                body,
            });
        }

        let parsed: StoreResponse =
            resp.json()
                .await
                .map_err(|e| StorageError::Deserialization {
                    endpoint: endpoint.into(),
                    reason: e.to_string(),
                })?;
        let blob_id =
            BlobId::new(parsed.blob_id()).map_err(|e| StorageError::Deserialization {
                endpoint: endpoint.into(),
                reason: e.to_string(),
            })?;

        tracing::info!(
            blob_id = %blob_id,
            size,
            already_certified = matches!(parsed, StoreResponse::AlreadyCertified { .. }),
            "blob stored"
        );
        Ok(blob_id)
    }

    /// Read a blob's bytes.
    ///
    /// Calls `GET {aggregator}/v1/blobs/{blob_id}`.
    pub async fn read(&self, blob_id: &BlobId) -> Result<Vec<u8>, StorageError> {
        let endpoint = format!("GET /v1/blobs/{blob_id}");
        let url = format!(
            "{}/v1/blobs/{blob_id}",
            self.config.aggregator_url.as_str().trim_end_matches('/')
        );

        let resp = retry_send(&endpoint, || self.http.get(&url).send())
            .await
            .map_err(|e| StorageError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound(blob_id.clone()));
        }

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(StorageError::Api {
                endpoint,
                status,
                body,
            });
        }

        resp.bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| StorageError::Http { endpoint, source: e })
    }
}

impl BlobStore for WalrusClient {
    async fn upload(&self, bytes: Vec<u8>) -> Result<BlobId, StorageError> {
        self.store(bytes).await
    }

    async fn fetch(&self, blob_id: &BlobId) -> Result<Vec<u8>, StorageError> {
        self.read(blob_id).await
    }
}
