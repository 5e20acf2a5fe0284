//! # wm-walrus — Storage Gateway for Evidence Blobs
//!
//! Evidence documents, public or encrypted, are stored as opaque blobs and
//! referenced from market records by blob ID. This crate provides the
//! [`BlobStore`] contract and its implementations:
//!
//! - [`WalrusClient`] — the Walrus publisher (write) and aggregator (read)
//!   HTTP APIs. Transport failures are retried with exponential backoff;
//!   HTTP status errors are not.
//! - [`MemoryBlobStore`] — SHA-256 content-addressed, process-local.
//! - [`PlaceholderStore`] — returns fabricated `mock-blob-id-*` IDs and
//!   cannot fetch. Kept for flows that must run without a storage node.
//! - [`AnyBlobStore`] — runtime selection between the above.
//!
//! ## Example
//!
//! ```ignore
//! use wm_walrus::{BlobStore, WalrusClient, WalrusConfig};
//!
//! let client = WalrusClient::new(WalrusConfig::from_env()?)?;
//! let id = client.upload(evidence_json.into_bytes()).await?;
//! let bytes = client.fetch(&id).await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod memory;
pub mod placeholder;
pub(crate) mod retry;
pub mod store;

pub use client::{StoreResponse, WalrusClient};
pub use config::{ConfigError, WalrusConfig};
pub use error::StorageError;
pub use memory::MemoryBlobStore;
pub use placeholder::{PlaceholderStore, PLACEHOLDER_PREFIX};
pub use store::{AnyBlobStore, BlobStore};
