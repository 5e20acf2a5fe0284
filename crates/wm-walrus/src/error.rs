//! Storage gateway error types.

use wm_core::BlobId;

/// Errors from blob storage.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// HTTP transport error, after retries.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        /// Operation that failed.
        endpoint: String,
        /// Underlying transport error.
        source: reqwest::Error,
    },
    /// The storage service returned a non-2xx status.
    #[error("Walrus {endpoint} returned {status}: {body}")]
    Api {
        /// Operation that failed.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },
    /// No blob with this identifier exists.
    #[error("blob {0} not found")]
    NotFound(BlobId),
    /// The response body did not have the expected shape.
    #[error("failed to deserialize response from {endpoint}: {reason}")]
    Deserialization {
        /// Operation that failed.
        endpoint: String,
        /// What was wrong.
        reason: String,
    },
    /// Stored bytes do not match their content address.
    #[error("integrity check failed for blob {0}")]
    Integrity(BlobId),
    /// The store cannot perform this operation.
    #[error("{0} is not implemented by this store")]
    NotImplemented(&'static str),
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl StorageError {
    /// Whether the blob simply does not exist, as opposed to the store failing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
