//! Sui RPC error types.

/// Errors from Sui JSON-RPC calls.
#[derive(Debug, thiserror::Error)]
pub enum SuiRpcError {
    /// HTTP transport error.
    #[error("HTTP error calling {method}: {source}")]
    Http {
        /// JSON-RPC method.
        method: String,
        /// Underlying transport error.
        source: reqwest::Error,
    },
    /// The fullnode answered with a non-2xx status.
    #[error("{method} returned HTTP {status}: {body}")]
    Status {
        /// JSON-RPC method.
        method: String,
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },
    /// The fullnode returned a JSON-RPC error object.
    #[error("{method} failed with RPC error {code}: {message}")]
    Rpc {
        /// JSON-RPC method.
        method: String,
        /// JSON-RPC error code.
        code: i64,
        /// Error message.
        message: String,
    },
    /// The result did not have the expected shape.
    #[error("failed to decode {method} result: {reason}")]
    Decode {
        /// JSON-RPC method.
        method: String,
        /// What was wrong.
        reason: String,
    },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}
