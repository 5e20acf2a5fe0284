//! # Encryption Gateway Errors
//!
//! Encryption and decryption failures are kept in separate enums so callers
//! can tell a publishing problem (threshold unmet, bad config) from an
//! access problem (expired session, policy denied, tampered ciphertext).
//! Nothing here is retried by the gateway.

use thiserror::Error;

/// Errors from the encryption gateway.
#[derive(Error, Debug)]
pub enum SealError {
    /// Encrypting a payload failed.
    #[error("encryption failed: {0}")]
    Encryption(#[from] EncryptionError),

    /// Decrypting a payload failed.
    #[error("decryption failed: {0}")]
    Decryption(#[from] DecryptionError),

    /// The client configuration is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Failures while encrypting.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EncryptionError {
    /// Threshold must be at least 1.
    #[error("threshold must be at least 1")]
    ZeroThreshold,

    /// Threshold exceeds the total weight of configured key servers.
    #[error("threshold {threshold} exceeds total key server weight {total_weight}")]
    ThresholdUnmet {
        /// Requested threshold.
        threshold: u8,
        /// Sum of configured server weights.
        total_weight: usize,
    },

    /// A configured key server is not reachable from this client.
    #[error("key server {0} is unreachable")]
    ServerUnreachable(String),

    /// The AEAD primitive rejected the input.
    #[error("cipher failure: {0}")]
    Cipher(String),
}

/// Failures while decrypting.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DecryptionError {
    /// The session certificate or request signature does not verify.
    #[error("invalid session credential: {0}")]
    InvalidCredential(String),

    /// The session key's time-to-live has elapsed.
    #[error("session key expired at {0}")]
    SessionExpired(String),

    /// The session key was issued for a different package.
    #[error("session key is for package {session}, ciphertext is for {ciphertext}")]
    PackageMismatch {
        /// Package in the session certificate.
        session: String,
        /// Package in the encrypted object.
        ciphertext: String,
    },

    /// Fewer key-server shares were released than the threshold requires.
    #[error("policy check failed: {released} of {threshold} required shares released")]
    PolicyDenied {
        /// Shares released by approving servers.
        released: usize,
        /// Shares required.
        threshold: u8,
    },

    /// A key server did not answer.
    #[error("key server {0} is unavailable")]
    ServerUnavailable(String),

    /// The ciphertext envelope could not be parsed.
    #[error("malformed ciphertext: {0}")]
    MalformedCiphertext(String),

    /// The ciphertext failed authentication (tampered or wrong key).
    #[error("ciphertext authentication failed")]
    AuthenticationFailed,
}

/// Invalid key-server or client configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// No key servers configured.
    #[error("at least one key server must be configured")]
    NoServers,

    /// A server weight of zero contributes nothing and is rejected.
    #[error("key server {0} has zero weight")]
    ZeroWeight(String),

    /// Total weight exceeds the 255 shares the scheme supports.
    #[error("total key server weight {0} exceeds 255")]
    WeightOverflow(usize),

    /// The same object ID appears twice.
    #[error("duplicate key server {0}")]
    DuplicateServer(String),

    /// Verification is on and a configured object ID has no known server.
    #[error("key server {0} failed verification: not a registered key server")]
    UnknownKeyServer(String),

    /// An API key was given without its header name, or vice versa.
    #[error("key server {0}: api_key and api_key_name must be set together")]
    PartialApiKey(String),

    /// Session time-to-live out of range.
    #[error("session TTL must be between 1 and {max} minutes, got {got}")]
    InvalidTtl {
        /// Requested TTL.
        got: u16,
        /// Maximum TTL.
        max: u16,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_denied_reports_counts() {
        let err = SealError::from(DecryptionError::PolicyDenied {
            released: 1,
            threshold: 2,
        });
        let msg = err.to_string();
        assert!(msg.contains("decryption failed"));
        assert!(msg.contains("1 of 2"));
    }

    #[test]
    fn threshold_unmet_reports_weight() {
        let err = EncryptionError::ThresholdUnmet {
            threshold: 4,
            total_weight: 3,
        };
        assert!(err.to_string().contains("exceeds total key server weight 3"));
    }

    #[test]
    fn config_error_wraps() {
        let err: SealError = ConfigError::NoServers.into();
        assert!(matches!(err, SealError::Config(ConfigError::NoServers)));
    }
}
