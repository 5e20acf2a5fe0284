//! # Error Hierarchy
//!
//! Structured error types shared across the evidence stack, built with
//! `thiserror`. Subsystem crates (`wm-seal`, `wm-walrus`, `wm-sui`) define
//! their own error enums and wrap [`ValidationError`] where identifiers or
//! amounts fail to parse.

use thiserror::Error;

/// Top-level error type for foundational operations.
#[derive(Error, Debug)]
pub enum WmError {
    /// Domain primitive validation failure.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Cryptographic operation failure.
    #[error("cryptographic error: {0}")]
    Cryptographic(String),

    /// Content did not match its digest.
    #[error("integrity error: {0}")]
    Integrity(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validation errors for domain primitives and user-submitted intents.
///
/// Each variant carries the rejected input (where there is one) so the
/// message can be shown to the user without further context.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Sui address is not `0x` followed by 1–64 hex characters.
    #[error("invalid Sui address: \"{0}\" (expected 0x followed by up to 64 hex characters)")]
    InvalidAddress(String),

    /// Sui object identifier is not `0x` followed by 1–64 hex characters.
    #[error("invalid object ID: \"{0}\" (expected 0x followed by up to 64 hex characters)")]
    InvalidObjectId(String),

    /// Blob identifier is empty or contains forbidden characters.
    #[error("invalid blob ID: \"{0}\" (expected non-empty URL-safe base64 or hex: [A-Za-z0-9_-])")]
    InvalidBlobId(String),

    /// Market identifier is empty.
    #[error("invalid market ID: must be non-empty")]
    EmptyMarketId,

    /// Coin type is not `<address>::<module>::<Name>`.
    #[error("invalid coin type: \"{0}\" (expected <address>::<module>::<name>)")]
    InvalidCoinType(String),

    /// Amount string could not be parsed.
    #[error("invalid amount: \"{value}\" ({reason})")]
    InvalidAmount {
        /// The string that failed to parse.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// An action requiring a wallet was attempted without one.
    #[error("wallet not connected: connect a wallet first")]
    WalletNotConnected,

    /// A bet was submitted without choosing an outcome.
    #[error("missing outcome: select an outcome")]
    MissingOutcome,

    /// A bet was submitted without an amount.
    #[error("missing amount: enter an amount")]
    MissingAmount,

    /// The requested amount exceeds the caller's balance.
    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        /// Requested amount, formatted as a decimal string.
        requested: String,
        /// Available amount, formatted as a decimal string.
        available: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wm_error_validation_display() {
        let err = WmError::Validation(ValidationError::InvalidAddress("0xzz".to_string()));
        let msg = format!("{err}");
        assert!(msg.contains("validation error"));
        assert!(msg.contains("0xzz"));
    }

    #[test]
    fn wm_error_integrity_display() {
        let err = WmError::Integrity("digest mismatch".to_string());
        assert!(format!("{err}").contains("digest mismatch"));
    }

    #[test]
    fn invalid_amount_carries_value_and_reason() {
        let err = ValidationError::InvalidAmount {
            value: "1.2.3".to_string(),
            reason: "more than one decimal point".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("1.2.3"));
        assert!(msg.contains("decimal point"));
    }

    #[test]
    fn user_facing_messages() {
        assert!(ValidationError::WalletNotConnected
            .to_string()
            .contains("connect a wallet"));
        assert!(ValidationError::MissingOutcome.to_string().contains("outcome"));
        assert!(ValidationError::MissingAmount.to_string().contains("amount"));
    }

    #[test]
    fn json_error_converts() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: WmError = json_err.into();
        assert!(matches!(err, WmError::Json(_)));
    }
}
