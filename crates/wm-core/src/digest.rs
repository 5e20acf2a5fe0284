//! # Content Digests
//!
//! SHA-256 digests used for content addressing of evidence blobs in local
//! stores and for integrity checks after retrieval.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::WmError;

/// A 32-byte SHA-256 content digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest {
    /// The raw 32-byte digest value.
    pub bytes: [u8; 32],
}

impl ContentDigest {
    /// Wrap raw digest bytes.
    pub fn new(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Return the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Parse a 64-character hex digest.
    pub fn from_hex(s: &str) -> Result<Self, WmError> {
        let decoded = hex::decode(s.trim())
            .map_err(|e| WmError::Integrity(format!("invalid digest hex: {e}")))?;
        let bytes: [u8; 32] = decoded.try_into().map_err(|v: Vec<u8>| {
            WmError::Integrity(format!("digest must be 32 bytes, got {}", v.len()))
        })?;
        Ok(Self { bytes })
    }

    /// Whether `data` hashes to this digest.
    pub fn matches(&self, data: &[u8]) -> bool {
        sha256_digest(data) == *self
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sha256:{}", self.to_hex())
    }
}

/// Compute the SHA-256 digest of raw bytes.
pub fn sha256_digest(data: &[u8]) -> ContentDigest {
    let hash = Sha256::digest(data);
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ContentDigest { bytes }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vector_empty_input() {
        let d = sha256_digest(b"");
        assert_eq!(
            d.to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn hex_round_trip() {
        let d = sha256_digest(b"evidence");
        assert_eq!(ContentDigest::from_hex(&d.to_hex()).unwrap(), d);
    }

    #[test]
    fn from_hex_rejects_wrong_length() {
        assert!(ContentDigest::from_hex("abcd").is_err());
        assert!(ContentDigest::from_hex("zz").is_err());
    }

    #[test]
    fn matches_detects_tampering() {
        let d = sha256_digest(b"original");
        assert!(d.matches(b"original"));
        assert!(!d.matches(b"tampered"));
    }

    #[test]
    fn display_carries_algorithm_prefix() {
        assert!(sha256_digest(b"x").to_string().starts_with("sha256:"));
    }
}
