//! # Encrypted Object Envelope
//!
//! Wire format of a ciphertext produced by the gateway. The envelope is
//! self-describing: it names the package and policy it was sealed under,
//! the threshold, and one sealed data-key share per key-server weight unit.
//!
//! Serialized as JSON with hex-encoded binary fields. The package and
//! policy identifiers are also bound into the payload AEAD as associated
//! data, so editing them in the envelope breaks authentication.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use wm_core::ObjectId;

use crate::error::DecryptionError;

/// Current envelope version.
pub const ENVELOPE_VERSION: u8 = 1;

/// A data-key share sealed for one key server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedShare {
    /// Key server that can open this share.
    pub server: ObjectId,
    /// Shamir x-coordinate.
    pub index: u8,
    /// AEAD nonce, hex.
    pub nonce: String,
    /// Sealed share bytes, hex.
    pub ciphertext: String,
}

/// A threshold-encrypted payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedObject {
    /// Format version.
    pub version: u8,
    /// Package the access policy lives in.
    pub package_id: ObjectId,
    /// Policy identifier within the package.
    pub policy_id: String,
    /// Shares needed to recover the data key.
    pub threshold: u8,
    /// One entry per share.
    pub shares: Vec<SealedShare>,
    /// Payload AEAD nonce, hex.
    pub nonce: String,
    /// Payload ciphertext with tag, hex.
    pub ciphertext: String,
}

impl EncryptedObject {
    /// Serialize to bytes for storage.
    pub fn to_bytes(&self) -> Vec<u8> {
        // Serializing a struct of strings and integers cannot fail.
        serde_json::to_vec(self).unwrap_or_default()
    }

    /// Parse and structurally check an envelope.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecryptionError> {
        let obj: Self = serde_json::from_slice(bytes)
            .map_err(|e| DecryptionError::MalformedCiphertext(e.to_string()))?;
        if obj.version != ENVELOPE_VERSION {
            return Err(DecryptionError::MalformedCiphertext(format!(
                "unsupported version {}",
                obj.version
            )));
        }
        if obj.threshold == 0 || obj.shares.len() < obj.threshold as usize {
            return Err(DecryptionError::MalformedCiphertext(format!(
                "threshold {} with {} shares",
                obj.threshold,
                obj.shares.len()
            )));
        }
        Ok(obj)
    }

    /// Associated data bound into the payload AEAD.
    pub fn payload_aad(package_id: &ObjectId, policy_id: &str) -> Vec<u8> {
        let mut aad = package_id.to_bytes().to_vec();
        aad.extend_from_slice(policy_id.as_bytes());
        aad
    }

    /// Digest identifying this envelope in decryption requests.
    pub fn request_digest(&self, tx_bytes: Option<&[u8]>) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(b"wm-seal-request");
        hasher.update(self.to_bytes());
        if let Some(tx) = tx_bytes {
            hasher.update(tx);
        }
        hasher.finalize().into()
    }
}

/// Decode a hex field, reporting which field failed.
pub(crate) fn decode_hex(field: &str, value: &str) -> Result<Vec<u8>, DecryptionError> {
    hex::decode(value)
        .map_err(|e| DecryptionError::MalformedCiphertext(format!("{field}: {e}")))
}
