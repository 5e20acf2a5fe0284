//! # Threshold Backend Trait (Sealed)
//!
//! The narrow interface the evidence stack uses for threshold encryption.
//! Callers never see key-server transports or share formats; they hand over
//! an [`EncryptRequest`] or [`DecryptRequest`] and get bytes back.
//!
//! ## Sealed Trait
//!
//! `ThresholdBackend` is sealed: only backends defined in this crate can
//! implement it, so premium evidence cannot be routed through an
//! unaudited encryption path.

use std::future::Future;

use crate::error::SealError;
use crate::gateway::{DecryptRequest, EncryptRequest};

mod private {
    /// Sealing marker trait. Not accessible outside `wm-seal`.
    pub trait Sealed {}
}

/// Threshold encryption over a set of key servers.
pub trait ThresholdBackend: private::Sealed + Send + Sync {
    /// Encrypt `request.payload` under `(package_id, policy_id)`.
    ///
    /// # Errors
    ///
    /// [`SealError::Encryption`] when the threshold cannot be met or a key
    /// server is unreachable.
    fn encrypt(
        &self,
        request: &EncryptRequest,
    ) -> impl Future<Output = Result<Vec<u8>, SealError>> + Send;

    /// Recover the plaintext of `request.encrypted_payload`.
    ///
    /// # Errors
    ///
    /// [`SealError::Decryption`] for invalid or expired credentials, a
    /// failed policy check, or a malformed or tampered ciphertext.
    fn decrypt(
        &self,
        request: &DecryptRequest<'_>,
    ) -> impl Future<Output = Result<Vec<u8>, SealError>> + Send;
}

impl private::Sealed for crate::local::LocalSealClient {}
