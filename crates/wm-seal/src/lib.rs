//! # wm-seal — Encryption Gateway
//!
//! Threshold encryption for premium oracle evidence. A payload encrypted
//! here can only be recovered by a user holding a wallet-certified session
//! key, and only after at least `threshold` key servers have independently
//! checked that user against the on-chain access policy.
//!
//! ## Module Structure
//!
//! - [`traits`] — the sealed [`ThresholdBackend`] interface.
//! - [`gateway`] — request types and the `encrypt`/`decrypt` entry points.
//! - [`local`] — [`LocalSealClient`], the in-process backend.
//! - [`server`] — key servers and policy approvers.
//! - [`session`] — session keys and their wallet-signed certificates.
//! - [`config`] — key-server configuration.
//! - [`envelope`] — the ciphertext wire format.
//! - [`shamir`] — secret sharing over GF(2^8).
//!
//! ## Security Invariant
//!
//! Key servers never see plaintext and the client never sees server master
//! secrets. A share sealed under one `(package, policy)` pair cannot be
//! opened under another, and the payload AEAD binds the same pair, so
//! editing either in a stored envelope makes decryption fail.

pub mod config;
pub mod envelope;
pub mod error;
pub mod gateway;
pub mod local;
pub mod server;
pub mod session;
pub mod shamir;
pub mod traits;

pub use config::{SealConfig, ServerConfig, MAX_TOTAL_WEIGHT};
pub use envelope::{EncryptedObject, SealedShare, ENVELOPE_VERSION};
pub use error::{ConfigError, DecryptionError, EncryptionError, SealError};
pub use gateway::{
    decrypt, decrypt_oracle_evidence, encrypt, encrypt_oracle_evidence, DecryptRequest,
    EncryptRequest,
};
pub use local::LocalSealClient;
pub use server::{AllowList, ApproveAll, LocalKeyServer, PolicyApprover};
pub use session::{Certificate, SessionKey, MAX_TTL_MIN};
pub use traits::ThresholdBackend;
