//! # Session Keys
//!
//! A session key is the decryption credential a premium user presents to
//! key servers. The user's wallet key certifies a fresh ephemeral Ed25519
//! key for one package and a bounded time window; the ephemeral key then
//! signs each decryption request so the wallet is prompted only once per
//! session.
//!
//! The certificate binds:
//! - the user's address, derived from the wallet public key,
//! - the package whose policies may be exercised,
//! - creation time and TTL (at most [`MAX_TTL_MIN`] minutes),
//! - the ephemeral session public key.

use chrono::{DateTime, Duration, Utc};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use wm_core::{ObjectId, SuiAddress};

use crate::error::{ConfigError, DecryptionError};

/// Longest session a wallet may certify.
pub const MAX_TTL_MIN: u16 = 30;

/// Wallet-signed statement authorizing an ephemeral session key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    /// Address of the certifying user.
    pub user: SuiAddress,
    /// Wallet Ed25519 public key, hex.
    pub user_public_key: String,
    /// Ephemeral session Ed25519 public key, hex.
    pub session_public_key: String,
    /// Package whose access policies this session may exercise.
    pub package_id: ObjectId,
    /// Issue time.
    pub creation: DateTime<Utc>,
    /// Lifetime in minutes.
    pub ttl_min: u16,
    /// Wallet signature over [`Certificate::message`], hex.
    pub signature: String,
}

impl Certificate {
    /// The personal message the wallet signs.
    pub fn message(
        package_id: &ObjectId,
        ttl_min: u16,
        creation: &DateTime<Utc>,
        session_public_key: &str,
    ) -> String {
        format!(
            "Accessing keys of package {package_id} for {ttl_min} mins from {}, session key {session_public_key}",
            creation.to_rfc3339()
        )
    }

    /// When the session stops being accepted.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.creation + Duration::minutes(i64::from(self.ttl_min))
    }

    /// Verify the wallet signature, address binding and validity window.
    pub fn verify(&self, now: DateTime<Utc>) -> Result<(), DecryptionError> {
        if self.ttl_min == 0 || self.ttl_min > MAX_TTL_MIN {
            return Err(DecryptionError::InvalidCredential(format!(
                "ttl {} out of range",
                self.ttl_min
            )));
        }
        if now >= self.expires_at() {
            return Err(DecryptionError::SessionExpired(self.expires_at().to_rfc3339()));
        }
        if now < self.creation - Duration::minutes(1) {
            return Err(DecryptionError::InvalidCredential(
                "certificate issued in the future".into(),
            ));
        }
        let user_key = parse_verifying_key(&self.user_public_key)?;
        if SuiAddress::from_ed25519_public_key(user_key.as_bytes()) != self.user {
            return Err(DecryptionError::InvalidCredential(
                "address does not match wallet key".into(),
            ));
        }
        let signature = parse_signature(&self.signature)?;
        let message = Self::message(
            &self.package_id,
            self.ttl_min,
            &self.creation,
            &self.session_public_key,
        );
        user_key
            .verify(message.as_bytes(), &signature)
            .map_err(|_| DecryptionError::InvalidCredential("wallet signature invalid".into()))
    }

    /// Verify a request signed by the certified session key.
    pub fn verify_request(&self, request: &[u8], signature: &[u8; 64]) -> Result<(), DecryptionError> {
        let session_key = parse_verifying_key(&self.session_public_key)?;
        session_key
            .verify(request, &Signature::from_bytes(signature))
            .map_err(|_| DecryptionError::InvalidCredential("request signature invalid".into()))
    }
}

fn parse_verifying_key(hex_key: &str) -> Result<VerifyingKey, DecryptionError> {
    let bytes: [u8; 32] = hex::decode(hex_key)
        .ok()
        .and_then(|v| v.try_into().ok())
        .ok_or_else(|| DecryptionError::InvalidCredential("public key must be 32 hex bytes".into()))?;
    VerifyingKey::from_bytes(&bytes)
        .map_err(|e| DecryptionError::InvalidCredential(format!("bad public key: {e}")))
}

fn parse_signature(hex_sig: &str) -> Result<Signature, DecryptionError> {
    let bytes: [u8; 64] = hex::decode(hex_sig)
        .ok()
        .and_then(|v| v.try_into().ok())
        .ok_or_else(|| DecryptionError::InvalidCredential("signature must be 64 hex bytes".into()))?;
    Ok(Signature::from_bytes(&bytes))
}

/// A certified ephemeral signing key.
///
/// The private half never leaves the process and is zeroized on drop.
pub struct SessionKey {
    certificate: Certificate,
    signing_key: SigningKey,
}

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKey")
            .field("certificate", &self.certificate)
            .field("signing_key", &"[REDACTED]")
            .finish()
    }
}

impl SessionKey {
    /// Create a session for `package_id`, certified by `wallet`, valid from `now`.
    pub fn new(
        wallet: &SigningKey,
        package_id: ObjectId,
        ttl_min: u16,
        now: DateTime<Utc>,
    ) -> Result<Self, ConfigError> {
        if ttl_min == 0 || ttl_min > MAX_TTL_MIN {
            return Err(ConfigError::InvalidTtl {
                got: ttl_min,
                max: MAX_TTL_MIN,
            });
        }
        let signing_key = SigningKey::generate(&mut OsRng);
        let session_public_key = hex::encode(signing_key.verifying_key().as_bytes());
        let wallet_public = wallet.verifying_key();
        let message = Certificate::message(&package_id, ttl_min, &now, &session_public_key);
        let signature = wallet.sign(message.as_bytes());

        tracing::debug!(package = %package_id, ttl_min, "session key certified");

        Ok(Self {
            certificate: Certificate {
                user: SuiAddress::from_ed25519_public_key(wallet_public.as_bytes()),
                user_public_key: hex::encode(wallet_public.as_bytes()),
                session_public_key,
                package_id,
                creation: now,
                ttl_min,
                signature: hex::encode(signature.to_bytes()),
            },
            signing_key,
        })
    }

    /// The wallet-signed certificate presented to key servers.
    pub fn certificate(&self) -> &Certificate {
        &self.certificate
    }

    /// The certifying user's address.
    pub fn address(&self) -> &SuiAddress {
        &self.certificate.user
    }

    /// Whether the session has lapsed at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.certificate.expires_at()
    }

    /// Sign a decryption request with the session key.
    pub fn sign_request(&self, request: &[u8]) -> [u8; 64] {
        self.signing_key.sign(request).to_bytes()
    }
}
