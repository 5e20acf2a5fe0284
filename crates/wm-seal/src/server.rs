//! # Key Servers
//!
//! A key server holds one master secret and, for every encrypted object,
//! the shares addressed to it. It releases those shares only to a request
//! that carries a valid session certificate for the right package, a
//! matching session-key request signature, and a user its
//! [`PolicyApprover`] accepts for the object's policy.
//!
//! [`LocalKeyServer`] runs in-process. Share-sealing keys are derived per
//! `(package, policy)` from the master secret, so a share sealed under one
//! policy is useless under another.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rand_core::{OsRng, RngCore};
use sha2::{Digest, Sha256};
use wm_core::{ObjectId, SuiAddress};
use zeroize::Zeroizing;

use crate::envelope::{decode_hex, EncryptedObject, SealedShare};
use crate::error::{DecryptionError, EncryptionError};
use crate::session::Certificate;
use crate::shamir::Share;

/// Decides whether a user satisfies an access policy.
///
/// `tx_bytes`, when present, is the caller's proof-of-entitlement
/// transaction; approvers that evaluate on-chain rules inspect it.
pub trait PolicyApprover: Send + Sync {
    /// Return `true` to release shares to `user`.
    fn approve(
        &self,
        user: &SuiAddress,
        package_id: &ObjectId,
        policy_id: &str,
        tx_bytes: Option<&[u8]>,
    ) -> bool;
}

/// Approves every certified user. Access control happens upstream.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproveAll;

impl PolicyApprover for ApproveAll {
    fn approve(&self, _: &SuiAddress, _: &ObjectId, _: &str, _: Option<&[u8]>) -> bool {
        true
    }
}

/// Approves users explicitly granted a policy.
#[derive(Debug, Default)]
pub struct AllowList {
    entries: RwLock<HashSet<(String, SuiAddress)>>,
}

impl AllowList {
    /// An empty list; denies everyone.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow `user` under `policy_id`.
    pub fn grant(&self, policy_id: &str, user: SuiAddress) {
        self.entries.write().insert((policy_id.to_string(), user));
    }

    /// Withdraw a grant. Returns whether one existed.
    pub fn revoke(&self, policy_id: &str, user: &SuiAddress) -> bool {
        self.entries
            .write()
            .remove(&(policy_id.to_string(), user.clone()))
    }
}

impl PolicyApprover for AllowList {
    fn approve(&self, user: &SuiAddress, _: &ObjectId, policy_id: &str, _: Option<&[u8]>) -> bool {
        self.entries
            .read()
            .contains(&(policy_id.to_string(), user.clone()))
    }
}

/// An in-process key server.
pub struct LocalKeyServer {
    object_id: ObjectId,
    master: Zeroizing<[u8; 32]>,
    approver: Arc<dyn PolicyApprover>,
    online: AtomicBool,
}

impl std::fmt::Debug for LocalKeyServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalKeyServer")
            .field("object_id", &self.object_id)
            .field("master", &"[REDACTED]")
            .field("online", &self.is_online())
            .finish()
    }
}

impl LocalKeyServer {
    /// A server with a fresh random master secret.
    pub fn generate(object_id: ObjectId, approver: Arc<dyn PolicyApprover>) -> Self {
        let mut master = Zeroizing::new([0u8; 32]);
        OsRng.fill_bytes(&mut master[..]);
        Self::from_master(object_id, master, approver)
    }

    /// A server with a known master secret (restored from configuration).
    pub fn from_master(
        object_id: ObjectId,
        master: Zeroizing<[u8; 32]>,
        approver: Arc<dyn PolicyApprover>,
    ) -> Self {
        Self {
            object_id,
            master,
            approver,
            online: AtomicBool::new(true),
        }
    }

    /// The server's on-chain identity.
    pub fn object_id(&self) -> &ObjectId {
        &self.object_id
    }

    /// Whether the server answers requests.
    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    /// Take the server offline or bring it back.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    fn share_key(&self, package_id: &ObjectId, policy_id: &str) -> Zeroizing<[u8; 32]> {
        let mut hasher = Sha256::new();
        hasher.update(b"wm-seal-share-key");
        hasher.update(&self.master[..]);
        hasher.update(package_id.to_bytes());
        hasher.update(policy_id.as_bytes());
        Zeroizing::new(hasher.finalize().into())
    }

    fn share_aad(&self, index: u8) -> Vec<u8> {
        let mut aad = self.object_id.to_bytes().to_vec();
        aad.push(index);
        aad
    }

    /// Seal one data-key share so only this server can open it.
    pub fn seal_share(
        &self,
        package_id: &ObjectId,
        policy_id: &str,
        share: &Share,
    ) -> Result<SealedShare, EncryptionError> {
        if !self.is_online() {
            return Err(EncryptionError::ServerUnreachable(self.object_id.to_string()));
        }
        let key = self.share_key(package_id, policy_id);
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&key[..]));
        let mut nonce = [0u8; 12];
        OsRng.fill_bytes(&mut nonce);
        let aad = self.share_aad(share.x);
        let ciphertext = cipher
            .encrypt(
                Nonce::from_slice(&nonce),
                Payload {
                    msg: share.y.as_slice(),
                    aad: &aad,
                },
            )
            .map_err(|e| EncryptionError::Cipher(e.to_string()))?;
        Ok(SealedShare {
            server: self.object_id.clone(),
            index: share.x,
            nonce: hex::encode(nonce),
            ciphertext: hex::encode(ciphertext),
        })
    }

    /// Release this server's shares of `object` to a certified session.
    pub fn release(
        &self,
        object: &EncryptedObject,
        certificate: &Certificate,
        request_signature: &[u8; 64],
        tx_bytes: Option<&[u8]>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Share>, DecryptionError> {
        if !self.is_online() {
            return Err(DecryptionError::ServerUnavailable(self.object_id.to_string()));
        }
        certificate.verify(now)?;
        if certificate.package_id != object.package_id {
            return Err(DecryptionError::PackageMismatch {
                session: certificate.package_id.to_string(),
                ciphertext: object.package_id.to_string(),
            });
        }
        certificate.verify_request(&object.request_digest(tx_bytes), request_signature)?;

        if !self.approver.approve(
            &certificate.user,
            &object.package_id,
            &object.policy_id,
            tx_bytes,
        ) {
            tracing::info!(
                server = %self.object_id,
                user = %certificate.user,
                policy = %object.policy_id,
                "key server denied share release"
            );
            return Err(DecryptionError::PolicyDenied {
                released: 0,
                threshold: object.threshold,
            });
        }

        let key = self.share_key(&object.package_id, &object.policy_id);
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&key[..]));
        object
            .shares
            .iter()
            .filter(|s| s.server == self.object_id)
            .map(|sealed| {
                let nonce = decode_hex("share nonce", &sealed.nonce)?;
                if nonce.len() != 12 {
                    return Err(DecryptionError::MalformedCiphertext(
                        "share nonce must be 12 bytes".into(),
                    ));
                }
                let ciphertext = decode_hex("share ciphertext", &sealed.ciphertext)?;
                let aad = self.share_aad(sealed.index);
                let y = cipher
                    .decrypt(
                        Nonce::from_slice(&nonce),
                        Payload {
                            msg: &ciphertext,
                            aad: &aad,
                        },
                    )
                    .map_err(|_| DecryptionError::AuthenticationFailed)?;
                Ok(Share {
                    x: sealed.index,
                    y: Zeroizing::new(y),
                })
            })
            .collect()
    }
}
