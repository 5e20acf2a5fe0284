//! # In-Process Threshold Backend
//!
//! [`LocalSealClient`] drives a set of [`LocalKeyServer`]s:
//!
//! 1. A fresh 256-bit data key encrypts the payload with ChaCha20-Poly1305;
//!    package and policy are bound as associated data.
//! 2. The data key is Shamir-split into one share per unit of server weight
//!    and each share is sealed by the server it is assigned to.
//! 3. Decryption asks servers, in configuration order, to release their
//!    shares until `threshold` are collected, then recombines the key.
//!
//! The client never holds server master secrets; it only sees sealed and
//! released shares.

use std::sync::Arc;

use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use chrono::{DateTime, Utc};
use rand_core::{OsRng, RngCore};
use zeroize::Zeroizing;

use crate::config::{SealConfig, ServerConfig};
use crate::envelope::{decode_hex, EncryptedObject, ENVELOPE_VERSION};
use crate::error::{ConfigError, DecryptionError, EncryptionError, SealError};
use crate::gateway::{DecryptRequest, EncryptRequest};
use crate::server::LocalKeyServer;
use crate::shamir;
use crate::traits::ThresholdBackend;

/// Threshold client over in-process key servers.
#[derive(Debug)]
pub struct LocalSealClient {
    servers: Vec<(ServerConfig, Option<Arc<LocalKeyServer>>)>,
    verify_key_servers: bool,
}

impl LocalSealClient {
    /// Bind `config` to the known key servers in `registry`.
    ///
    /// With `verify_key_servers` on, every configured object ID must be in
    /// the registry. With it off, unknown servers are kept but treated as
    /// unreachable.
    pub fn new(config: SealConfig, registry: &[Arc<LocalKeyServer>]) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut servers = Vec::with_capacity(config.server_configs.len());
        for server_config in config.server_configs {
            let found = registry
                .iter()
                .find(|s| s.object_id() == &server_config.object_id)
                .cloned();
            if found.is_none() {
                if config.verify_key_servers {
                    return Err(ConfigError::UnknownKeyServer(server_config.object_id.to_string()));
                }
                tracing::warn!(
                    server = %server_config.object_id,
                    "key server not in registry; continuing without verification"
                );
            }
            servers.push((server_config, found));
        }
        Ok(Self {
            servers,
            verify_key_servers: config.verify_key_servers,
        })
    }

    /// Whether key-server identities were verified at construction.
    pub fn verifies_key_servers(&self) -> bool {
        self.verify_key_servers
    }

    /// Sum of configured server weights.
    pub fn total_weight(&self) -> usize {
        self.servers.iter().map(|(c, _)| c.weight as usize).sum()
    }

    /// Synchronous encryption; see [`ThresholdBackend::encrypt`].
    pub fn encrypt_now(&self, request: &EncryptRequest) -> Result<Vec<u8>, SealError> {
        let total_weight = self.total_weight();
        if request.threshold == 0 {
            return Err(EncryptionError::ZeroThreshold.into());
        }
        if request.threshold as usize > total_weight {
            return Err(EncryptionError::ThresholdUnmet {
                threshold: request.threshold,
                total_weight,
            }
            .into());
        }

        let mut data_key = Zeroizing::new([0u8; 32]);
        OsRng.fill_bytes(&mut data_key[..]);
        let mut nonce = [0u8; 12];
        OsRng.fill_bytes(&mut nonce);

        let aad = EncryptedObject::payload_aad(&request.package_id, &request.policy_id);
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&data_key[..]));
        let ciphertext = cipher
            .encrypt(
                Nonce::from_slice(&nonce),
                Payload {
                    msg: &request.payload,
                    aad: &aad,
                },
            )
            .map_err(|e| EncryptionError::Cipher(e.to_string()))?;

        // total_weight <= 255 is enforced by SealConfig::validate.
        let shares = shamir::split(&data_key[..], request.threshold, total_weight as u8, &mut OsRng)
            .map_err(|e| EncryptionError::Cipher(e.to_string()))?;

        let mut sealed = Vec::with_capacity(shares.len());
        let mut next = shares.iter();
        for (config, server) in &self.servers {
            let server = server
                .as_ref()
                .ok_or_else(|| EncryptionError::ServerUnreachable(config.object_id.to_string()))?;
            for share in next.by_ref().take(config.weight as usize) {
                sealed.push(server.seal_share(&request.package_id, &request.policy_id, share)?);
            }
        }

        let object = EncryptedObject {
            version: ENVELOPE_VERSION,
            package_id: request.package_id.clone(),
            policy_id: request.policy_id.clone(),
            threshold: request.threshold,
            shares: sealed,
            nonce: hex::encode(nonce),
            ciphertext: hex::encode(ciphertext),
        };
        tracing::debug!(
            package = %object.package_id,
            policy = %object.policy_id,
            threshold = object.threshold,
            shares = object.shares.len(),
            "payload encrypted"
        );
        Ok(object.to_bytes())
    }

    /// Synchronous decryption at a fixed instant; see [`ThresholdBackend::decrypt`].
    pub fn decrypt_at(
        &self,
        request: &DecryptRequest<'_>,
        now: DateTime<Utc>,
    ) -> Result<Vec<u8>, SealError> {
        let object = EncryptedObject::from_bytes(request.encrypted_payload)?;
        let certificate = request.session.certificate();
        certificate.verify(now)?;
        if certificate.package_id != object.package_id {
            return Err(DecryptionError::PackageMismatch {
                session: certificate.package_id.to_string(),
                ciphertext: object.package_id.to_string(),
            }
            .into());
        }

        let signature = request
            .session
            .sign_request(&object.request_digest(request.tx_bytes));
        let threshold = object.threshold as usize;
        let mut collected = Vec::with_capacity(threshold);

        for (config, server) in &self.servers {
            if collected.len() >= threshold {
                break;
            }
            if !object.shares.iter().any(|s| s.server == config.object_id) {
                continue;
            }
            let Some(server) = server else {
                tracing::warn!(server = %config.object_id, "key server unreachable");
                continue;
            };
            match server.release(&object, certificate, &signature, request.tx_bytes, now) {
                Ok(shares) => collected.extend(shares),
                Err(DecryptionError::AuthenticationFailed) => {
                    return Err(DecryptionError::AuthenticationFailed.into());
                }
                Err(e) => {
                    tracing::warn!(server = %config.object_id, error = %e, "share release refused");
                }
            }
        }

        if collected.len() < threshold {
            return Err(DecryptionError::PolicyDenied {
                released: collected.len(),
                threshold: object.threshold,
            }
            .into());
        }
        collected.truncate(threshold);

        let data_key = shamir::combine(&collected)
            .map_err(|e| DecryptionError::MalformedCiphertext(e.to_string()))?;
        if data_key.len() != 32 {
            return Err(DecryptionError::MalformedCiphertext("data key must be 32 bytes".into()).into());
        }
        let nonce = decode_hex("nonce", &object.nonce)?;
        if nonce.len() != 12 {
            return Err(DecryptionError::MalformedCiphertext("nonce must be 12 bytes".into()).into());
        }
        let ciphertext = decode_hex("ciphertext", &object.ciphertext)?;
        let aad = EncryptedObject::payload_aad(&object.package_id, &object.policy_id);
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&data_key[..]));
        let plaintext = cipher
            .decrypt(
                Nonce::from_slice(&nonce),
                Payload {
                    msg: &ciphertext,
                    aad: &aad,
                },
            )
            .map_err(|_| DecryptionError::AuthenticationFailed)?;

        tracing::debug!(
            package = %object.package_id,
            policy = %object.policy_id,
            user = %certificate.user,
            "payload decrypted"
        );
        Ok(plaintext)
    }
}

impl ThresholdBackend for LocalSealClient {
    async fn encrypt(&self, request: &EncryptRequest) -> Result<Vec<u8>, SealError> {
        self.encrypt_now(request)
    }

    async fn decrypt(&self, request: &DecryptRequest<'_>) -> Result<Vec<u8>, SealError> {
        self.decrypt_at(request, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::{AllowList, ApproveAll, PolicyApprover};
    use crate::session::SessionKey;
    use ed25519_dalek::SigningKey;
    use wm_core::{ObjectId, SuiAddress};

    fn oid(n: u8) -> ObjectId {
        ObjectId::new(&format!("0x{n:x}")).unwrap()
    }

    fn servers(n: u8, approver: Arc<dyn PolicyApprover>) -> Vec<Arc<LocalKeyServer>> {
        (1..=n)
            .map(|i| Arc::new(LocalKeyServer::generate(oid(0x50 + i), approver.clone())))
            .collect()
    }

    fn client(registry: &[Arc<LocalKeyServer>]) -> LocalSealClient {
        let configs = registry
            .iter()
            .map(|s| ServerConfig::new(s.object_id().clone(), 1))
            .collect();
        LocalSealClient::new(SealConfig::new(configs), registry).unwrap()
    }

    fn request(threshold: u8) -> EncryptRequest {
        EncryptRequest {
            payload: b"oracle evidence: BTC closed at 151,204".to_vec(),
            threshold,
            package_id: oid(0xaa),
            policy_id: "market-1".into(),
        }
    }

    fn session() -> SessionKey {
        SessionKey::new(&SigningKey::from_bytes(&[3u8; 32]), oid(0xaa), 10, Utc::now()).unwrap()
    }

    #[test]
    fn round_trip_two_of_three() {
        let registry = servers(3, Arc::new(ApproveAll));
        let client = client(&registry);
        let ciphertext = client.encrypt_now(&request(2)).unwrap();
        let session = session();
        let plaintext = client
            .decrypt_at(
                &DecryptRequest {
                    encrypted_payload: &ciphertext,
                    session: &session,
                    tx_bytes: None,
                },
                Utc::now(),
            )
            .unwrap();
        assert_eq!(plaintext, request(2).payload);
    }

    #[test]
    fn survives_offline_server_below_threshold() {
        let registry = servers(3, Arc::new(ApproveAll));
        let client = client(&registry);
        let ciphertext = client.encrypt_now(&request(2)).unwrap();
        registry[0].set_online(false);
        let session = session();
        let result = client.decrypt_at(
            &DecryptRequest {
                encrypted_payload: &ciphertext,
                session: &session,
                tx_bytes: None,
            },
            Utc::now(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn too_many_offline_servers_deny() {
        let registry = servers(3, Arc::new(ApproveAll));
        let client = client(&registry);
        let ciphertext = client.encrypt_now(&request(2)).unwrap();
        registry[0].set_online(false);
        registry[1].set_online(false);
        let session = session();
        let err = client
            .decrypt_at(
                &DecryptRequest {
                    encrypted_payload: &ciphertext,
                    session: &session,
                    tx_bytes: None,
                },
                Utc::now(),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            SealError::Decryption(DecryptionError::PolicyDenied {
                released: 1,
                threshold: 2
            })
        ));
    }

    #[test]
    fn allow_list_gates_release() {
        let list = Arc::new(AllowList::new());
        let registry = servers(2, list.clone());
        let client = client(&registry);
        let ciphertext = client.encrypt_now(&request(2)).unwrap();
        let session = session();
        let req = DecryptRequest {
            encrypted_payload: &ciphertext,
            session: &session,
            tx_bytes: None,
        };
        assert!(client.decrypt_at(&req, Utc::now()).is_err());

        list.grant("market-1", session.address().clone());
        assert!(client.decrypt_at(&req, Utc::now()).is_ok());
    }

    #[test]
    fn threshold_above_weight_rejected() {
        let registry = servers(2, Arc::new(ApproveAll));
        let err = client(&registry).encrypt_now(&request(3)).unwrap_err();
        assert!(matches!(
            err,
            SealError::Encryption(EncryptionError::ThresholdUnmet {
                threshold: 3,
                total_weight: 2
            })
        ));
    }

    #[test]
    fn zero_threshold_rejected() {
        let registry = servers(1, Arc::new(ApproveAll));
        assert!(matches!(
            client(&registry).encrypt_now(&request(0)),
            Err(SealError::Encryption(EncryptionError::ZeroThreshold))
        ));
    }

    #[test]
    fn weighted_server_meets_threshold_alone() {
        let registry = servers(2, Arc::new(ApproveAll));
        let config = SealConfig::new(vec![
            ServerConfig::new(registry[0].object_id().clone(), 2),
            ServerConfig::new(registry[1].object_id().clone(), 1),
        ]);
        let client = LocalSealClient::new(config, &registry).unwrap();
        let ciphertext = client.encrypt_now(&request(2)).unwrap();
        registry[1].set_online(false);
        let session = session();
        let plaintext = client
            .decrypt_at(
                &DecryptRequest {
                    encrypted_payload: &ciphertext,
                    session: &session,
                    tx_bytes: None,
                },
                Utc::now(),
            )
            .unwrap();
        assert_eq!(plaintext, request(2).payload);
    }

    #[test]
    fn unknown_server_rejected_when_verifying() {
        let registry = servers(1, Arc::new(ApproveAll));
        let config = SealConfig::new(vec![ServerConfig::new(oid(0x99), 1)]);
        assert!(matches!(
            LocalSealClient::new(config, &registry),
            Err(ConfigError::UnknownKeyServer(_))
        ));
    }

    #[test]
    fn unknown_server_is_unreachable_without_verification() {
        let registry = servers(1, Arc::new(ApproveAll));
        let mut config = SealConfig::new(vec![
            ServerConfig::new(registry[0].object_id().clone(), 1),
            ServerConfig::new(oid(0x99), 1),
        ]);
        config.verify_key_servers = false;
        let client = LocalSealClient::new(config, &registry).unwrap();
        assert!(!client.verifies_key_servers());
        assert!(matches!(
            client.encrypt_now(&request(1)),
            Err(SealError::Encryption(EncryptionError::ServerUnreachable(_)))
        ));
    }

    #[test]
    fn wrong_package_session_rejected() {
        let registry = servers(1, Arc::new(ApproveAll));
        let client = client(&registry);
        let ciphertext = client.encrypt_now(&request(1)).unwrap();
        let other =
            SessionKey::new(&SigningKey::from_bytes(&[3u8; 32]), oid(0xbb), 10, Utc::now()).unwrap();
        let err = client
            .decrypt_at(
                &DecryptRequest {
                    encrypted_payload: &ciphertext,
                    session: &other,
                    tx_bytes: None,
                },
                Utc::now(),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            SealError::Decryption(DecryptionError::PackageMismatch { .. })
        ));
    }

    #[test]
    fn tampered_policy_fails_authentication() {
        let registry = servers(1, Arc::new(ApproveAll));
        let client = client(&registry);
        let ciphertext = client.encrypt_now(&request(1)).unwrap();
        let mut object = EncryptedObject::from_bytes(&ciphertext).unwrap();
        object.policy_id = "market-2".into();
        let tampered = object.to_bytes();
        let session = session();
        let err = client
            .decrypt_at(
                &DecryptRequest {
                    encrypted_payload: &tampered,
                    session: &session,
                    tx_bytes: None,
                },
                Utc::now(),
            )
            .unwrap_err();
        // Share keys are policy-bound, so the share fails to open.
        assert!(matches!(
            err,
            SealError::Decryption(DecryptionError::AuthenticationFailed)
        ));
    }

    #[test]
    fn grant_for_other_user_does_not_leak() {
        let list = Arc::new(AllowList::new());
        list.grant("market-1", SuiAddress::new("0x1").unwrap());
        let registry = servers(1, list);
        let client = client(&registry);
        let ciphertext = client.encrypt_now(&request(1)).unwrap();
        let session = session();
        assert!(client
            .decrypt_at(
                &DecryptRequest {
                    encrypted_payload: &ciphertext,
                    session: &session,
                    tx_bytes: None,
                },
                Utc::now(),
            )
            .is_err());
    }
}
