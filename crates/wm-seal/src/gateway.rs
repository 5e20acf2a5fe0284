//! # Encryption Gateway
//!
//! Entry points the rest of the stack calls. They wrap a
//! [`ThresholdBackend`] with request logging and the text conversions
//! used for oracle evidence documents. Failures are propagated unchanged;
//! the gateway never retries.

use wm_core::ObjectId;

use crate::error::{DecryptionError, SealError};
use crate::session::SessionKey;
use crate::traits::ThresholdBackend;

/// Input to [`ThresholdBackend::encrypt`].
#[derive(Clone)]
pub struct EncryptRequest {
    /// Plaintext bytes.
    pub payload: Vec<u8>,
    /// Shares needed to decrypt.
    pub threshold: u8,
    /// Package holding the access policy.
    pub package_id: ObjectId,
    /// Policy identifier within the package.
    pub policy_id: String,
}

impl std::fmt::Debug for EncryptRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptRequest")
            .field("payload_len", &self.payload.len())
            .field("threshold", &self.threshold)
            .field("package_id", &self.package_id)
            .field("policy_id", &self.policy_id)
            .finish()
    }
}

/// Input to [`ThresholdBackend::decrypt`].
#[derive(Debug, Clone, Copy)]
pub struct DecryptRequest<'a> {
    /// Envelope bytes produced by `encrypt`.
    pub encrypted_payload: &'a [u8],
    /// Wallet-certified session key.
    pub session: &'a SessionKey,
    /// Optional transaction bytes proving entitlement.
    pub tx_bytes: Option<&'a [u8]>,
}

/// Encrypt `payload` under `(package_id, policy_id)`.
pub async fn encrypt<B: ThresholdBackend>(
    backend: &B,
    payload: Vec<u8>,
    threshold: u8,
    package_id: ObjectId,
    policy_id: impl Into<String>,
) -> Result<Vec<u8>, SealError> {
    let request = EncryptRequest {
        payload,
        threshold,
        package_id,
        policy_id: policy_id.into(),
    };
    match backend.encrypt(&request).await {
        Ok(ciphertext) => Ok(ciphertext),
        Err(e) => {
            tracing::error!(request = ?request, error = %e, "encryption failed");
            Err(e)
        }
    }
}

/// Decrypt `encrypted_payload` with a session credential.
pub async fn decrypt<B: ThresholdBackend>(
    backend: &B,
    encrypted_payload: &[u8],
    session: &SessionKey,
    tx_bytes: Option<&[u8]>,
) -> Result<Vec<u8>, SealError> {
    let request = DecryptRequest {
        encrypted_payload,
        session,
        tx_bytes,
    };
    match backend.decrypt(&request).await {
        Ok(plaintext) => Ok(plaintext),
        Err(e) => {
            tracing::error!(user = %session.address(), error = %e, "decryption failed");
            Err(e)
        }
    }
}

/// Encrypt a UTF-8 evidence document.
pub async fn encrypt_oracle_evidence<B: ThresholdBackend>(
    backend: &B,
    evidence: &str,
    threshold: u8,
    package_id: ObjectId,
    policy_id: impl Into<String>,
) -> Result<Vec<u8>, SealError> {
    encrypt(backend, evidence.as_bytes().to_vec(), threshold, package_id, policy_id).await
}

/// Decrypt an evidence document back to text.
///
/// # Errors
///
/// Besides backend failures, [`DecryptionError::MalformedCiphertext`] when
/// the recovered plaintext is not UTF-8.
pub async fn decrypt_oracle_evidence<B: ThresholdBackend>(
    backend: &B,
    encrypted_payload: &[u8],
    session: &SessionKey,
    tx_bytes: Option<&[u8]>,
) -> Result<String, SealError> {
    let plaintext = decrypt(backend, encrypted_payload, session, tx_bytes).await?;
    String::from_utf8(plaintext).map_err(|_| {
        DecryptionError::MalformedCiphertext("evidence plaintext is not UTF-8".into()).into()
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use ed25519_dalek::SigningKey;

    use super::*;
    use crate::config::{SealConfig, ServerConfig};
    use crate::local::LocalSealClient;
    use crate::server::{ApproveAll, LocalKeyServer};

    fn setup() -> (LocalSealClient, SessionKey) {
        let server = Arc::new(LocalKeyServer::generate(
            ObjectId::new("0x51").unwrap(),
            Arc::new(ApproveAll),
        ));
        let config = SealConfig::new(vec![ServerConfig::new(server.object_id().clone(), 1)]);
        let client = LocalSealClient::new(config, &[server]).unwrap();
        let session = SessionKey::new(
            &SigningKey::from_bytes(&[7u8; 32]),
            ObjectId::new("0xaa").unwrap(),
            5,
            Utc::now(),
        )
        .unwrap();
        (client, session)
    }

    #[tokio::test]
    async fn evidence_text_round_trip() {
        let (client, session) = setup();
        let ciphertext = encrypt_oracle_evidence(
            &client,
            r#"{"source":"binance","price":"64210.5"}"#,
            1,
            ObjectId::new("0xaa").unwrap(),
            "market-42",
        )
        .await
        .unwrap();
        let text = decrypt_oracle_evidence(&client, &ciphertext, &session, None)
            .await
            .unwrap();
        assert_eq!(text, r#"{"source":"binance","price":"64210.5"}"#);
    }

    #[tokio::test]
    async fn non_utf8_plaintext_is_malformed() {
        let (client, session) = setup();
        let ciphertext = encrypt(&client, vec![0xff, 0xfe], 1, ObjectId::new("0xaa").unwrap(), "p")
            .await
            .unwrap();
        let err = decrypt_oracle_evidence(&client, &ciphertext, &session, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SealError::Decryption(DecryptionError::MalformedCiphertext(_))
        ));
    }

    #[test]
    fn request_debug_omits_payload() {
        let request = EncryptRequest {
            payload: b"secret evidence".to_vec(),
            threshold: 1,
            package_id: ObjectId::new("0x1").unwrap(),
            policy_id: "p".into(),
        };
        let debug = format!("{request:?}");
        assert!(debug.contains("payload_len: 15"));
        assert!(!debug.contains("secret evidence"));
    }
}
