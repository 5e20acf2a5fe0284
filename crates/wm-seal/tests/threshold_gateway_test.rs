//! End-to-end tests of the encryption gateway through the public API:
//! configuration loaded from JSON, a three-server deployment, and session
//! keys certified by a user wallet.

use std::sync::Arc;

use chrono::{Duration, Utc};
use ed25519_dalek::SigningKey;
use wm_core::ObjectId;
use wm_seal::{
    decrypt, encrypt, AllowList, ApproveAll, DecryptRequest, DecryptionError, LocalKeyServer,
    LocalSealClient, SealConfig, SealError, SessionKey, ThresholdBackend,
};

const PACKAGE: &str = "0x8c1f2e";

fn package() -> ObjectId {
    ObjectId::new(PACKAGE).unwrap()
}

fn deployment() -> (Vec<Arc<LocalKeyServer>>, LocalSealClient) {
    let servers: Vec<_> = ["0xa1", "0xa2", "0xa3"]
        .iter()
        .map(|id| {
            Arc::new(LocalKeyServer::generate(
                ObjectId::new(id).unwrap(),
                Arc::new(ApproveAll),
            ))
        })
        .collect();
    let config: SealConfig = serde_json::from_str(
        r#"{
            "server_configs": [
                {"object_id": "0xa1", "weight": 1},
                {"object_id": "0xa2", "weight": 1},
                {"object_id": "0xa3", "weight": 1}
            ]
        }"#,
    )
    .unwrap();
    assert!(config.verify_key_servers);
    let client = LocalSealClient::new(config, &servers).unwrap();
    (servers, client)
}

fn wallet() -> SigningKey {
    SigningKey::from_bytes(&[42u8; 32])
}

#[tokio::test]
async fn any_two_of_three_servers_decrypt() {
    let (servers, client) = deployment();
    let ciphertext = encrypt(&client, b"evidence".to_vec(), 2, package(), "market-9")
        .await
        .unwrap();
    let session = SessionKey::new(&wallet(), package(), 10, Utc::now()).unwrap();

    for offline in 0..servers.len() {
        for (i, server) in servers.iter().enumerate() {
            server.set_online(i != offline);
        }
        let plaintext = decrypt(&client, &ciphertext, &session, None).await.unwrap();
        assert_eq!(plaintext, b"evidence");
    }
}

#[tokio::test]
async fn expired_session_is_rejected() {
    let (_servers, client) = deployment();
    let ciphertext = encrypt(&client, b"evidence".to_vec(), 2, package(), "market-9")
        .await
        .unwrap();
    let issued = Utc::now() - Duration::minutes(31);
    let session = SessionKey::new(&wallet(), package(), 30, issued).unwrap();
    assert!(session.is_expired(Utc::now()));

    let err = client
        .decrypt(&DecryptRequest {
            encrypted_payload: &ciphertext,
            session: &session,
            tx_bytes: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SealError::Decryption(DecryptionError::SessionExpired(_))
    ));
}

#[tokio::test]
async fn policy_denial_below_threshold() {
    let list = Arc::new(AllowList::new());
    let servers: Vec<_> = ["0xb1", "0xb2"]
        .iter()
        .map(|id| Arc::new(LocalKeyServer::generate(ObjectId::new(id).unwrap(), list.clone())))
        .collect();
    let config = SealConfig::new(
        servers
            .iter()
            .map(|s| wm_seal::ServerConfig::new(s.object_id().clone(), 1))
            .collect(),
    );
    let client = LocalSealClient::new(config, &servers).unwrap();
    let ciphertext = encrypt(&client, b"evidence".to_vec(), 2, package(), "market-3")
        .await
        .unwrap();
    let session = SessionKey::new(&wallet(), package(), 10, Utc::now()).unwrap();

    let err = decrypt(&client, &ciphertext, &session, Some(b"tx"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SealError::Decryption(DecryptionError::PolicyDenied {
            released: 0,
            threshold: 2
        })
    ));

    list.grant("market-3", session.address().clone());
    assert!(decrypt(&client, &ciphertext, &session, Some(b"tx")).await.is_ok());
}

#[tokio::test]
async fn truncated_ciphertext_is_malformed() {
    let (_servers, client) = deployment();
    let ciphertext = encrypt(&client, b"evidence".to_vec(), 1, package(), "m")
        .await
        .unwrap();
    let session = SessionKey::new(&wallet(), package(), 10, Utc::now()).unwrap();
    let err = decrypt(&client, &ciphertext[..ciphertext.len() / 2], &session, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SealError::Decryption(DecryptionError::MalformedCiphertext(_))
    ));
}

#[test]
fn session_ttl_is_bounded() {
    assert!(SessionKey::new(&wallet(), package(), 0, Utc::now()).is_err());
    assert!(SessionKey::new(&wallet(), package(), 31, Utc::now()).is_err());
}
