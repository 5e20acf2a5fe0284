//! # Integration Tests for wm-api
//!
//! Drives the full router with `oneshot`: health probes, authentication,
//! policy resolution, the blob gateway over in-memory and placeholder
//! stores, balances and entitlements against a mocked fullnode, bet
//! validation, and the OpenAPI document.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zeroize::Zeroizing;

use wm_api::state::{AppConfig, AppState};
use wm_core::{BlobId, ObjectId};
use wm_sui::{SuiClient, SuiConfig};
use wm_walrus::{AnyBlobStore, MemoryBlobStore, PlaceholderStore};

const OWNER: &str = "0x7d20dcdb2bca4f508ea9613994683eb4e76e9c4ed371169677c1be02aaf0b58e";
const REGISTRY: &str = "0x00000000000000000000000000000000000000000000000000000000000003f1";

/// Fullnode client pointed at a port nothing listens on.
fn unreachable_sui() -> SuiClient {
    SuiClient::new(SuiConfig::local_mock("http://127.0.0.1:9").unwrap()).unwrap()
}

fn sui_for(server: &MockServer) -> SuiClient {
    SuiClient::new(SuiConfig::local_mock(&server.uri()).unwrap()).unwrap()
}

fn app_with(config: AppConfig, blobs: AnyBlobStore, sui: SuiClient) -> axum::Router {
    wm_api::app(AppState::new(config, blobs, sui))
}

/// Helper: auth disabled, memory store, unreachable fullnode.
fn test_app() -> axum::Router {
    app_with(
        AppConfig::default(),
        MemoryBlobStore::new().into(),
        unreachable_sui(),
    )
}

fn test_app_with_auth(token: &str) -> axum::Router {
    let config = AppConfig {
        auth_token: Some(Zeroizing::new(token.to_string())),
        ..AppConfig::default()
    };
    app_with(config, MemoryBlobStore::new().into(), unreachable_sui())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

async fn body_json(response: axum::response::Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn health_probes_answer_without_token() {
    let app = test_app_with_auth("s3cret");
    let live = app.clone().oneshot(get("/health/liveness")).await.unwrap();
    assert_eq!(live.status(), StatusCode::OK);
    assert_eq!(body_bytes(live).await, b"ok");

    let ready = app.oneshot(get("/health/readiness")).await.unwrap();
    assert_eq!(ready.status(), StatusCode::OK);
    assert_eq!(body_bytes(ready).await, b"ready");
}

// -- Authentication -----------------------------------------------------------

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let response = test_app_with_auth("s3cret")
        .oneshot(post_json("/v1/policy/resolve", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn wrong_token_is_unauthorized() {
    let mut request = post_json("/v1/policy/resolve", json!({}));
    request
        .headers_mut()
        .insert(header::AUTHORIZATION, "Bearer nope".parse().unwrap());
    let response = test_app_with_auth("s3cret").oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn correct_token_passes() {
    let mut request = post_json("/v1/policy/resolve", json!({}));
    request
        .headers_mut()
        .insert(header::AUTHORIZATION, "Bearer s3cret".parse().unwrap());
    let response = test_app_with_auth("s3cret").oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// -- Policy Resolution --------------------------------------------------------

#[tokio::test]
async fn premium_market_never_falls_back_to_public_blob() {
    let response = test_app()
        .oneshot(post_json(
            "/v1/policy/resolve",
            json!({
                "requires_premium_access": true,
                "encrypted_evidence_blob_id": "",
                "oracle_evidence_blob_id": "pub123"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["blob_id"], Value::Null);
    assert_eq!(body["requires_premium"], true);
    assert_eq!(body["public_blob_id"], "pub123");
}

#[tokio::test]
async fn premium_market_resolves_encrypted_blob() {
    let response = test_app()
        .oneshot(post_json(
            "/v1/policy/resolve",
            json!({
                "requires_premium_access": true,
                "encrypted_evidence_blob_id": "enc456",
                "oracle_evidence_blob_id": "pub123"
            }),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["blob_id"], "enc456");
}

#[tokio::test]
async fn public_market_resolves_public_blob() {
    let response = test_app()
        .oneshot(post_json(
            "/v1/policy/resolve",
            json!({"oracle_evidence_blob_id": "pub123", "encrypted_evidence_blob_id": "enc456"}),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["blob_id"], "pub123");
    assert_eq!(body["encrypted_blob_id"], Value::Null);
}

#[tokio::test]
async fn malformed_market_is_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/v1/policy/resolve")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"requires_premium_access\": \"yes\""))
        .unwrap();
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["code"], "BAD_REQUEST");
}

// -- Blob Gateway -------------------------------------------------------------

#[tokio::test]
async fn uploaded_blob_reads_back() {
    let app = test_app();
    let upload = Request::builder()
        .method("POST")
        .uri("/v1/blobs")
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .body(Body::from(&b"evidence bytes"[..]))
        .unwrap();
    let response = app.clone().oneshot(upload).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["store"], "memory");
    let blob_id = body["blob_id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(get(&format!("/v1/blobs/{blob_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/octet-stream"
    );
    assert_eq!(body_bytes(response).await, b"evidence bytes");
}

#[tokio::test]
async fn empty_upload_is_rejected() {
    let request = Request::builder()
        .method("POST")
        .uri("/v1/blobs")
        .body(Body::empty())
        .unwrap();
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn unknown_blob_is_not_found() {
    let response = test_app().oneshot(get("/v1/blobs/deadbeef")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn escaped_url_syntax_in_blob_path_is_rejected() {
    let app = test_app();
    let upload = Request::builder()
        .method("POST")
        .uri("/v1/blobs")
        .body(Body::from("victim"))
        .unwrap();
    let response = app.clone().oneshot(upload).await.unwrap();
    let blob_id = body_json(response).await["blob_id"].as_str().unwrap().to_string();

    for suffix in ["%3Fx=1", "%23frag", "%2E"] {
        let response = app
            .clone()
            .oneshot(get(&format!("/v1/blobs/{blob_id}{suffix}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY, "{suffix}");
    }
    let response = app.oneshot(get("/v1/blobs/%2E%2E")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn placeholder_store_fabricates_ids_and_cannot_read() {
    let app = app_with(
        AppConfig::default(),
        PlaceholderStore.into(),
        unreachable_sui(),
    );
    let mut ids = Vec::new();
    for _ in 0..2 {
        let request = Request::builder()
            .method("POST")
            .uri("/v1/blobs")
            .body(Body::from("x"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let id = body_json(response).await["blob_id"].as_str().unwrap().to_string();
        assert!(PlaceholderStore::is_placeholder(&BlobId::new(id.clone()).unwrap()));
        ids.push(id);
    }
    assert_ne!(ids[0], ids[1]);

    let response = app
        .oneshot(get(&format!("/v1/blobs/{}", ids[0])))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
}

// -- Balances and Entitlements --------------------------------------------------

#[tokio::test]
async fn balance_reads_from_fullnode() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": "suix_getBalance"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {
                "coinType": wm_sui::DEFAULT_USDT_TYPE,
                "coinObjectCount": 1,
                "totalBalance": "12500000"
            }
        })))
        .mount(&server)
        .await;

    let app = app_with(AppConfig::default(), MemoryBlobStore::new().into(), sui_for(&server));
    let response = app
        .oneshot(get(&format!("/v1/balance/{OWNER}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["address"], OWNER);
    assert_eq!(body["raw"], "12500000");
    assert_eq!(body["formatted"], "12.5");
}

#[tokio::test]
async fn balance_with_bad_address_is_validation_error() {
    let response = test_app().oneshot(get("/v1/balance/alice")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn balance_hides_fullnode_failure_details() {
    let response = test_app()
        .oneshot(get(&format!("/v1/balance/{OWNER}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "UPSTREAM_ERROR");
    assert!(!body["error"]["message"].as_str().unwrap().contains("127.0.0.1"));
}

#[tokio::test]
async fn premium_tier_is_entitled() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": "suix_getDynamicFieldObject"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {"data": {"content": {"fields": {"value": "2"}}}}
        })))
        .mount(&server)
        .await;

    let app = app_with(AppConfig::default(), MemoryBlobStore::new().into(), sui_for(&server));
    let response = app
        .oneshot(get(&format!("/v1/entitlement/{REGISTRY}/{OWNER}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["premium"], true);
    assert_eq!(body["registry"], REGISTRY);
}

#[tokio::test]
async fn entitlement_fails_closed_when_fullnode_is_down() {
    let response = test_app()
        .oneshot(get(&format!("/v1/entitlement/{REGISTRY}/{OWNER}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["premium"], false);
}

#[tokio::test]
async fn default_registry_must_be_configured() {
    let response = test_app()
        .oneshot(get(&format!("/v1/entitlement/{OWNER}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn default_registry_is_used_when_configured() {
    let config = AppConfig {
        access_registry: Some(ObjectId::new(REGISTRY).unwrap()),
        ..AppConfig::default()
    };
    let app = app_with(config, MemoryBlobStore::new().into(), unreachable_sui());
    let response = app
        .oneshot(get(&format!("/v1/entitlement/{OWNER}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["registry"], REGISTRY);
    assert_eq!(body["premium"], false);
}

// -- Bet Validation -------------------------------------------------------------

#[tokio::test]
async fn valid_bet_is_quoted() {
    let response = test_app()
        .oneshot(post_json(
            "/v1/bets/validate",
            json!({
                "account": OWNER,
                "outcome": "yes",
                "amount": "10",
                "balance": "25.5",
                "price": "0.5"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["outcome"], "YES");
    assert_eq!(body["amount_raw"], "10000000");
    assert_eq!(body["quote"]["payout"], "20");
    assert_eq!(body["quote"]["profit"], "10");
    assert_eq!(body["quote"]["profit_bps"], 10_000);
}

#[tokio::test]
async fn bet_without_wallet_is_rejected() {
    let response = test_app()
        .oneshot(post_json(
            "/v1/bets/validate",
            json!({"outcome": "no", "amount": "1"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn bet_over_balance_is_rejected() {
    let response = test_app()
        .oneshot(post_json(
            "/v1/bets/validate",
            json!({"account": OWNER, "outcome": "no", "amount": "30", "balance": "25.5"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// -- OpenAPI ----------------------------------------------------------------------

#[tokio::test]
async fn openapi_document_is_served() {
    let response = test_app().oneshot(get("/openapi.json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["info"]["title"], "Walmarket Evidence API");
    assert!(body["paths"]["/v1/policy/resolve"].is_object());
}
