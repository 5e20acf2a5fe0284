//! # Policy Resolution API
//!
//! Resolves which evidence blob a caller should fetch for a market record.
//! A premium market without an encrypted blob resolves to `null`, never to
//! its public blob.

use axum::extract::rejection::JsonRejection;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use wm_access::{encrypted_blob_id, public_blob_id, resolve_blob_id, MarketData};

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

/// Market metadata to resolve.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ResolveRequest {
    #[serde(default)]
    pub requires_premium_access: Option<bool>,
    #[serde(default)]
    pub encrypted_evidence_blob_id: Option<String>,
    #[serde(default)]
    pub oracle_evidence_blob_id: Option<String>,
}

impl From<ResolveRequest> for MarketData {
    fn from(req: ResolveRequest) -> Self {
        MarketData {
            requires_premium_access: req.requires_premium_access,
            encrypted_evidence_blob_id: req.encrypted_evidence_blob_id,
            oracle_evidence_blob_id: req.oracle_evidence_blob_id,
        }
    }
}

/// Resolution outcome.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ResolveResponse {
    /// Whether the market gates its evidence.
    pub requires_premium: bool,
    /// Blob to fetch; `null` when a premium market has no encrypted blob.
    pub blob_id: Option<String>,
    /// Encrypted blob, present only for premium markets.
    pub encrypted_blob_id: Option<String>,
    /// Public blob, `""` when none was recorded.
    pub public_blob_id: String,
}

impl ResolveResponse {
    fn for_market(market: &MarketData) -> Self {
        Self {
            requires_premium: market.requires_premium(),
            blob_id: resolve_blob_id(market).map(str::to_string),
            encrypted_blob_id: encrypted_blob_id(market).map(str::to_string),
            public_blob_id: public_blob_id(market).to_string(),
        }
    }
}

/// Build the policy router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/policy/resolve", post(resolve))
}

/// POST /v1/policy/resolve — Resolve the evidence blob for a market.
#[utoipa::path(
    post,
    path = "/v1/policy/resolve",
    request_body = ResolveRequest,
    responses(
        (status = 200, description = "Resolved blob", body = ResolveResponse),
        (status = 400, description = "Malformed body", body = crate::error::ErrorBody),
    ),
    tag = "policy"
)]
async fn resolve(
    body: Result<Json<ResolveRequest>, JsonRejection>,
) -> Result<Json<ResolveResponse>, AppError> {
    let market = MarketData::from(extract_json(body)?);
    let response = ResolveResponse::for_market(&market);
    if response.requires_premium && response.blob_id.is_none() {
        tracing::debug!("premium market has no encrypted evidence blob");
    }
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn premium_without_encrypted_blob_resolves_to_none() {
        let market = MarketData {
            requires_premium_access: Some(true),
            encrypted_evidence_blob_id: Some(String::new()),
            oracle_evidence_blob_id: Some("pub123".into()),
        };
        let resp = ResolveResponse::for_market(&market);
        assert!(resp.requires_premium);
        assert_eq!(resp.blob_id, None);
        assert_eq!(resp.encrypted_blob_id, None);
        assert_eq!(resp.public_blob_id, "pub123");
    }

    #[test]
    fn public_market_keeps_empty_id() {
        let resp = ResolveResponse::for_market(&MarketData::default());
        assert!(!resp.requires_premium);
        assert_eq!(resp.blob_id.as_deref(), Some(""));
    }
}
