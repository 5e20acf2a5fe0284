//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into one document served at
//! `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI document for the API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Walmarket Evidence API",
        version = "0.1.0",
        description = "Evidence blob resolution, blob storage, balances, entitlement checks and bet validation for Walmarket prediction markets.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        crate::routes::policy::resolve,
        crate::routes::blobs::upload_blob,
        crate::routes::blobs::fetch_blob,
        crate::routes::balance::get_balance,
        crate::routes::entitlement::check_entitlement,
        crate::routes::entitlement::check_default_registry,
        crate::routes::bets::validate_bet,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::routes::policy::ResolveRequest,
        crate::routes::policy::ResolveResponse,
        crate::routes::blobs::UploadResponse,
        crate::routes::balance::BalanceResponse,
        crate::routes::entitlement::EntitlementResponse,
        crate::routes::bets::ValidateBetRequest,
        crate::routes::bets::ValidateBetResponse,
        crate::routes::bets::QuoteResponse,
    )),
    tags(
        (name = "policy", description = "Evidence blob resolution"),
        (name = "blobs", description = "Blob storage gateway"),
        (name = "balance", description = "Stable-asset balances"),
        (name = "entitlement", description = "Premium access checks"),
        (name = "bets", description = "Bet validation"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/v1/policy/resolve",
            "/v1/blobs",
            "/v1/blobs/{blob_id}",
            "/v1/balance/{address}",
            "/v1/entitlement/{address}",
            "/v1/entitlement/{registry}/{address}",
            "/v1/bets/validate",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
