//! # Entitlement API
//!
//! Premium access check against an on-chain tier registry. Any lookup
//! failure answers `premium: false`.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use wm_sui::EntitlementSource;

use crate::error::AppError;
use crate::extractors::{parse_address, parse_object_id};
use crate::state::AppState;

/// Entitlement of one user in one registry.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EntitlementResponse {
    pub registry: String,
    pub address: String,
    pub premium: bool,
}

/// Build the entitlement router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/entitlement/:address", get(check_default_registry))
        .route("/v1/entitlement/:registry/:address", get(check_entitlement))
}

/// GET /v1/entitlement/{registry}/{address} — Premium access check.
#[utoipa::path(
    get,
    path = "/v1/entitlement/{registry}/{address}",
    params(
        ("registry" = String, Path, description = "Tier registry object ID"),
        ("address" = String, Path, description = "User address"),
    ),
    responses(
        (status = 200, description = "Entitlement", body = EntitlementResponse),
        (status = 422, description = "Invalid identifier", body = crate::error::ErrorBody),
    ),
    tag = "entitlement"
)]
async fn check_entitlement(
    State(state): State<AppState>,
    Path((registry, address)): Path<(String, String)>,
) -> Result<Json<EntitlementResponse>, AppError> {
    let registry = parse_object_id(&registry)?;
    let user = parse_address(&address)?;
    let premium = state.sui.has_premium_access(&user, &registry).await;
    Ok(Json(EntitlementResponse {
        registry: registry.to_string(),
        address: user.to_string(),
        premium,
    }))
}

/// GET /v1/entitlement/{address} — Premium access check against `ACCESS_REGISTRY_ID`.
#[utoipa::path(
    get,
    path = "/v1/entitlement/{address}",
    params(("address" = String, Path, description = "User address")),
    responses(
        (status = 200, description = "Entitlement", body = EntitlementResponse),
        (status = 404, description = "No default registry configured", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid address", body = crate::error::ErrorBody),
    ),
    tag = "entitlement"
)]
async fn check_default_registry(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<EntitlementResponse>, AppError> {
    let registry = state
        .config
        .access_registry
        .clone()
        .ok_or_else(|| AppError::NotFound("no default access registry configured".into()))?;
    let user = parse_address(&address)?;
    let premium = state.sui.has_premium_access(&user, &registry).await;
    Ok(Json(EntitlementResponse {
        registry: registry.to_string(),
        address: user.to_string(),
        premium,
    }))
}
