//! # Balance API
//!
//! Stable-asset balance of an address, read from the fullnode with the
//! configured coin type.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::parse_address;
use crate::state::AppState;

/// Balance of one owner.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BalanceResponse {
    pub address: String,
    pub coin_type: String,
    /// Raw units as a decimal string.
    pub raw: String,
    /// Decimal amount without trailing zeros.
    pub formatted: String,
}

/// Build the balance router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/balance/:address", get(get_balance))
}

/// GET /v1/balance/{address} — Stable-asset balance.
#[utoipa::path(
    get,
    path = "/v1/balance/{address}",
    params(("address" = String, Path, description = "Owner address")),
    responses(
        (status = 200, description = "Balance", body = BalanceResponse),
        (status = 422, description = "Invalid address", body = crate::error::ErrorBody),
        (status = 502, description = "Fullnode unavailable", body = crate::error::ErrorBody),
    ),
    tag = "balance"
)]
async fn get_balance(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<BalanceResponse>, AppError> {
    let owner = parse_address(&address)?;
    let amount = state.sui.get_usdt_balance(&owner).await?;
    Ok(Json(BalanceResponse {
        address: owner.to_string(),
        coin_type: state.sui.config().usdt_type.to_string(),
        raw: amount.raw().to_string(),
        formatted: amount.to_decimal_string(),
    }))
}
