//! # Bet Validation API
//!
//! Checks a bet before the caller signs anything and, when a share price
//! is supplied, quotes the payout of a win.

use axum::extract::rejection::JsonRejection;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use wm_access::{BetIntent, Outcome, PayoutQuote};
use wm_core::UsdtAmount;

use crate::error::AppError;
use crate::extractors::{extract_json, parse_address};
use crate::state::AppState;

/// Raw bet input as entered by the user.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ValidateBetRequest {
    /// Connected wallet; absent when no wallet is connected.
    #[serde(default)]
    pub account: Option<String>,
    /// `"yes"` or `"no"`.
    #[serde(default)]
    pub outcome: Option<String>,
    /// Decimal stake, at most 6 decimals.
    #[serde(default)]
    pub amount: String,
    /// Known balance in decimal units; omitted while still loading.
    #[serde(default)]
    pub balance: Option<String>,
    /// Share price in decimal units, in `(0, 1]`.
    #[serde(default)]
    pub price: Option<String>,
}

/// A validated bet.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ValidateBetResponse {
    pub account: String,
    /// `"YES"` or `"NO"`.
    pub outcome: String,
    /// Stake in raw units.
    pub amount_raw: String,
    pub amount: String,
    pub quote: Option<QuoteResponse>,
}

/// Payout of a winning bet.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuoteResponse {
    pub payout: String,
    pub profit: String,
    pub profit_bps: u64,
}

impl From<PayoutQuote> for QuoteResponse {
    fn from(q: PayoutQuote) -> Self {
        Self {
            payout: q.payout.to_decimal_string(),
            profit: q.profit.to_decimal_string(),
            profit_bps: q.profit_bps,
        }
    }
}

fn parse_outcome(raw: &str) -> Result<Outcome, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "yes" => Ok(Outcome::Yes),
        "no" => Ok(Outcome::No),
        other => Err(AppError::Validation(format!(
            "outcome must be \"yes\" or \"no\", got {other:?}"
        ))),
    }
}

/// Build the bets router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/bets/validate", post(validate_bet))
}

/// POST /v1/bets/validate — Validate a bet and quote its payout.
#[utoipa::path(
    post,
    path = "/v1/bets/validate",
    request_body = ValidateBetRequest,
    responses(
        (status = 200, description = "Bet is valid", body = ValidateBetResponse),
        (status = 400, description = "Malformed body", body = crate::error::ErrorBody),
        (status = 422, description = "Bet rejected", body = crate::error::ErrorBody),
    ),
    tag = "bets"
)]
async fn validate_bet(
    body: Result<Json<ValidateBetRequest>, JsonRejection>,
) -> Result<Json<ValidateBetResponse>, AppError> {
    let req = extract_json(body)?;
    let account = req.account.as_deref().map(parse_address).transpose()?;
    let outcome = req.outcome.as_deref().map(parse_outcome).transpose()?;
    let balance = req
        .balance
        .as_deref()
        .map(UsdtAmount::parse_decimal)
        .transpose()?;

    let intent = BetIntent::validate(account.as_ref(), outcome, &req.amount, balance)?;
    let quote = match req.price.as_deref() {
        Some(price) => Some(intent.quote(UsdtAmount::parse_decimal(price)?)?.into()),
        None => None,
    };

    tracing::debug!(account = %intent.account, outcome = %intent.outcome, "bet validated");
    Ok(Json(ValidateBetResponse {
        account: intent.account.to_string(),
        outcome: intent.outcome.to_string(),
        amount_raw: intent.amount.raw().to_string(),
        amount: intent.amount.to_decimal_string(),
        quote,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_is_case_insensitive() {
        assert_eq!(parse_outcome("YES").unwrap(), Outcome::Yes);
        assert_eq!(parse_outcome(" no ").unwrap(), Outcome::No);
        assert!(matches!(parse_outcome("maybe"), Err(AppError::Validation(_))));
    }
}
