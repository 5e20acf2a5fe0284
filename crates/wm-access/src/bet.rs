//! Bet intent validation and payout quotes.
//!
//! A bet is checked before anything is signed: a wallet must be connected,
//! an outcome chosen, and the amount must be a positive stable-asset
//! amount with at most 6 decimals that the caller can afford.

use serde::{Deserialize, Serialize};
use wm_core::{SuiAddress, UsdtAmount, ValidationError};

/// Side of a binary market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// The event happens.
    Yes,
    /// The event does not happen.
    No,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Yes => "YES",
            Self::No => "NO",
        })
    }
}

/// A validated bet, ready to be turned into a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetIntent {
    /// Bettor.
    pub account: SuiAddress,
    /// Chosen side.
    pub outcome: Outcome,
    /// Stake in raw units.
    pub amount: UsdtAmount,
}

impl BetIntent {
    /// Validate raw user input.
    ///
    /// `balance` is checked only when known; a balance still loading does
    /// not block validation.
    pub fn validate(
        account: Option<&SuiAddress>,
        outcome: Option<Outcome>,
        amount: &str,
        balance: Option<UsdtAmount>,
    ) -> Result<Self, ValidationError> {
        let account = account.ok_or(ValidationError::WalletNotConnected)?;
        let outcome = outcome.ok_or(ValidationError::MissingOutcome)?;
        if amount.trim().is_empty() {
            return Err(ValidationError::MissingAmount);
        }
        let amount = UsdtAmount::parse_decimal(amount)?;
        if amount.is_zero() {
            return Err(ValidationError::InvalidAmount {
                value: amount.to_decimal_string(),
                reason: "must be greater than zero".into(),
            });
        }
        if let Some(available) = balance {
            if amount > available {
                return Err(ValidationError::InsufficientBalance {
                    requested: amount.to_decimal_string(),
                    available: available.to_decimal_string(),
                });
            }
        }
        Ok(Self {
            account: account.clone(),
            outcome,
            amount,
        })
    }

    /// Payout if this bet wins at `price` per share.
    ///
    /// `price` is the cost of one share that pays out one unit of the
    /// stable asset, so it must lie in `(0, 1]`.
    pub fn quote(&self, price: UsdtAmount) -> Result<PayoutQuote, ValidationError> {
        PayoutQuote::new(self.amount, price)
    }
}

/// Expected return of a winning bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutQuote {
    /// Stake.
    pub stake: UsdtAmount,
    /// Shares bought, each redeemable for one unit when the bet wins.
    /// Expressed in raw units, so it is also the payout.
    pub payout: UsdtAmount,
    /// `payout - stake`.
    pub profit: UsdtAmount,
    /// Profit relative to stake, in basis points.
    pub profit_bps: u64,
}

impl PayoutQuote {
    /// Quote `stake` at `price` per share.
    pub fn new(stake: UsdtAmount, price: UsdtAmount) -> Result<Self, ValidationError> {
        let one = UsdtAmount::parse_decimal("1")?;
        if price.is_zero() || price > one {
            return Err(ValidationError::InvalidAmount {
                value: price.to_decimal_string(),
                reason: "share price must be greater than 0 and at most 1".into(),
            });
        }
        if stake.is_zero() {
            return Err(ValidationError::InvalidAmount {
                value: stake.to_decimal_string(),
                reason: "must be greater than zero".into(),
            });
        }
        let payout = u128::from(stake.raw()) * u128::from(one.raw()) / u128::from(price.raw());
        let payout = u64::try_from(payout).map_err(|_| ValidationError::InvalidAmount {
            value: stake.to_decimal_string(),
            reason: "payout overflows".into(),
        })?;
        let profit = payout.saturating_sub(stake.raw());
        let profit_bps = u128::from(profit) * 10_000 / u128::from(stake.raw());
        Ok(Self {
            stake,
            payout: UsdtAmount::from_raw(payout),
            profit: UsdtAmount::from_raw(profit),
            profit_bps: u64::try_from(profit_bps).unwrap_or(u64::MAX),
        })
    }
}
