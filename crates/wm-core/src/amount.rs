//! # Stable-Asset Amounts
//!
//! [`UsdtAmount`] holds raw on-chain units of the 6-decimal stable asset
//! markets settle in. Decimal strings typed by users are parsed exactly;
//! there is no floating-point path.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Number of decimal places of the stable asset.
pub const USDT_DECIMALS: u32 = 6;

const UNIT: u64 = 10u64.pow(USDT_DECIMALS);

/// An amount of the stable asset in raw units (1 USDT = 1_000_000).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsdtAmount(u64);

impl UsdtAmount {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Wrap raw units.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw units.
    pub fn raw(&self) -> u64 {
        self.0
    }

    /// Whether the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Parse a raw integer string as returned by fullnode RPC
    /// (`"totalBalance": "1500000"`).
    pub fn from_raw_str(s: &str) -> Result<Self, ValidationError> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|e| ValidationError::InvalidAmount {
                value: s.to_string(),
                reason: e.to_string(),
            })
    }

    /// Parse a user-entered decimal string such as `"12.5"`.
    pub fn parse_decimal(s: &str) -> Result<Self, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidAmount {
            value: s.to_string(),
            reason: reason.to_string(),
        };
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(invalid("empty"));
        }
        let (whole, frac) = match trimmed.split_once('.') {
            Some((w, f)) => (w, f),
            None => (trimmed, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid("no digits"));
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid("only digits and a single decimal point are allowed"));
        }
        if frac.len() > USDT_DECIMALS as usize {
            return Err(invalid("at most 6 decimal places"));
        }
        let whole_units: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("too large"))?
        };
        let frac_units: u64 = if frac.is_empty() {
            0
        } else {
            format!("{frac:0<6}").parse().map_err(|_| invalid("bad fraction"))?
        };
        whole_units
            .checked_mul(UNIT)
            .and_then(|v| v.checked_add(frac_units))
            .map(Self)
            .ok_or_else(|| invalid("too large"))
    }

    /// Format as a decimal string without trailing zeros (`"12.5"`, `"0"`).
    pub fn to_decimal_string(&self) -> String {
        let whole = self.0 / UNIT;
        let frac = self.0 % UNIT;
        if frac == 0 {
            return whole.to_string();
        }
        let frac = format!("{frac:06}");
        format!("{whole}.{}", frac.trim_end_matches('0'))
    }
}

impl std::fmt::Display for UsdtAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} USDT", self.to_decimal_string())
    }
}
