//! # Evidence Blob Resolution
//!
//! Decides which stored blob a caller should fetch for a market.
//!
//! ## Security Invariant
//!
//! A premium market never resolves to its public blob. When premium access
//! is required but no encrypted blob has been published, resolution yields
//! `None`; falling back to the public blob would expose gated evidence.
//!
//! Non-premium markets resolve to the public blob identifier verbatim,
//! including the empty string when none was recorded.

use serde::{Deserialize, Serialize};
use wm_core::{MarketId, ObjectId};

/// Market metadata as stored alongside a market.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketData {
    /// Whether evidence is gated behind premium access.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_premium_access: Option<bool>,
    /// Blob holding the threshold-encrypted premium evidence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_evidence_blob_id: Option<String>,
    /// Blob holding the public oracle evidence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oracle_evidence_blob_id: Option<String>,
}

impl MarketData {
    /// Whether premium access is required. Absent means no.
    pub fn requires_premium(&self) -> bool {
        self.requires_premium_access.unwrap_or(false)
    }
}

/// The encrypted evidence blob, only for premium markets with a non-empty id.
pub fn encrypted_blob_id(market: &MarketData) -> Option<&str> {
    if !market.requires_premium() {
        return None;
    }
    market
        .encrypted_evidence_blob_id
        .as_deref()
        .filter(|id| !id.is_empty())
}

/// The public evidence blob, or `""` when none was recorded.
pub fn public_blob_id(market: &MarketData) -> &str {
    market.oracle_evidence_blob_id.as_deref().unwrap_or("")
}

/// The blob a caller should fetch for `market`, if any.
pub fn resolve_blob_id(market: &MarketData) -> Option<&str> {
    if market.requires_premium() {
        encrypted_blob_id(market)
    } else {
        Some(public_blob_id(market))
    }
}

/// Per-request access descriptor for one market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPolicy {
    /// Market the policy governs.
    pub market_id: MarketId,
    /// Whether premium access is required.
    pub requires_premium: bool,
    /// Encrypted evidence blob; meaningful only when premium is required.
    pub encrypted_blob_id: String,
    /// Public evidence blob.
    pub public_blob_id: String,
    /// Package holding the on-chain access rule.
    pub encryption_package_id: ObjectId,
    /// Access rule identifier within the package.
    pub encryption_policy_id: String,
}

impl AccessPolicy {
    /// Build the descriptor for `market`.
    pub fn from_market(
        market_id: MarketId,
        market: &MarketData,
        encryption_package_id: ObjectId,
        encryption_policy_id: impl Into<String>,
    ) -> Self {
        Self {
            market_id,
            requires_premium: market.requires_premium(),
            encrypted_blob_id: market.encrypted_evidence_blob_id.clone().unwrap_or_default(),
            public_blob_id: public_blob_id(market).to_string(),
            encryption_package_id,
            encryption_policy_id: encryption_policy_id.into(),
        }
    }

    /// The market record this policy was built from.
    pub fn market_data(&self) -> MarketData {
        MarketData {
            requires_premium_access: Some(self.requires_premium),
            encrypted_evidence_blob_id: Some(self.encrypted_blob_id.clone())
                .filter(|id| !id.is_empty()),
            oracle_evidence_blob_id: Some(self.public_blob_id.clone()),
        }
    }

    /// See [`resolve_blob_id`].
    pub fn resolve(&self) -> Option<&str> {
        if self.requires_premium {
            Some(self.encrypted_blob_id.as_str()).filter(|id| !id.is_empty())
        } else {
            Some(self.public_blob_id.as_str())
        }
    }
}
