//! # Premium Entitlement
//!
//! A user's access tier lives in an on-chain registry table keyed by
//! address. No entry means the free tier; tier 1 and above is premium.
//!
//! ## Security Invariant
//!
//! [`EntitlementSource::has_premium_access`] fails closed. Any transport,
//! RPC or decoding failure is logged and answered with `false`. Callers
//! that need to tell "not premium" from "could not check" use
//! [`EntitlementSource::tier`].

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use wm_core::{ObjectId, SuiAddress};

use crate::error::SuiRpcError;
use crate::rpc::SuiClient;

const GET_FIELD: &str = "suix_getDynamicFieldObject";

/// A user's access level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "tier", content = "level")]
pub enum AccessTier {
    /// Level 0, or no registry entry.
    Free,
    /// Level 1 or above.
    Premium(u64),
}

impl AccessTier {
    /// Classify a raw registry level.
    pub fn from_level(level: u64) -> Self {
        if level == 0 {
            Self::Free
        } else {
            Self::Premium(level)
        }
    }

    /// The raw level.
    pub fn level(&self) -> u64 {
        match self {
            Self::Free => 0,
            Self::Premium(level) => *level,
        }
    }

    /// Whether this tier unlocks premium evidence.
    pub fn is_premium(&self) -> bool {
        matches!(self, Self::Premium(_))
    }
}

/// Where access tiers come from.
pub trait EntitlementSource: Send + Sync {
    /// Look up `user`'s tier in `registry`.
    fn tier(
        &self,
        user: &SuiAddress,
        registry: &ObjectId,
    ) -> impl Future<Output = Result<AccessTier, SuiRpcError>> + Send;

    /// Whether `user` holds premium access. Errors count as no.
    fn has_premium_access(
        &self,
        user: &SuiAddress,
        registry: &ObjectId,
    ) -> impl Future<Output = bool> + Send {
        async move {
            match self.tier(user, registry).await {
                Ok(tier) => tier.is_premium(),
                Err(e) => {
                    tracing::warn!(
                        user = %user,
                        registry = %registry,
                        error = %e,
                        "entitlement check failed; denying premium access"
                    );
                    false
                }
            }
        }
    }
}

impl EntitlementSource for SuiClient {
    async fn tier(&self, user: &SuiAddress, registry: &ObjectId) -> Result<AccessTier, SuiRpcError> {
        let response: Value = self
            .call(
                GET_FIELD,
                json!([registry.as_str(), {"type": "address", "value": user.as_str()}]),
            )
            .await?;
        let level = registry_level(&response)?;
        tracing::debug!(user = %user, level, "access tier resolved");
        Ok(AccessTier::from_level(level))
    }
}

/// Extract the tier level from a `suix_getDynamicFieldObject` result.
///
/// A `dynamicFieldNotFound` error inside the result is the free tier. The
/// field value may be a JSON number or, for `u64`, a decimal string.
fn registry_level(response: &Value) -> Result<u64, SuiRpcError> {
    let decode = |reason: String| SuiRpcError::Decode {
        method: GET_FIELD.into(),
        reason,
    };

    if let Some(error) = response.get("error") {
        return match error.get("code").and_then(Value::as_str) {
            Some("dynamicFieldNotFound") => Ok(0),
            _ => Err(decode(format!("object error: {error}"))),
        };
    }

    let value = response
        .pointer("/data/content/fields/value")
        .ok_or_else(|| decode("missing data.content.fields.value".into()))?;
    match value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| decode(format!("tier {n} is not an unsigned integer"))),
        Value::String(s) => s
            .parse()
            .map_err(|_| decode(format!("tier {s:?} is not an unsigned integer"))),
        other => Err(decode(format!("unexpected tier value {other}"))),
    }
}

/// Fixed tiers held in memory, for local runs and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticEntitlements {
    tiers: Arc<RwLock<HashMap<(ObjectId, SuiAddress), u64>>>,
}

impl StaticEntitlements {
    /// An empty table; everyone is free tier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `user`'s level in `registry`.
    pub fn set(&self, registry: ObjectId, user: SuiAddress, level: u64) {
        self.tiers.write().insert((registry, user), level);
    }
}

impl EntitlementSource for StaticEntitlements {
    async fn tier(&self, user: &SuiAddress, registry: &ObjectId) -> Result<AccessTier, SuiRpcError> {
        let level = self
            .tiers
            .read()
            .get(&(registry.clone(), user.clone()))
            .copied()
            .unwrap_or(0);
        Ok(AccessTier::from_level(level))
    }
}
