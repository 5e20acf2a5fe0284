//! # Evidence Service
//!
//! Fetches and publishes market evidence, composing the blob resolution
//! policy, blob storage, entitlement checks, and threshold encryption.
//!
//! ## Security Invariant
//!
//! Premium evidence is released only when all of the following hold:
//! a caller is connected, that caller holds a session key certified for
//! its own address, the entitlement source reports premium access, and the
//! key servers release enough shares. An entitlement lookup that errors
//! counts as no access.

use wm_core::{BlobId, MarketId, ObjectId, SuiAddress, ValidationError};
use wm_seal::{SealError, ThresholdBackend};
use wm_sui::{EntitlementSource, SuiRpcError};
use wm_walrus::{BlobStore, StorageError};

use crate::context::RequestContext;
use crate::policy::{AccessPolicy, MarketData};

/// Errors from evidence access.
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// No caller, or no usable session key, for premium evidence.
    #[error("authentication required: {0}")]
    Unauthenticated(&'static str),

    /// The caller is not entitled to premium evidence.
    #[error("{user} does not have premium access to market {market}")]
    Forbidden {
        /// Caller address.
        user: SuiAddress,
        /// Market requested.
        market: MarketId,
    },

    /// No evidence blob has been published for this market.
    #[error("no evidence available for market {0}")]
    EvidenceUnavailable(MarketId),

    /// A recorded blob identifier is malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Blob storage failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Encryption or decryption failed.
    #[error("encryption gateway error: {0}")]
    Seal(#[from] SealError),

    /// Chain query failed.
    #[error("sui rpc error: {0}")]
    Rpc(#[from] SuiRpcError),
}

/// Evidence fetched for a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evidence {
    /// Blob the evidence was read from.
    pub blob_id: BlobId,
    /// Whether the blob was premium (decrypted for the caller).
    pub premium: bool,
    /// Evidence bytes, decrypted if premium.
    pub bytes: Vec<u8>,
}

/// Gatekeeper for market evidence.
#[derive(Debug)]
pub struct EvidenceService<S, E, B> {
    store: S,
    entitlements: E,
    backend: B,
    registry: ObjectId,
    threshold: u8,
}

impl<S, E, B> EvidenceService<S, E, B>
where
    S: BlobStore,
    E: EntitlementSource,
    B: ThresholdBackend,
{
    /// Build a service checking entitlements against `registry` and
    /// encrypting premium evidence with `threshold` shares.
    pub fn new(store: S, entitlements: E, backend: B, registry: ObjectId, threshold: u8) -> Self {
        Self {
            store,
            entitlements,
            backend,
            registry,
            threshold,
        }
    }

    /// The blob store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetch the evidence `ctx`'s caller may see for the market `policy`
    /// describes.
    pub async fn fetch_evidence(
        &self,
        ctx: &RequestContext<'_>,
        policy: &AccessPolicy,
    ) -> Result<Evidence, AccessError> {
        let Some(raw_id) = policy.resolve().filter(|id| !id.is_empty()) else {
            return Err(AccessError::EvidenceUnavailable(policy.market_id.clone()));
        };
        let blob_id = BlobId::new(raw_id)?;

        if !policy.requires_premium {
            let bytes = self.store.fetch(&blob_id).await?;
            tracing::debug!(market = %policy.market_id, blob_id = %blob_id, "public evidence served");
            return Ok(Evidence {
                blob_id,
                premium: false,
                bytes,
            });
        }

        let caller = ctx
            .caller
            .ok_or(AccessError::Unauthenticated("connect a wallet to view premium evidence"))?;
        let session = ctx
            .session
            .ok_or(AccessError::Unauthenticated("a session key is required for premium evidence"))?;
        if session.address() != caller {
            return Err(AccessError::Unauthenticated(
                "session key was certified for a different address",
            ));
        }

        if !self
            .entitlements
            .has_premium_access(caller, &self.registry)
            .await
        {
            tracing::info!(market = %policy.market_id, user = %caller, "premium evidence denied");
            return Err(AccessError::Forbidden {
                user: caller.clone(),
                market: policy.market_id.clone(),
            });
        }

        let ciphertext = self.store.fetch(&blob_id).await?;
        let bytes = wm_seal::decrypt(&self.backend, &ciphertext, session, ctx.tx_bytes).await?;
        tracing::info!(market = %policy.market_id, user = %caller, blob_id = %blob_id, "premium evidence served");
        Ok(Evidence {
            blob_id,
            premium: true,
            bytes,
        })
    }

    /// Upload a market's evidence and return the market record pointing
    /// at it.
    ///
    /// `public` is stored as-is. `premium`, if given, is encrypted under
    /// `(package_id, policy_id)` before upload and the market is marked as
    /// requiring premium access.
    pub async fn publish_evidence(
        &self,
        market_id: &MarketId,
        public: Vec<u8>,
        premium: Option<Vec<u8>>,
        package_id: &ObjectId,
        policy_id: &str,
    ) -> Result<MarketData, AccessError> {
        let public_id = self.store.upload(public).await?;

        let encrypted_id = match premium {
            Some(plaintext) => {
                let ciphertext = wm_seal::encrypt(
                    &self.backend,
                    plaintext,
                    self.threshold,
                    package_id.clone(),
                    policy_id,
                )
                .await?;
                Some(self.store.upload(ciphertext).await?)
            }
            None => None,
        };

        tracing::info!(
            market = %market_id,
            public_blob = %public_id,
            premium = encrypted_id.is_some(),
            "evidence published"
        );
        Ok(MarketData {
            requires_premium_access: Some(encrypted_id.is_some()),
            encrypted_evidence_blob_id: encrypted_id.map(String::from),
            oracle_evidence_blob_id: Some(public_id.into()),
        })
    }
}
