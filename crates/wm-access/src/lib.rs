//! # wm-access — Evidence Access Layer
//!
//! Everything that decides who sees which evidence:
//!
//! - [`policy`] — pure blob resolution for a market record.
//! - [`bet`] — validation of a bet before it is signed.
//! - [`context`] — the explicit per-request caller context.
//! - [`evidence`] — the service that fetches and publishes evidence,
//!   gating premium content on entitlement and threshold decryption.

pub mod bet;
pub mod context;
pub mod evidence;
pub mod policy;

pub use bet::{BetIntent, Outcome, PayoutQuote};
pub use context::RequestContext;
pub use evidence::{AccessError, Evidence, EvidenceService};
pub use policy::{encrypted_blob_id, public_blob_id, resolve_blob_id, AccessPolicy, MarketData};
