//! # API Route Modules
//!
//! - `policy`: evidence blob resolution for a market record.
//! - `blobs`: upload and download through the configured blob store.
//! - `balance`: stable-asset balance of an address.
//! - `entitlement`: fail-closed premium access check.
//! - `bets`: bet intent validation and payout quotes.

pub mod balance;
pub mod bets;
pub mod blobs;
pub mod entitlement;
pub mod policy;
