#![deny(missing_docs)]

//! # wm-core — Foundational Types for the Walmarket Evidence Stack
//!
//! This crate defines the types every other crate in the workspace depends
//! on. It has no internal crate dependencies — only `serde`, `serde_json`,
//! `thiserror`, `sha2`, `blake2` and `hex` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for chain identifiers.** A [`SuiAddress`] cannot be
//!    passed where an [`ObjectId`] is expected, and neither can be confused
//!    with a storage [`BlobId`]. Formats are validated at construction time.
//!
//! 2. **Integer amounts only.** [`UsdtAmount`] carries raw on-chain units
//!    (6 decimals). Decimal strings are parsed exactly; floats never enter
//!    the amount path.
//!
//! 3. **[`WmError`] hierarchy.** Structured errors with `thiserror` — no
//!    `Box<dyn Error>`, no `.unwrap()` outside tests.

pub mod amount;
pub mod digest;
pub mod error;
pub mod identity;

// Re-export primary types at crate root for ergonomic imports.
pub use amount::{UsdtAmount, USDT_DECIMALS};
pub use digest::{sha256_digest, ContentDigest};
pub use error::{ValidationError, WmError};
pub use identity::{BlobId, CoinType, MarketId, ObjectId, SuiAddress};
