//! # Identifier Newtypes
//!
//! Domain-primitive newtypes for the identifiers the evidence stack passes
//! around. Each identifier is a distinct type — you cannot pass a
//! [`BlobId`] where an [`ObjectId`] is expected.
//!
//! ## Normalization
//!
//! [`SuiAddress`] and [`ObjectId`] accept `0x` followed by 1–64 hex digits
//! in either case and normalize to the canonical 64-digit lowercase form,
//! so `0x2` and `0x000…002` compare equal.
//!
//! All types serialize as plain strings.

use std::fmt;

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

type Blake2b256 = Blake2b<U32>;

/// Signature scheme flag for Ed25519 in Sui address derivation.
const ED25519_FLAG: u8 = 0x00;

/// Parse `0x`-prefixed hex of at most 32 bytes into its canonical form.
fn normalize_hex32(raw: &str) -> Option<String> {
    let digits = raw.trim().strip_prefix("0x")?;
    if digits.is_empty() || digits.len() > 64 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(format!("0x{:0>64}", digits.to_ascii_lowercase()))
}

// ---------------------------------------------------------------------------
// Sui addresses and object IDs
// ---------------------------------------------------------------------------

/// A 32-byte Sui account address in canonical `0x` + 64 hex form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SuiAddress(String);

impl SuiAddress {
    /// Parse and normalize a Sui address.
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        normalize_hex32(raw)
            .map(Self)
            .ok_or_else(|| ValidationError::InvalidAddress(raw.to_string()))
    }

    /// Derive the address owned by an Ed25519 public key:
    /// `BLAKE2b-256(0x00 || public_key)`.
    pub fn from_ed25519_public_key(public_key: &[u8; 32]) -> Self {
        let mut hasher = Blake2b256::new();
        hasher.update([ED25519_FLAG]);
        hasher.update(public_key);
        Self(format!("0x{}", hex::encode(hasher.finalize())))
    }

    /// Access the canonical string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short display form used in wallet badges: `0x1234...cdef`.
    pub fn abbreviated(&self) -> String {
        let s = self.0.as_str();
        format!("{}...{}", &s[..6], &s[s.len() - 4..])
    }
}

impl TryFrom<String> for SuiAddress {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<SuiAddress> for String {
    fn from(value: SuiAddress) -> Self {
        value.0
    }
}

impl fmt::Display for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for SuiAddress {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// A 32-byte Sui object identifier (packages, registries, key servers).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and normalize an object identifier.
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        normalize_hex32(raw)
            .map(Self)
            .ok_or_else(|| ValidationError::InvalidObjectId(raw.to_string()))
    }

    /// Access the canonical string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The 32 raw bytes of the identifier.
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        // Canonical form is always 0x + 64 valid hex digits.
        if let Ok(decoded) = hex::decode(&self.0[2..]) {
            out.copy_from_slice(&decoded);
        }
        out
    }
}

impl TryFrom<String> for ObjectId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<ObjectId> for String {
    fn from(value: ObjectId) -> Self {
        value.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ObjectId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ---------------------------------------------------------------------------
// Coin types
// ---------------------------------------------------------------------------

/// A fully-qualified Move coin type, `<package>::<module>::<Name>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CoinType(String);

impl CoinType {
    /// Validate a coin type string. The package address is normalized.
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidCoinType(raw.to_string());
        let mut parts = raw.trim().split("::");
        let (Some(package), Some(module), Some(name), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        let package = normalize_hex32(package).ok_or_else(invalid)?;
        let is_ident = |s: &str| {
            s.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
                && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        };
        if !is_ident(module) || !is_ident(name) {
            return Err(invalid());
        }
        Ok(Self(format!("{package}::{module}::{name}")))
    }

    /// Access the canonical string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CoinType {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<CoinType> for String {
    fn from(value: CoinType) -> Self {
        value.0
    }
}

impl fmt::Display for CoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Storage and market identifiers
// ---------------------------------------------------------------------------

/// Identifier of a blob in the permanent content store.
///
/// Walrus blob IDs are unpadded URL-safe base64; local stores use hex
/// digests. Only `[A-Za-z0-9_-]` is accepted, so an ID spliced into a URL
/// path is always exactly one segment: no query, fragment, escape or dot
/// segment can ride along.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BlobId(String);

impl BlobId {
    /// Validate a blob identifier.
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        let url_safe = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_';
        if raw.is_empty() || !raw.chars().all(url_safe) {
            return Err(ValidationError::InvalidBlobId(raw));
        }
        Ok(Self(raw))
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BlobId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BlobId> for String {
    fn from(value: BlobId) -> Self {
        value.0
    }
}

impl fmt::Display for BlobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a prediction market.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MarketId(String);

impl MarketId {
    /// Create a market identifier. Must be non-empty after trimming.
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ValidationError::EmptyMarketId);
        }
        Ok(Self(raw))
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MarketId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MarketId> for String {
    fn from(value: MarketId) -> Self {
        value.0
    }
}

impl fmt::Display for MarketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
