//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor. Everything here is cheap to clone.

use std::fmt;

use wm_core::ObjectId;
use wm_sui::{SuiClient, SuiConfig, SuiRpcError};
use wm_walrus::{AnyBlobStore, MemoryBlobStore, PlaceholderStore, StorageError, WalrusClient, WalrusConfig};
use zeroize::Zeroizing;

/// Which blob store backs `/v1/blobs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// Walrus publisher/aggregator.
    #[default]
    Walrus,
    /// Process-local memory.
    Memory,
    /// Fabricated IDs, no persistence.
    Placeholder,
}

impl std::str::FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "walrus" => Ok(Self::Walrus),
            "memory" => Ok(Self::Memory),
            "placeholder" => Ok(Self::Placeholder),
            _ => Err(ConfigError::UnknownStorage(s.to_string())),
        }
    }
}

/// Application configuration.
///
/// Custom `Debug` redacts the auth token.
#[derive(Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Static bearer token. If `None`, authentication is disabled.
    pub auth_token: Option<Zeroizing<String>>,
    /// Blob store selection.
    pub storage: StorageBackend,
    /// Default tier registry for entitlement checks.
    pub access_registry: Option<ObjectId>,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .field("storage", &self.storage)
            .field("access_registry", &self.access_registry)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            auth_token: None,
            storage: StorageBackend::default(),
            access_registry: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `PORT` (default: 8080)
    /// - `AUTH_TOKEN` (optional; unset disables auth)
    /// - `WM_STORAGE` (`walrus` | `memory` | `placeholder`, default: `walrus`)
    /// - `ACCESS_REGISTRY_ID` (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        let storage = match std::env::var("WM_STORAGE") {
            Ok(raw) => raw.parse()?,
            Err(_) => StorageBackend::default(),
        };
        let access_registry = match std::env::var("ACCESS_REGISTRY_ID") {
            Ok(raw) => Some(
                ObjectId::new(&raw).map_err(|e| ConfigError::InvalidRegistry(e.to_string()))?,
            ),
            Err(_) => None,
        };
        Ok(Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            auth_token: std::env::var("AUTH_TOKEN")
                .ok()
                .filter(|t| !t.is_empty())
                .map(Zeroizing::new),
            storage,
            access_registry,
        })
    }
}

/// Configuration errors raised while building state.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `WM_STORAGE` names no known backend.
    #[error("unknown WM_STORAGE {0:?}; expected walrus, memory or placeholder")]
    UnknownStorage(String),
    /// `ACCESS_REGISTRY_ID` is not an object ID.
    #[error("invalid ACCESS_REGISTRY_ID: {0}")]
    InvalidRegistry(String),
    /// Storage client setup failed.
    #[error("storage: {0}")]
    Storage(#[from] StorageError),
    /// Sui client setup failed.
    #[error("sui: {0}")]
    Sui(#[from] SuiRpcError),
}

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Configuration the state was built from.
    pub config: AppConfig,
    /// Blob store behind `/v1/blobs`.
    pub blobs: AnyBlobStore,
    /// Fullnode client for balances and entitlements.
    pub sui: SuiClient,
}

impl AppState {
    /// Assemble state from parts.
    pub fn new(config: AppConfig, blobs: AnyBlobStore, sui: SuiClient) -> Self {
        Self { config, blobs, sui }
    }

    /// Build clients from environment configuration.
    pub fn from_env(config: AppConfig) -> Result<Self, ConfigError> {
        let blobs = match config.storage {
            StorageBackend::Walrus => {
                let walrus = WalrusConfig::from_env().map_err(StorageError::from)?;
                AnyBlobStore::from(WalrusClient::new(walrus)?)
            }
            StorageBackend::Memory => AnyBlobStore::from(MemoryBlobStore::new()),
            StorageBackend::Placeholder => {
                tracing::warn!("placeholder storage selected: uploads are not persisted");
                AnyBlobStore::from(PlaceholderStore)
            }
        };
        let sui = SuiClient::new(SuiConfig::from_env().map_err(SuiRpcError::from)?)?;
        Ok(Self::new(config, blobs, sui))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_names_parse() {
        assert_eq!("memory".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
        assert_eq!("Walrus".parse::<StorageBackend>().unwrap(), StorageBackend::Walrus);
        assert!("s3".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn config_debug_redacts_token() {
        let config = AppConfig {
            auth_token: Some(Zeroizing::new("tok-123".into())),
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("tok-123"));
    }
}
