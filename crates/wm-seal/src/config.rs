//! Key-server and client configuration.
//!
//! A [`SealConfig`] lists the key servers a client talks to and whether their
//! identities are verified against the known registry before use. Each
//! server contributes `weight` shares of every data key, so a threshold is
//! met by any subset of servers whose weights sum to at least `threshold`.

use serde::{Deserialize, Serialize};
use wm_core::ObjectId;
use zeroize::Zeroizing;

use crate::error::ConfigError;

/// Upper bound on total shares; share indices are non-zero bytes.
pub const MAX_TOTAL_WEIGHT: usize = 255;

/// One key-shard server's identity and trust weight.
///
/// Custom `Debug` redacts `api_key`.
#[derive(Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// On-chain object ID of the key server.
    pub object_id: ObjectId,
    /// Number of shares this server holds.
    pub weight: u8,
    /// HTTP header name the API key is sent under, if the server is gated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_name: Option<String>,
    /// API key value.
    #[serde(
        default,
        skip_serializing,
        deserialize_with = "deserialize_secret"
    )]
    pub api_key: Option<Zeroizing<String>>,
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<Zeroizing<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(|v| v.map(Zeroizing::new))
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("object_id", &self.object_id)
            .field("weight", &self.weight)
            .field("api_key_name", &self.api_key_name)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl ServerConfig {
    /// A server with the given weight and no API key.
    pub fn new(object_id: ObjectId, weight: u8) -> Self {
        Self {
            object_id,
            weight,
            api_key_name: None,
            api_key: None,
        }
    }
}

fn default_verify() -> bool {
    true
}

/// Encryption client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealConfig {
    /// Key servers, in share-assignment order.
    pub server_configs: Vec<ServerConfig>,
    /// Reject servers whose object IDs are not registered key servers.
    #[serde(default = "default_verify")]
    pub verify_key_servers: bool,
}

impl SealConfig {
    /// Configuration with verification enabled.
    pub fn new(server_configs: Vec<ServerConfig>) -> Self {
        Self {
            server_configs,
            verify_key_servers: true,
        }
    }

    /// Sum of server weights (the number of shares per data key).
    pub fn total_weight(&self) -> usize {
        self.server_configs.iter().map(|s| s.weight as usize).sum()
    }

    /// Check structural invariants: at least one server, no zero weights,
    /// no duplicates, total weight within bounds, API keys paired.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server_configs.is_empty() {
            return Err(ConfigError::NoServers);
        }
        let mut seen = std::collections::HashSet::new();
        for server in &self.server_configs {
            let id = server.object_id.to_string();
            if server.weight == 0 {
                return Err(ConfigError::ZeroWeight(id));
            }
            if server.api_key.is_some() != server.api_key_name.is_some() {
                return Err(ConfigError::PartialApiKey(id));
            }
            if !seen.insert(server.object_id.clone()) {
                return Err(ConfigError::DuplicateServer(id));
            }
        }
        let total = self.total_weight();
        if total > MAX_TOTAL_WEIGHT {
            return Err(ConfigError::WeightOverflow(total));
        }
        Ok(())
    }
}
