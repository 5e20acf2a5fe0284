//! Sui fullnode configuration.
//!
//! The network defaults to testnet. `SUI_RPC_URL` overrides the network's
//! public fullnode, e.g. to point at a private RPC provider.

use std::time::Duration;

use url::Url;
use wm_core::CoinType;

/// Default stable-asset coin type on testnet.
pub const DEFAULT_USDT_TYPE: &str =
    "0x6e930c6b39d8a77e4e755148564207a801d0a2f550ec306fee7b9b913ed6f17d::usdt::USDT";

/// Default balance refresh period.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// A Sui network with a public fullnode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuiNetwork {
    /// Production network.
    Mainnet,
    /// Public test network.
    #[default]
    Testnet,
    /// Developer network, wiped periodically.
    Devnet,
    /// A node on this machine.
    Localnet,
}

impl SuiNetwork {
    /// The network's public fullnode JSON-RPC endpoint.
    pub fn fullnode_url(&self) -> &'static str {
        match self {
            Self::Mainnet => "https://fullnode.mainnet.sui.io:443",
            Self::Testnet => "https://fullnode.testnet.sui.io:443",
            Self::Devnet => "https://fullnode.devnet.sui.io:443",
            Self::Localnet => "http://127.0.0.1:9000",
        }
    }

    /// Lowercase network name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
            Self::Devnet => "devnet",
            Self::Localnet => "localnet",
        }
    }
}

impl std::fmt::Display for SuiNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SuiNetwork {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            "devnet" => Ok(Self::Devnet),
            "localnet" => Ok(Self::Localnet),
            _ => Err(ConfigError::UnknownNetwork(s.to_string())),
        }
    }
}

/// Configuration for talking to a Sui fullnode.
#[derive(Debug, Clone)]
pub struct SuiConfig {
    /// Network the RPC URL belongs to.
    pub network: SuiNetwork,
    /// JSON-RPC endpoint.
    pub rpc_url: Url,
    /// Coin type whose balance is reported as the stable asset.
    pub usdt_type: CoinType,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Balance refresh period for pollers.
    pub poll_interval: Duration,
}

impl SuiConfig {
    /// Configuration for `network` with its public fullnode and defaults.
    pub fn for_network(network: SuiNetwork) -> Result<Self, ConfigError> {
        Ok(Self {
            network,
            rpc_url: parse_url("network", network.fullnode_url())?,
            usdt_type: parse_coin_type(DEFAULT_USDT_TYPE)?,
            timeout_secs: 30,
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `SUI_NETWORK` (default: `testnet`)
    /// - `SUI_RPC_URL` (default: the network's public fullnode)
    /// - `USDT_TYPE` (default: [`DEFAULT_USDT_TYPE`])
    /// - `SUI_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let network = match std::env::var("SUI_NETWORK") {
            Ok(raw) => raw.parse()?,
            Err(_) => SuiNetwork::default(),
        };
        let mut config = Self::for_network(network)?;
        if let Ok(raw) = std::env::var("SUI_RPC_URL") {
            config.rpc_url = parse_url("SUI_RPC_URL", &raw)?;
        }
        if let Ok(raw) = std::env::var("USDT_TYPE") {
            config.usdt_type = parse_coin_type(&raw)?;
        }
        if let Some(secs) = std::env::var("SUI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.timeout_secs = secs;
        }
        Ok(config)
    }

    /// A localnet configuration pointed at `rpc_url` (for testing).
    pub fn local_mock(rpc_url: &str) -> Result<Self, ConfigError> {
        let mut config = Self::for_network(SuiNetwork::Localnet)?;
        config.rpc_url = parse_url("local_mock", rpc_url)?;
        config.timeout_secs = 5;
        Ok(config)
    }
}

fn parse_url(var: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

fn parse_coin_type(raw: &str) -> Result<CoinType, ConfigError> {
    CoinType::new(raw).map_err(|e| ConfigError::InvalidCoinType(e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `SUI_NETWORK` is not a known network.
    #[error("unknown Sui network {0:?}; expected mainnet, testnet, devnet or localnet")]
    UnknownNetwork(String),
    /// A URL did not parse.
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    /// `USDT_TYPE` is not a Move type tag.
    #[error("invalid USDT_TYPE: {0}")]
    InvalidCoinType(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn testnet_is_default() {
        assert_eq!(SuiNetwork::default(), SuiNetwork::Testnet);
        let cfg = SuiConfig::for_network(SuiNetwork::default()).unwrap();
        assert_eq!(cfg.rpc_url.host_str(), Some("fullnode.testnet.sui.io"));
        assert_eq!(cfg.poll_interval, Duration::from_secs(5));
    }

    #[test]
    fn default_usdt_type_parses() {
        let cfg = SuiConfig::for_network(SuiNetwork::Mainnet).unwrap();
        assert!(cfg.usdt_type.as_str().ends_with("::usdt::USDT"));
    }

    #[test]
    fn network_names_round_trip() {
        for net in [
            SuiNetwork::Mainnet,
            SuiNetwork::Testnet,
            SuiNetwork::Devnet,
            SuiNetwork::Localnet,
        ] {
            assert_eq!(net.to_string().parse::<SuiNetwork>().unwrap(), net);
        }
        assert_eq!("MAINNET".parse::<SuiNetwork>().unwrap(), SuiNetwork::Mainnet);
    }

    #[test]
    fn unknown_network_rejected() {
        assert!(matches!(
            "moonnet".parse::<SuiNetwork>(),
            Err(ConfigError::UnknownNetwork(_))
        ));
    }

    #[test]
    fn local_mock_overrides_url() {
        let cfg = SuiConfig::local_mock("http://127.0.0.1:19000").unwrap();
        assert_eq!(cfg.network, SuiNetwork::Localnet);
        assert_eq!(cfg.rpc_url.as_str(), "http://127.0.0.1:19000/");
    }
}
