//! Walrus storage configuration.
//!
//! Publisher (writes) and aggregator (reads) are separate services with
//! separate base URLs. Defaults point to the public testnet deployment.
//! Override via environment variables or explicit construction for local
//! nodes and tests.

use url::Url;

/// Default public testnet publisher.
pub const DEFAULT_PUBLISHER_URL: &str = "https://publisher.walrus-testnet.walrus.space";

/// Default public testnet aggregator.
pub const DEFAULT_AGGREGATOR_URL: &str = "https://aggregator.walrus-testnet.walrus.space";

/// Configuration for connecting to Walrus.
#[derive(Debug, Clone)]
pub struct WalrusConfig {
    /// Base URL of the publisher that accepts `PUT /v1/blobs`.
    pub publisher_url: Url,
    /// Base URL of the aggregator that serves `GET /v1/blobs/{id}`.
    pub aggregator_url: Url,
    /// Storage epochs to pay for on upload.
    pub epochs: u32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl WalrusConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `WALRUS_PUBLISHER_URL` (default: [`DEFAULT_PUBLISHER_URL`])
    /// - `WALRUS_AGGREGATOR_URL` (default: [`DEFAULT_AGGREGATOR_URL`])
    /// - `WALRUS_EPOCHS` (default: 1, must be positive)
    /// - `WALRUS_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let epochs = match std::env::var("WALRUS_EPOCHS") {
            Ok(raw) => match raw.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => return Err(ConfigError::InvalidEpochs(raw)),
            },
            Err(_) => 1,
        };
        Ok(Self {
            publisher_url: env_url("WALRUS_PUBLISHER_URL", DEFAULT_PUBLISHER_URL)?,
            aggregator_url: env_url("WALRUS_AGGREGATOR_URL", DEFAULT_AGGREGATOR_URL)?,
            epochs,
            timeout_secs: std::env::var("WALRUS_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        })
    }

    /// A configuration whose publisher and aggregator are the same local
    /// server (for testing).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if `base` cannot be parsed.
    pub fn local_mock(base: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(base)
            .map_err(|e| ConfigError::InvalidUrl("local_mock".to_string(), e.to_string()))?;
        Ok(Self {
            publisher_url: url.clone(),
            aggregator_url: url,
            epochs: 1,
            timeout_secs: 5,
        })
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A URL variable did not parse.
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    /// `WALRUS_EPOCHS` is not a positive integer.
    #[error("WALRUS_EPOCHS must be a positive integer, got {0:?}")]
    InvalidEpochs(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_mock_uses_one_server() {
        let cfg = WalrusConfig::local_mock("http://127.0.0.1:9100").unwrap();
        assert_eq!(cfg.publisher_url, cfg.aggregator_url);
        assert_eq!(cfg.publisher_url.as_str(), "http://127.0.0.1:9100/");
        assert_eq!(cfg.epochs, 1);
    }

    #[test]
    fn env_url_falls_back_to_default() {
        let url = env_url("WM_WALRUS_UNSET_VAR_7731", DEFAULT_AGGREGATOR_URL).unwrap();
        assert_eq!(url.host_str(), Some("aggregator.walrus-testnet.walrus.space"));
    }

    #[test]
    fn local_mock_rejects_garbage() {
        assert!(matches!(
            WalrusConfig::local_mock("not a url"),
            Err(ConfigError::InvalidUrl(..))
        ));
    }
}
