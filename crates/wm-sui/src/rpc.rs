//! Minimal Sui JSON-RPC 2.0 client.
//!
//! Only the read methods the evidence stack needs are wrapped. Calls are
//! not retried: balance pollers refresh on their own schedule and the
//! entitlement check fails closed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::SuiConfig;
use crate::error::SuiRpcError;

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// Client for a Sui fullnode.
#[derive(Debug, Clone)]
pub struct SuiClient {
    http: reqwest::Client,
    config: SuiConfig,
    next_id: Arc<AtomicU64>,
}

impl SuiClient {
    /// Create a client from configuration.
    pub fn new(config: SuiConfig) -> Result<Self, SuiRpcError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SuiRpcError::Http {
                method: "client build".into(),
                source: e,
            })?;
        Ok(Self {
            http,
            config,
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    /// Access the configuration.
    pub fn config(&self) -> &SuiConfig {
        &self.config
    }

    /// Invoke `method` with positional `params` and decode the result.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, SuiRpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        tracing::debug!(method, id, "sui rpc call");
        let resp = self
            .http
            .post(self.config.rpc_url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| SuiRpcError::Http {
                method: method.into(),
                source: e,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(SuiRpcError::Status {
                method: method.into(),
                status,
                body,
            });
        }

        let envelope: RpcResponse = resp.json().await.map_err(|e| SuiRpcError::Decode {
            method: method.into(),
            reason: e.to_string(),
        })?;

        if let Some(err) = envelope.error {
            return Err(SuiRpcError::Rpc {
                method: method.into(),
                code: err.code,
                message: err.message,
            });
        }

        let result = envelope.result.ok_or_else(|| SuiRpcError::Decode {
            method: method.into(),
            reason: "response has neither result nor error".into(),
        })?;
        serde_json::from_value(result).map_err(|e| SuiRpcError::Decode {
            method: method.into(),
            reason: e.to_string(),
        })
    }
}
