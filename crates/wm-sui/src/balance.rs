//! Stable-asset balance queries and polling.
//!
//! [`SuiClient::get_balance`] wraps `suix_getBalance`. [`BalancePoller`]
//! keeps one address's stable-asset balance fresh in the background and
//! publishes each result on a `watch` channel, so any number of readers
//! see the latest value without issuing their own requests.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use wm_core::{CoinType, SuiAddress, UsdtAmount};

use crate::error::SuiRpcError;
use crate::rpc::SuiClient;

/// Result of `suix_getBalance`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    /// Coin type queried.
    pub coin_type: String,
    /// Number of coin objects the owner holds.
    pub coin_object_count: u64,
    /// Sum of all coin objects, in raw units, as a decimal string.
    pub total_balance: String,
}

impl SuiClient {
    /// Total balance of `coin_type` held by `owner`.
    pub async fn get_balance(
        &self,
        owner: &SuiAddress,
        coin_type: &CoinType,
    ) -> Result<Balance, SuiRpcError> {
        self.call(
            "suix_getBalance",
            json!([owner.as_str(), coin_type.as_str()]),
        )
        .await
    }

    /// Stable-asset balance of `owner`, using the configured coin type.
    pub async fn get_usdt_balance(&self, owner: &SuiAddress) -> Result<UsdtAmount, SuiRpcError> {
        let balance = self.get_balance(owner, &self.config().usdt_type).await?;
        UsdtAmount::from_raw_str(&balance.total_balance).map_err(|e| SuiRpcError::Decode {
            method: "suix_getBalance".into(),
            reason: e.to_string(),
        })
    }
}

/// Latest state of a polled balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BalanceState {
    /// No response yet.
    Loading,
    /// Most recent successful read.
    Ready(UsdtAmount),
    /// Most recent read failed.
    Failed(String),
}

impl BalanceState {
    /// The balance, if the last read succeeded.
    pub fn amount(&self) -> Option<UsdtAmount> {
        match self {
            Self::Ready(amount) => Some(*amount),
            _ => None,
        }
    }

    /// Display form: `"12.5"` when ready, `"0"` otherwise.
    pub fn formatted(&self) -> String {
        self.amount().unwrap_or(UsdtAmount::ZERO).to_decimal_string()
    }
}

/// Refreshes one address's stable-asset balance on a fixed period.
///
/// The background task stops when the poller is dropped.
#[derive(Debug)]
pub struct BalancePoller {
    receiver: watch::Receiver<BalanceState>,
    task: JoinHandle<()>,
}

impl BalancePoller {
    /// Start polling `owner` every `client.config().poll_interval`.
    ///
    /// The first read happens immediately. If a read overruns the period
    /// the missed tick is skipped rather than fired in a burst.
    pub fn spawn(client: SuiClient, owner: SuiAddress) -> Self {
        let period = client.config().poll_interval;
        Self::spawn_with_period(client, owner, period)
    }

    /// Start polling with an explicit period.
    pub fn spawn_with_period(client: SuiClient, owner: SuiAddress, period: Duration) -> Self {
        let (sender, receiver) = watch::channel(BalanceState::Loading);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let state = match client.get_usdt_balance(&owner).await {
                    Ok(amount) => BalanceState::Ready(amount),
                    Err(e) => {
                        tracing::warn!(owner = %owner, error = %e, "balance refresh failed");
                        BalanceState::Failed(e.to_string())
                    }
                };
                if sender.send(state).is_err() {
                    break;
                }
            }
        });
        Self { receiver, task }
    }

    /// The current state.
    pub fn current(&self) -> BalanceState {
        self.receiver.borrow().clone()
    }

    /// A receiver that observes every update.
    pub fn subscribe(&self) -> watch::Receiver<BalanceState> {
        self.receiver.clone()
    }
}

impl Drop for BalancePoller {
    fn drop(&mut self) {
        self.task.abort();
    }
}
