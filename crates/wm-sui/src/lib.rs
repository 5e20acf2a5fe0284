//! # wm-sui — Sui Reads for the Evidence Stack
//!
//! Read-only access to a Sui fullnode over JSON-RPC:
//!
//! - [`SuiClient::get_balance`] / [`SuiClient::get_usdt_balance`] — the
//!   stable-asset balance a bettor can stake.
//! - [`BalancePoller`] — background refresh of one address's balance,
//!   published on a `watch` channel.
//! - [`EntitlementSource`] — premium tier lookup from the on-chain
//!   registry, with a fail-closed boolean check.
//!
//! Transactions are never built or signed here; wallet signing belongs to
//! the client holding the keys.

pub mod balance;
pub mod config;
pub mod entitlement;
pub mod error;
pub mod rpc;

pub use balance::{Balance, BalancePoller, BalanceState};
pub use config::{ConfigError, SuiConfig, SuiNetwork, DEFAULT_POLL_INTERVAL, DEFAULT_USDT_TYPE};
pub use entitlement::{AccessTier, EntitlementSource, StaticEntitlements};
pub use error::SuiRpcError;
pub use rpc::SuiClient;
