//! # Balance and Tier Subcommands
//!
//! Read-only fullnode queries. The network comes from `SUI_NETWORK` /
//! `SUI_RPC_URL` unless `--network` is given.

use anyhow::{Context, Result};
use clap::Args;

use wm_core::{ObjectId, SuiAddress};
use wm_sui::{EntitlementSource, SuiClient, SuiConfig, SuiNetwork};

/// Arguments for `wm balance`.
#[derive(Args, Debug)]
pub struct BalanceArgs {
    /// Owner address.
    #[arg(value_name = "ADDRESS")]
    pub address: String,
    /// Network to query (mainnet, testnet, devnet, localnet).
    #[arg(long)]
    pub network: Option<SuiNetwork>,
}

/// Arguments for `wm tier`.
#[derive(Args, Debug)]
pub struct TierArgs {
    /// Tier registry object ID.
    #[arg(value_name = "REGISTRY")]
    pub registry: String,
    /// User address.
    #[arg(value_name = "ADDRESS")]
    pub address: String,
    /// Network to query (mainnet, testnet, devnet, localnet).
    #[arg(long)]
    pub network: Option<SuiNetwork>,
}

fn client(network: Option<SuiNetwork>) -> Result<SuiClient> {
    let config = match network {
        Some(network) => SuiConfig::for_network(network)?,
        None => SuiConfig::from_env().context("invalid Sui configuration")?,
    };
    tracing::debug!(network = %config.network, rpc = %config.rpc_url, "sui client");
    Ok(SuiClient::new(config)?)
}

/// Execute `wm balance`.
pub async fn run_balance(args: &BalanceArgs) -> Result<u8> {
    let owner = SuiAddress::new(&args.address)?;
    let client = client(args.network)?;
    let amount = client
        .get_usdt_balance(&owner)
        .await
        .with_context(|| format!("failed to read balance of {}", owner.abbreviated()))?;
    println!("{}", amount.to_decimal_string());
    Ok(0)
}

/// Execute `wm tier`.
///
/// Unlike the premium check served over HTTP, lookup failures are reported
/// rather than treated as the free tier.
pub async fn run_tier(args: &TierArgs) -> Result<u8> {
    let registry = ObjectId::new(&args.registry)?;
    let user = SuiAddress::new(&args.address)?;
    let client = client(args.network)?;
    let tier = client
        .tier(&user, &registry)
        .await
        .with_context(|| format!("failed to read tier of {}", user.abbreviated()))?;
    println!(
        "level={} premium={}",
        tier.level(),
        if tier.is_premium() { "yes" } else { "no" }
    );
    Ok(0)
}
