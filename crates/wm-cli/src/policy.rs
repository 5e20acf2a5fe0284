//! # Policy Subcommand
//!
//! Resolves the evidence blob for a market record stored as JSON.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde_json::json;

use wm_access::{encrypted_blob_id, public_blob_id, resolve_blob_id, MarketData};

/// Arguments for the `wm policy` subcommand.
#[derive(Args, Debug)]
pub struct PolicyArgs {
    #[command(subcommand)]
    pub command: PolicyCommand,
}

/// Policy subcommands.
#[derive(Subcommand, Debug)]
pub enum PolicyCommand {
    /// Print the blob a caller should fetch for a market.
    Resolve {
        /// Path to the market record (JSON).
        #[arg(value_name = "MARKET")]
        market: PathBuf,
        /// Print the full resolution as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Execute the policy subcommand.
pub fn run_policy(args: &PolicyArgs) -> Result<u8> {
    match &args.command {
        PolicyCommand::Resolve { market, json } => cmd_resolve(market, *json),
    }
}

/// Load a market record from disk.
pub fn load_market(path: &Path) -> Result<MarketData> {
    let bytes = crate::read_file(path)?;
    serde_json::from_slice(&bytes)
        .with_context(|| format!("failed to parse market record: {}", path.display()))
}

fn cmd_resolve(path: &Path, as_json: bool) -> Result<u8> {
    let market = load_market(path)?;
    let resolved = resolve_blob_id(&market);

    if as_json {
        let out = json!({
            "requires_premium": market.requires_premium(),
            "blob_id": resolved,
            "encrypted_blob_id": encrypted_blob_id(&market),
            "public_blob_id": public_blob_id(&market),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    }

    match resolved {
        Some(blob_id) => {
            if !as_json {
                println!("{blob_id}");
            }
            Ok(0)
        }
        None => {
            if !as_json {
                eprintln!("premium market has no encrypted evidence blob");
            }
            Ok(crate::EXIT_UNRESOLVED)
        }
    }
}
