//! # wm CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use wm_cli::blob::{run_blob, BlobArgs};
use wm_cli::chain::{run_balance, run_tier, BalanceArgs, TierArgs};
use wm_cli::policy::{run_policy, PolicyArgs};
use wm_cli::seal::{run_seal, SealArgs};

/// Walmarket evidence stack CLI.
///
/// Resolves evidence blobs for market records, moves blobs in and out of
/// Walrus, reads balances and access tiers from a Sui fullnode, and runs
/// threshold encryption against local key servers.
#[derive(Parser, Debug)]
#[command(name = "wm", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evidence blob resolution for market records.
    Policy(PolicyArgs),

    /// Walrus blob upload and download.
    Blob(BlobArgs),

    /// Stable-asset balance of an address.
    Balance(BalanceArgs),

    /// Access tier of an address in a tier registry.
    Tier(TierArgs),

    /// Threshold encryption with local key servers.
    Seal(SealArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("wm CLI starting");

    let result = match &cli.command {
        Commands::Policy(args) => run_policy(args),
        Commands::Blob(args) => run_blob(args).await,
        Commands::Balance(args) => run_balance(args).await,
        Commands::Tier(args) => run_tier(args).await,
        Commands::Seal(args) => run_seal(args).await,
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
