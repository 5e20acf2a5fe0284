//! # Blob Subcommand
//!
//! Uploads and downloads evidence blobs. Endpoints come from
//! `WALRUS_PUBLISHER_URL` / `WALRUS_AGGREGATOR_URL`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};

use wm_core::BlobId;
use wm_walrus::{AnyBlobStore, BlobStore, PlaceholderStore, WalrusClient, WalrusConfig};

/// Arguments for the `wm blob` subcommand.
#[derive(Args, Debug)]
pub struct BlobArgs {
    #[command(subcommand)]
    pub command: BlobCommand,
}

/// Blob subcommands.
#[derive(Subcommand, Debug)]
pub enum BlobCommand {
    /// Upload a file and print its blob ID.
    Put {
        /// File to upload.
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Storage epochs (overrides `WALRUS_EPOCHS`).
        #[arg(long)]
        epochs: Option<u32>,
        /// Fabricate an ID without uploading anything.
        #[arg(long)]
        placeholder: bool,
    },

    /// Download a blob.
    Get {
        /// Blob identifier.
        #[arg(value_name = "BLOB_ID")]
        blob_id: String,
        /// Write to this file instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

/// Execute the blob subcommand.
pub async fn run_blob(args: &BlobArgs) -> Result<u8> {
    match &args.command {
        BlobCommand::Put {
            file,
            epochs,
            placeholder,
        } => {
            let store = if *placeholder {
                AnyBlobStore::from(PlaceholderStore)
            } else {
                AnyBlobStore::from(walrus_client(*epochs)?)
            };
            let blob_id = put_file(&store, file).await?;
            println!("{blob_id}");
            Ok(0)
        }
        BlobCommand::Get { blob_id, output } => {
            let store = AnyBlobStore::from(walrus_client(None)?);
            get_to(&store, blob_id, output.as_deref()).await?;
            Ok(0)
        }
    }
}

fn walrus_client(epochs: Option<u32>) -> Result<WalrusClient> {
    let mut config = WalrusConfig::from_env().context("invalid Walrus configuration")?;
    if let Some(epochs) = epochs {
        if epochs == 0 {
            bail!("--epochs must be positive");
        }
        config.epochs = epochs;
    }
    tracing::debug!(publisher = %config.publisher_url, epochs = config.epochs, "walrus client");
    Ok(WalrusClient::new(config)?)
}

/// Upload the contents of `path`.
pub async fn put_file<S: BlobStore>(store: &S, path: &Path) -> Result<BlobId> {
    let bytes = crate::read_file(path)?;
    if bytes.is_empty() {
        bail!("refusing to upload empty file: {}", path.display());
    }
    let size = bytes.len();
    let blob_id = store
        .upload(bytes)
        .await
        .with_context(|| format!("failed to upload {}", path.display()))?;
    tracing::info!(blob_id = %blob_id, size, "uploaded");
    Ok(blob_id)
}

/// Download `blob_id` to `output`, or stdout.
pub async fn get_to<S: BlobStore>(store: &S, blob_id: &str, output: Option<&Path>) -> Result<()> {
    let blob_id = BlobId::new(blob_id)?;
    let bytes = store
        .fetch(&blob_id)
        .await
        .with_context(|| format!("failed to fetch blob {blob_id}"))?;
    crate::write_output(output, &bytes)
}
