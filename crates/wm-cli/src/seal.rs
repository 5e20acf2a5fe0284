//! # Seal Subcommand
//!
//! Threshold encryption against the local key servers in a keyring file.
//! Every server in the keyring approves every certified user, so this is
//! an operator tool for preparing and checking premium evidence, not an
//! access-control boundary.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Args, Subcommand};
use ed25519_dalek::SigningKey;
use rand_core::OsRng;
use zeroize::Zeroizing;

use wm_core::ObjectId;
use wm_seal::{EncryptedObject, SessionKey};

use crate::keyring::Keyring;

/// Session lifetime used for CLI decryption.
const SESSION_TTL_MIN: u16 = 10;

/// Arguments for the `wm seal` subcommand.
#[derive(Args, Debug)]
pub struct SealArgs {
    #[command(subcommand)]
    pub command: SealCommand,
}

/// Seal subcommands.
#[derive(Subcommand, Debug)]
pub enum SealCommand {
    /// Generate a keyring of local key servers.
    Keygen {
        /// Number of key servers.
        #[arg(long, default_value_t = 3)]
        servers: u8,
        /// Shares needed to decrypt.
        #[arg(long, default_value_t = 2)]
        threshold: u8,
        /// Keyring file to write.
        #[arg(long, short, default_value = "keyring.yaml")]
        output: PathBuf,
        /// Overwrite an existing keyring.
        #[arg(long)]
        force: bool,
    },

    /// Encrypt a file under a package and policy.
    Encrypt {
        /// Keyring file.
        #[arg(long)]
        keyring: PathBuf,
        /// Package holding the access policy.
        #[arg(long)]
        package: String,
        /// Policy identifier within the package.
        #[arg(long)]
        policy: String,
        /// Override the keyring's threshold.
        #[arg(long)]
        threshold: Option<u8>,
        /// File to encrypt.
        #[arg(value_name = "FILE")]
        input: PathBuf,
        /// Write ciphertext here instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Decrypt a file produced by `wm seal encrypt`.
    Decrypt {
        /// Keyring file.
        #[arg(long)]
        keyring: PathBuf,
        /// Hex-encoded 32-byte wallet key certifying the session. A
        /// throwaway wallet is used when omitted.
        #[arg(long)]
        wallet_key: Option<PathBuf>,
        /// File to decrypt.
        #[arg(value_name = "FILE")]
        input: PathBuf,
        /// Write plaintext here instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

/// Execute the seal subcommand.
pub async fn run_seal(args: &SealArgs) -> Result<u8> {
    match &args.command {
        SealCommand::Keygen {
            servers,
            threshold,
            output,
            force,
        } => cmd_keygen(*servers, *threshold, output, *force),
        SealCommand::Encrypt {
            keyring,
            package,
            policy,
            threshold,
            input,
            output,
        } => {
            let keyring = Keyring::load(keyring)?;
            let package = ObjectId::new(package)?;
            let ciphertext = encrypt_file(&keyring, &package, policy, *threshold, input).await?;
            crate::write_output(output.as_deref(), &ciphertext)?;
            Ok(0)
        }
        SealCommand::Decrypt {
            keyring,
            wallet_key,
            input,
            output,
        } => {
            let keyring = Keyring::load(keyring)?;
            let wallet = match wallet_key {
                Some(path) => load_wallet(path)?,
                None => SigningKey::generate(&mut OsRng),
            };
            let plaintext = Zeroizing::new(decrypt_file(&keyring, &wallet, input).await?);
            crate::write_output(output.as_deref(), &plaintext)?;
            Ok(0)
        }
    }
}

fn cmd_keygen(servers: u8, threshold: u8, output: &Path, force: bool) -> Result<u8> {
    if output.exists() && !force {
        bail!(
            "{} already exists; pass --force to overwrite",
            output.display()
        );
    }
    let keyring = Keyring::generate(servers, threshold)?;
    keyring.save(output)?;

    println!("OK: generated {servers} key servers (threshold {threshold})");
    println!("  Keyring: {}", output.display());
    for server in &keyring.servers {
        println!("  {}", server.object_id);
    }
    Ok(0)
}

/// Encrypt the contents of `input`.
pub async fn encrypt_file(
    keyring: &Keyring,
    package: &ObjectId,
    policy: &str,
    threshold: Option<u8>,
    input: &Path,
) -> Result<Vec<u8>> {
    let payload = crate::read_file(input)?;
    let client = keyring.client()?;
    let threshold = threshold.unwrap_or(keyring.threshold);
    let ciphertext = wm_seal::encrypt(&client, payload, threshold, package.clone(), policy)
        .await
        .with_context(|| format!("failed to encrypt {}", input.display()))?;
    tracing::info!(package = %package, policy, threshold, "encrypted");
    Ok(ciphertext)
}

/// Decrypt the contents of `input` with a fresh session certified by `wallet`.
pub async fn decrypt_file(keyring: &Keyring, wallet: &SigningKey, input: &Path) -> Result<Vec<u8>> {
    let ciphertext = crate::read_file(input)?;
    let envelope = EncryptedObject::from_bytes(&ciphertext)
        .with_context(|| format!("{} is not an encrypted object", input.display()))?;
    let session = SessionKey::new(wallet, envelope.package_id, SESSION_TTL_MIN, Utc::now())?;
    let client = keyring.client()?;
    let plaintext = wm_seal::decrypt(&client, &ciphertext, &session, None)
        .await
        .with_context(|| format!("failed to decrypt {}", input.display()))?;
    Ok(plaintext)
}

fn load_wallet(path: &Path) -> Result<SigningKey> {
    let raw = Zeroizing::new(
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read wallet key: {}", path.display()))?,
    );
    let bytes = Zeroizing::new(hex::decode(raw.trim()).context("invalid wallet key hex")?);
    let key: [u8; 32] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| anyhow::anyhow!("wallet key must be 32 bytes, got {}", bytes.len()))?;
    Ok(SigningKey::from_bytes(&key))
}
