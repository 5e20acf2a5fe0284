//! # wm-cli — Operator CLI for the Evidence Stack
//!
//! Provides the `wm` command-line interface.
//!
//! ## Subcommands
//!
//! - `wm policy resolve` — which evidence blob a market record resolves to.
//! - `wm blob put|get` — Walrus uploads and downloads.
//! - `wm balance` — stable-asset balance of an address.
//! - `wm tier` — access tier of an address in a tier registry.
//! - `wm seal keygen|encrypt|decrypt` — threshold encryption with local key
//!   servers described by a YAML keyring.
//!
//! ## Exit Codes
//!
//! `0` on success, `1` on error, `2` when a market resolves to no blob.

pub mod blob;
pub mod chain;
pub mod keyring;
pub mod policy;
pub mod seal;

use std::path::Path;

use anyhow::{Context, Result};

/// Exit code for a premium market with no encrypted blob.
pub const EXIT_UNRESOLVED: u8 = 2;

/// Read a whole file, naming it in the error.
pub(crate) fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Write bytes to `path`, or to stdout when `path` is `None`.
pub(crate) fn write_output(path: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, bytes)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            use std::io::Write;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes).context("failed to write to stdout")?;
            stdout.flush().context("failed to flush stdout")
        }
    }
}
