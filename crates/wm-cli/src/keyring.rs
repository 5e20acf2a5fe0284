//! # Local Key-Server Keyring
//!
//! YAML file describing the in-process key servers used by `wm seal`:
//!
//! ```yaml
//! threshold: 2
//! verify_key_servers: true
//! servers:
//!   - object_id: "0x…"
//!     weight: 1
//!     master_key: "<64 hex chars>"
//! ```
//!
//! Master keys are held in `Zeroizing` buffers and redacted in `Debug`.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroizing;

use wm_core::ObjectId;
use wm_seal::{ApproveAll, LocalKeyServer, LocalSealClient, SealConfig, ServerConfig};

fn default_verify() -> bool {
    true
}

/// One key server's identity and secret.
#[derive(Clone, Serialize, Deserialize)]
pub struct KeyServerEntry {
    pub object_id: ObjectId,
    pub weight: u8,
    #[serde(serialize_with = "serialize_secret", deserialize_with = "deserialize_secret")]
    pub master_key: Zeroizing<String>,
}

impl std::fmt::Debug for KeyServerEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyServerEntry")
            .field("object_id", &self.object_id)
            .field("weight", &self.weight)
            .field("master_key", &"[REDACTED]")
            .finish()
    }
}

fn serialize_secret<S: Serializer>(value: &Zeroizing<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value)
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Zeroizing<String>, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(Zeroizing::new)
}

/// A set of local key servers and the default encryption threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keyring {
    pub threshold: u8,
    #[serde(default = "default_verify")]
    pub verify_key_servers: bool,
    pub servers: Vec<KeyServerEntry>,
}

impl Keyring {
    /// Fresh servers with random identities and master keys, weight 1 each.
    pub fn generate(servers: u8, threshold: u8) -> Result<Self> {
        let mut entries = Vec::with_capacity(servers as usize);
        for _ in 0..servers {
            let mut id = [0u8; 32];
            OsRng.fill_bytes(&mut id);
            let mut master = Zeroizing::new([0u8; 32]);
            OsRng.fill_bytes(&mut master[..]);
            entries.push(KeyServerEntry {
                object_id: ObjectId::new(&format!("0x{}", hex::encode(id)))?,
                weight: 1,
                master_key: Zeroizing::new(hex::encode(&master[..])),
            });
        }
        let keyring = Self {
            threshold,
            verify_key_servers: true,
            servers: entries,
        };
        keyring.validate()?;
        Ok(keyring)
    }

    /// Sum of server weights.
    pub fn total_weight(&self) -> usize {
        self.servers.iter().map(|s| s.weight as usize).sum()
    }

    /// The threshold must be reachable with every server online.
    pub fn validate(&self) -> Result<()> {
        if self.servers.is_empty() {
            bail!("keyring lists no key servers");
        }
        if self.threshold == 0 {
            bail!("threshold must be at least 1");
        }
        if self.threshold as usize > self.total_weight() {
            bail!(
                "threshold {} exceeds total server weight {}",
                self.threshold,
                self.total_weight()
            );
        }
        Ok(())
    }

    /// Read and validate a keyring file.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = crate::read_file(path)?;
        let keyring: Self = serde_yaml::from_slice(&bytes)
            .with_context(|| format!("failed to parse keyring: {}", path.display()))?;
        keyring
            .validate()
            .with_context(|| format!("invalid keyring: {}", path.display()))?;
        Ok(keyring)
    }

    /// Write the keyring as YAML.
    pub fn save(&self, path: &Path) -> Result<()> {
        let yaml = Zeroizing::new(serde_yaml::to_string(self).context("failed to encode keyring")?);
        std::fs::write(path, yaml.as_bytes())
            .with_context(|| format!("failed to write keyring: {}", path.display()))
    }

    /// Start the key servers and a client that talks to all of them.
    pub fn client(&self) -> Result<LocalSealClient> {
        let mut servers = Vec::with_capacity(self.servers.len());
        for entry in &self.servers {
            let master = decode_master(entry)?;
            servers.push(Arc::new(LocalKeyServer::from_master(
                entry.object_id.clone(),
                master,
                Arc::new(ApproveAll),
            )));
        }
        let config = SealConfig {
            server_configs: self
                .servers
                .iter()
                .map(|s| ServerConfig::new(s.object_id.clone(), s.weight))
                .collect(),
            verify_key_servers: self.verify_key_servers,
        };
        Ok(LocalSealClient::new(config, &servers)?)
    }
}

fn decode_master(entry: &KeyServerEntry) -> Result<Zeroizing<[u8; 32]>> {
    let bytes = Zeroizing::new(
        hex::decode(entry.master_key.trim())
            .with_context(|| format!("master key of {} is not hex", entry.object_id))?,
    );
    if bytes.len() != 32 {
        bail!(
            "master key of {} must be 32 bytes, got {}",
            entry.object_id,
            bytes.len()
        );
    }
    let mut master = Zeroizing::new([0u8; 32]);
    master.copy_from_slice(&bytes);
    Ok(master)
}
