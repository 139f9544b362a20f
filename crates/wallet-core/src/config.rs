use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::WalletError;
use crate::types::{ChainDescriptor, WalletCredential};

/// Startup configuration, usually read from a JSON file.
///
/// ```json
/// {
///   "data_dir": "/var/lib/wallet",
///   "wallets": [{ "name": "admin", "private_key": "f78a…", "active": true }],
///   "chains": [{ "chain_name": "juno", "api_base_url": "…", "bech32_prefix": "juno" }]
/// }
/// ```
///
/// Without `data_dir` everything is kept in memory. Without `chains` the
/// bundled definitions are used.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoreConfig {
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub wallets: Vec<WalletEntry>,
    #[serde(default)]
    pub chains: Option<Vec<ChainDescriptor>>,
}

#[derive(Clone, Deserialize)]
pub struct WalletEntry {
    pub name: String,
    pub private_key: String,
    #[serde(default, alias = "latest")]
    pub active: bool,
}

impl fmt::Debug for WalletEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletEntry")
            .field("name", &self.name)
            .field("private_key", &"[REDACTED]")
            .field("active", &self.active)
            .finish()
    }
}

impl CoreConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, WalletError> {
        serde_json::from_str(raw).map_err(|e| WalletError::Config(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, WalletError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|e| WalletError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&raw)
    }

    /// Credentials built from the wallet entries, in file order.
    pub fn credentials(&self) -> Vec<WalletCredential> {
        self.wallets
            .iter()
            .map(|entry| {
                let credential = WalletCredential::new(&entry.name, &entry.private_key);
                if entry.active {
                    credential.active()
                } else {
                    credential
                }
            })
            .collect()
    }
}
