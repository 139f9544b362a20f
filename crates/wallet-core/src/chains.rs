//! Chain Descriptor Store.
//!
//! Bundled chain definitions are merged with the registry persisted under
//! [`REGISTRY_KEY`]. The merged registry lives behind one lock; every
//! mutation that must survive a restart goes through [`ChainStore`] and is
//! followed by a full snapshot write.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use crate::error::WalletError;
use crate::storage::KvStore;
use crate::types::ChainDescriptor;

/// Storage key holding the JSON object `chain_name -> descriptor`.
pub const REGISTRY_KEY: &str = "chains";

const BUNDLED_SOURCES: &[(&str, &str)] = &[
    ("cosmoshub.json", include_str!("../chains/cosmoshub.json")),
    ("osmosis.json", include_str!("../chains/osmosis.json")),
    ("evmos.json", include_str!("../chains/evmos.json")),
];

/// The chain definitions shipped with the crate.
pub fn bundled_chains() -> Result<Vec<ChainDescriptor>, WalletError> {
    BUNDLED_SOURCES
        .iter()
        .map(|(file, raw)| {
            serde_json::from_str(raw)
                .map_err(|e| WalletError::Config(format!("bundled chain {file}: {e}")))
        })
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct ChainRegistry {
    chains: BTreeMap<String, ChainDescriptor>,
    selected: Option<String>,
    avatars: HashMap<String, String>,
}

impl ChainRegistry {
    /// Merge bundled definitions over a previously persisted registry.
    ///
    /// Bundled fields win, except `sdk_version`, which is kept from the
    /// persisted copy when present. Unknown persisted fields survive unless
    /// the bundled copy defines them too. Persisted-only chains are kept.
    pub fn merge(
        bundled: Vec<ChainDescriptor>,
        persisted: BTreeMap<String, ChainDescriptor>,
    ) -> Self {
        let mut chains = persisted;

        for fresh in bundled {
            let merged = match chains.remove(&fresh.chain_name) {
                Some(old) => merge_descriptor(fresh, old),
                None => fresh,
            };
            chains.insert(merged.chain_name.clone(), merged);
        }

        Self {
            chains,
            selected: None,
            avatars: HashMap::new(),
        }
    }

    pub fn get(&self, chain_name: &str) -> Option<&ChainDescriptor> {
        self.chains.get(chain_name)
    }

    pub fn chains(&self) -> impl Iterator<Item = &ChainDescriptor> {
        self.chains.values()
    }

    pub fn selected(&self) -> Option<&ChainDescriptor> {
        self.selected.as_deref().and_then(|name| self.chains.get(name))
    }

    pub fn select(&mut self, chain_name: &str) -> Result<(), WalletError> {
        if !self.chains.contains_key(chain_name) {
            return Err(WalletError::ChainNotFound(chain_name.to_string()));
        }
        self.selected = Some(chain_name.to_string());
        Ok(())
    }

    pub fn avatar(&self, identity: &str) -> Option<&str> {
        self.avatars.get(identity).map(String::as_str)
    }

    fn to_json(&self) -> Result<String, WalletError> {
        Ok(serde_json::to_string(&self.chains)?)
    }
}

fn merge_descriptor(bundled: ChainDescriptor, persisted: ChainDescriptor) -> ChainDescriptor {
    let mut merged = bundled;
    if persisted.sdk_version.is_some() {
        merged.sdk_version = persisted.sdk_version;
    }
    for (key, value) in persisted.extra {
        merged.extra.entry(key).or_insert(value);
    }
    merged
}

/// Shared handle to the chain registry. Clones share one registry.
#[derive(Clone)]
pub struct ChainStore {
    registry: Arc<Mutex<ChainRegistry>>,
    kv: Arc<dyn KvStore>,
}

impl ChainStore {
    pub fn load(
        bundled: Vec<ChainDescriptor>,
        kv: Arc<dyn KvStore>,
    ) -> Result<Self, WalletError> {
        let persisted = read_persisted(kv.as_ref())?;
        let registry = ChainRegistry::merge(bundled, persisted);
        tracing::debug!(chains = registry.chains.len(), "chain registry loaded");

        Ok(Self {
            registry: Arc::new(Mutex::new(registry)),
            kv,
        })
    }

    /// Point the selection at `chain_name`. An unknown name leaves the
    /// current selection untouched.
    pub fn select(&self, chain_name: &str) -> Result<(), WalletError> {
        self.registry.lock().select(chain_name)?;
        tracing::info!(chain = chain_name, "chain selected");
        Ok(())
    }

    pub fn selected(&self) -> Option<ChainDescriptor> {
        self.registry.lock().selected().cloned()
    }

    pub fn get(&self, chain_name: &str) -> Option<ChainDescriptor> {
        self.registry.lock().get(chain_name).cloned()
    }

    pub fn chain_names(&self) -> Vec<String> {
        self.registry.lock().chains.keys().cloned().collect()
    }

    pub fn snapshot(&self) -> ChainRegistry {
        self.registry.lock().clone()
    }

    pub fn persist(&self) -> Result<(), WalletError> {
        let registry = self.registry.lock();
        self.write(&registry)
    }

    /// Write a probed `sdk_version` into one descriptor and persist the
    /// whole registry before releasing the lock.
    ///
    /// Blocks on the backing store while the lock is held; async callers
    /// run it through `spawn_blocking`.
    pub fn record_sdk_version(&self, chain_name: &str, version: &str) -> Result<(), WalletError> {
        let mut registry = self.registry.lock();
        let chain = registry
            .chains
            .get_mut(chain_name)
            .ok_or_else(|| WalletError::ChainNotFound(chain_name.to_string()))?;
        chain.sdk_version = Some(version.to_string());
        self.write(&registry)
    }

    pub fn cache_avatar(&self, identity: impl Into<String>, url: impl Into<String>) {
        self.registry
            .lock()
            .avatars
            .insert(identity.into(), url.into());
    }

    pub fn avatar(&self, identity: &str) -> Option<String> {
        self.registry.lock().avatar(identity).map(str::to_string)
    }

    fn write(&self, registry: &ChainRegistry) -> Result<(), WalletError> {
        self.kv.put(REGISTRY_KEY, &registry.to_json()?)
    }
}

/// Descriptors that no longer parse are skipped so one stale entry cannot
/// block startup.
fn read_persisted(kv: &dyn KvStore) -> Result<BTreeMap<String, ChainDescriptor>, WalletError> {
    let Some(raw) = kv.get(REGISTRY_KEY)? else {
        return Ok(BTreeMap::new());
    };

    let entries: BTreeMap<String, Value> = match serde_json::from_str(&raw) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(error = %e, "persisted chain registry unreadable, ignoring");
            return Ok(BTreeMap::new());
        }
    };

    let mut chains = BTreeMap::new();
    for (name, value) in entries {
        match serde_json::from_value::<ChainDescriptor>(value) {
            Ok(chain) => {
                chains.insert(chain.chain_name.clone(), chain);
            }
            Err(e) => tracing::warn!(chain = %name, error = %e, "skipping persisted chain"),
        }
    }
    Ok(chains)
}
