use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::chains::{self, ChainStore};
use crate::config::CoreConfig;
use crate::error::WalletError;
use crate::handoff::{Navigator, TxHandoff};
use crate::prober::{ProbeOutcome, VersionProber};
use crate::storage::{FileStore, InMemoryStore, KvStore};
use crate::wallet::WalletRegistry;

/// The assembled core: registry, wallets, handoff and the prober.
pub struct WalletCore {
    pub chains: ChainStore,
    pub wallets: WalletRegistry,
    pub handoff: TxHandoff,
    prober: VersionProber,
}

impl WalletCore {
    /// Build the core from configuration, backed by a file store when
    /// `data_dir` is set and by memory otherwise.
    pub fn bootstrap(config: CoreConfig, navigator: Arc<dyn Navigator>) -> Result<Self, WalletError> {
        let kv: Arc<dyn KvStore> = match &config.data_dir {
            Some(dir) => Arc::new(FileStore::open(dir)?),
            None => Arc::new(InMemoryStore::new()),
        };
        Self::with_store(config, kv, navigator)
    }

    pub fn with_store(
        config: CoreConfig,
        kv: Arc<dyn KvStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, WalletError> {
        let credentials = config.credentials();
        let bundled = match config.chains {
            Some(chains) => chains,
            None => chains::bundled_chains()?,
        };

        let chains = ChainStore::load(bundled, kv.clone())?;
        let wallets = WalletRegistry::new(credentials, chains.clone(), kv)?;
        let handoff = TxHandoff::new(chains.clone(), navigator);

        Ok(Self {
            chains,
            wallets,
            handoff,
            prober: VersionProber::http(),
        })
    }

    pub fn with_prober(mut self, prober: VersionProber) -> Self {
        self.prober = prober;
        self
    }

    /// Kick off background version detection for every chain.
    pub fn start_probes(&self) -> Vec<JoinHandle<ProbeOutcome>> {
        self.prober.spawn_all(&self.chains)
    }
}
