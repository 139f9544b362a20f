use std::sync::Arc;

use chain_cosmos::codec;
use secrecy::ExposeSecret;

use crate::address;
use crate::chains::ChainStore;
use crate::error::WalletError;
use crate::storage::KvStore;
use crate::types::{ChainDescriptor, ConnectedIdentity, ConnectionRecord, DerivedAddress, WalletCredential};

impl ConnectedIdentity {
    /// Decode a connection record. An empty address means "not connected".
    pub fn from_record(record: &ConnectionRecord) -> Result<Option<Self>, WalletError> {
        if record.cosmos_address.is_empty() {
            return Ok(None);
        }
        let (source_prefix, raw_address_bytes) = codec::from_bech32(&record.cosmos_address)?;
        Ok(Some(Self {
            source_prefix,
            raw_address_bytes,
        }))
    }
}

/// Locally held credentials plus the per-chain connected identity.
pub struct WalletRegistry {
    credentials: Vec<WalletCredential>,
    chains: ChainStore,
    kv: Arc<dyn KvStore>,
    session: Option<ConnectionRecord>,
}

impl WalletRegistry {
    pub fn new(
        credentials: Vec<WalletCredential>,
        chains: ChainStore,
        kv: Arc<dyn KvStore>,
    ) -> Result<Self, WalletError> {
        if credentials.is_empty() {
            return Err(WalletError::EmptyWallet);
        }
        let active = credentials.iter().filter(|c| c.is_active).count();
        if active > 1 {
            return Err(WalletError::Config(format!(
                "{active} credentials flagged active, at most one allowed"
            )));
        }

        Ok(Self {
            credentials,
            chains,
            kv,
            session: None,
        })
    }

    pub fn credentials(&self) -> &[WalletCredential] {
        &self.credentials
    }

    /// The flagged credential, or the first one when none is flagged.
    pub fn active_credential(&self) -> &WalletCredential {
        self.credentials
            .iter()
            .find(|c| c.is_active)
            .unwrap_or(&self.credentials[0])
    }

    /// Install a connection for this session only; it shadows persisted
    /// records until [`disconnect`](Self::disconnect).
    pub fn set_connected(&mut self, record: ConnectionRecord) {
        self.session = Some(record);
    }

    pub fn connected_identity(
        &self,
        chain: &ChainDescriptor,
    ) -> Result<Option<ConnectedIdentity>, WalletError> {
        if let Some(record) = self.session.as_ref().filter(|r| !r.cosmos_address.is_empty()) {
            return ConnectedIdentity::from_record(record);
        }

        match self.kv.get_json::<ConnectionRecord>(&chain.hd_path)? {
            Some(record) => ConnectedIdentity::from_record(&record),
            None => Ok(None),
        }
    }

    /// The connected account rendered under the selected chain's prefix.
    ///
    /// Empty when nothing is connected or the address cannot be resolved;
    /// callers treat `""` as "do not query".
    pub fn current_address(&self) -> String {
        let Some(chain) = self.chains.selected() else {
            return String::new();
        };

        let identity = match self.connected_identity(&chain) {
            Ok(Some(identity)) => identity,
            Ok(None) => return String::new(),
            Err(e) => {
                tracing::warn!(chain = %chain.chain_name, error = %e, "unreadable connected identity");
                return String::new();
            }
        };

        let prefix = if chain.bech32_prefix.is_empty() {
            &identity.source_prefix
        } else {
            &chain.bech32_prefix
        };

        codec::to_bech32(&identity.raw_address_bytes, prefix).unwrap_or_else(|e| {
            tracing::warn!(chain = %chain.chain_name, error = %e, "cannot render address");
            String::new()
        })
    }

    /// Last four characters of [`current_address`](Self::current_address).
    pub fn short_address(&self) -> String {
        let address = self.current_address();
        if address.len() > 4 {
            address[address.len() - 4..].to_string()
        } else {
            String::new()
        }
    }

    /// Native address of the active credential under the selected chain's curve.
    pub fn hex_address(&self) -> Result<DerivedAddress, WalletError> {
        let chain = self.chains.selected().ok_or(WalletError::NoChainSelected)?;
        self.hex_address_on(&chain)
    }

    /// Native address of the active credential under `chain.curve`.
    pub fn hex_address_on(&self, chain: &ChainDescriptor) -> Result<DerivedAddress, WalletError> {
        let credential = self.active_credential();
        address::derive_address_from_hex(credential.private_key.expose_secret(), chain.curve)
    }

    /// Bech32 address of the active credential on the selected chain.
    pub fn sender_address(&self) -> Result<String, WalletError> {
        let chain = self.chains.selected().ok_or(WalletError::NoChainSelected)?;
        self.sender_address_on(&chain)
    }

    /// Bech32 address of the active credential on `chain`. Curve and
    /// prefix both come from the one descriptor.
    pub fn sender_address_on(&self, chain: &ChainDescriptor) -> Result<String, WalletError> {
        let derived = self.hex_address_on(chain)?;
        address::resolve_display_address(&derived.hex, chain)
    }

    /// Forget the connection for `chain` and drop session state.
    pub fn disconnect(&mut self, chain: &ChainDescriptor) -> Result<(), WalletError> {
        self.kv.remove(&chain.hd_path)?;
        self.session = None;
        tracing::info!(chain = %chain.chain_name, "wallet disconnected");
        Ok(())
    }
}
