//! Transaction Handoff: a single-slot channel between the caller that builds
//! a signing intent and the external flow that confirms it.
//!
//! `Idle --open--> Open --confirmed--> Idle`. Opening while already open
//! replaces the pending request and its callback; the last request wins.

use std::mem;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::chains::ChainStore;
use crate::error::WalletError;
use crate::types::{SigningRequest, TxEvent};
use crate::wallet::WalletRegistry;

/// Runs once when the pending request is confirmed.
pub type Completion = Box<dyn FnOnce() + Send>;

/// Receives routes such as `/{chain_name}/tx/{hash}`.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

#[derive(Default)]
pub enum HandoffState {
    #[default]
    Idle,
    Open {
        request: SigningRequest,
        on_confirmed: Option<Completion>,
    },
}

pub struct TxHandoff {
    state: HandoffState,
    chains: ChainStore,
    navigator: Arc<dyn Navigator>,
}

impl TxHandoff {
    pub fn new(chains: ChainStore, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            state: HandoffState::Idle,
            chains,
            navigator,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, HandoffState::Open { .. })
    }

    pub fn request(&self) -> Option<&SigningRequest> {
        match &self.state {
            HandoffState::Open { request, .. } => Some(request),
            HandoffState::Idle => None,
        }
    }

    /// Package a signing intent for the active credential on the selected
    /// chain. On error the handoff is left as it was.
    pub fn open<P: Serialize + ?Sized>(
        &mut self,
        wallets: &WalletRegistry,
        tx_type: &str,
        params: &P,
        callback: Option<Completion>,
    ) -> Result<(), WalletError> {
        let chain = self.chains.selected().ok_or(WalletError::NoChainSelected)?;
        let sender = wallets.sender_address_on(&chain)?;
        let serialized_params = serde_json::to_string(params)?;
        let signing_key = SecretString::from(
            wallets
                .active_credential()
                .private_key
                .expose_secret()
                .to_owned(),
        );

        let request = SigningRequest {
            sender,
            tx_type: tx_type.to_string(),
            target_endpoint: chain.api_base_url,
            serialized_params,
            signing_key,
        };
        self.replace(request, callback);
        Ok(())
    }

    /// Open with caller-supplied sender and endpoint. A callback registered
    /// by an earlier [`open`](Self::open) stays pending.
    pub fn open_with_argument<P: Serialize + ?Sized>(
        &mut self,
        wallets: &WalletRegistry,
        tx_type: &str,
        sender: &str,
        endpoint: &str,
        params: &P,
    ) -> Result<(), WalletError> {
        let serialized_params = serde_json::to_string(params)?;
        let signing_key = SecretString::from(
            wallets
                .active_credential()
                .private_key
                .expose_secret()
                .to_owned(),
        );

        let request = SigningRequest {
            sender: sender.to_string(),
            tx_type: tx_type.to_string(),
            target_endpoint: endpoint.to_string(),
            serialized_params,
            signing_key,
        };

        let pending = match mem::take(&mut self.state) {
            HandoffState::Open { on_confirmed, .. } => on_confirmed,
            HandoffState::Idle => None,
        };
        self.state = HandoffState::Open {
            request,
            on_confirmed: pending,
        };
        Ok(())
    }

    /// Re-serialize the parameters of the pending request.
    pub fn set_params<P: Serialize + ?Sized>(&mut self, params: &P) -> Result<(), WalletError> {
        if let HandoffState::Open { request, .. } = &mut self.state {
            request.serialized_params = serde_json::to_string(params)?;
        }
        Ok(())
    }

    /// Fire the pending callback, if any, for the confirmed `tx` and return
    /// to idle.
    ///
    /// Returns whether a callback ran. Confirming while idle does nothing.
    pub fn confirmed(&mut self, tx: &TxEvent) -> bool {
        match mem::take(&mut self.state) {
            HandoffState::Open {
                request,
                on_confirmed,
            } => {
                tracing::info!(
                    tx_type = %request.tx_type,
                    sender = %request.sender,
                    event_type = %tx.event_type,
                    hash = ?tx.hash,
                    "transaction confirmed"
                );
                match on_confirmed {
                    Some(callback) => {
                        callback();
                        true
                    }
                    None => false,
                }
            }
            HandoffState::Idle => {
                tracing::debug!(hash = ?tx.hash, "confirmation with no open request");
                false
            }
        }
    }

    /// Route to the transaction page for `event`, when it carries a hash.
    /// The pending callback is not touched.
    pub fn view(&self, event: &TxEvent) -> Option<String> {
        tracing::debug!(event_type = %event.event_type, hash = ?event.hash, "transaction event");
        let hash = event.hash.as_deref().filter(|h| !h.is_empty())?;
        let chain = self.chains.selected()?;
        let path = format!("/{}/tx/{}", chain.chain_name, hash);
        self.navigator.navigate(&path);
        Some(path)
    }

    fn replace(&mut self, request: SigningRequest, callback: Option<Completion>) {
        if let HandoffState::Open {
            request: previous,
            on_confirmed,
        } = &self.state
        {
            tracing::debug!(
                previous = %previous.tx_type,
                dropped_callback = on_confirmed.is_some(),
                "replacing pending signing request"
            );
        }
        tracing::info!(tx_type = %request.tx_type, endpoint = %request.target_endpoint, "signing request opened");
        self.state = HandoffState::Open {
            request,
            on_confirmed: callback,
        };
    }
}
