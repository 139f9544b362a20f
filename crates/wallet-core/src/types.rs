use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Signing curve of a chain; decides the account byte layout.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Enum,
)]
pub enum Curve {
    /// Cosmos SDK accounts: RIPEMD-160(SHA-256(compressed pubkey)).
    #[default]
    #[serde(rename = "secp256k1")]
    Secp256k1Cosmos,
    /// Ethermint-style accounts: Keccak-256 of the uncompressed pubkey.
    #[serde(rename = "eth_secp256k1", alias = "eth_secp265k1")]
    Secp256k1Eth,
}

impl Curve {
    /// Whether the native hex form carries the `0x` marker.
    pub fn uses_0x_marker(&self) -> bool {
        matches!(self, Curve::Secp256k1Eth)
    }
}

pub(crate) fn default_hd_path() -> String {
    "m/44'/118'/0'/0/0".to_string()
}

/// Static and derived configuration for one chain.
///
/// `chain_name` is the identity. Fields this crate does not know about are
/// kept in `extra` so a newer persisted registry survives a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainDescriptor {
    pub chain_name: String,
    #[serde(alias = "api")]
    pub api_base_url: String,
    #[serde(alias = "addr_prefix")]
    pub bech32_prefix: String,
    #[serde(default)]
    pub curve: Curve,
    #[serde(default = "default_hd_path")]
    pub hd_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdk_version: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChainDescriptor {
    pub fn new(
        chain_name: impl Into<String>,
        api_base_url: impl Into<String>,
        bech32_prefix: impl Into<String>,
        curve: Curve,
    ) -> Self {
        Self {
            chain_name: chain_name.into(),
            api_base_url: api_base_url.into(),
            bech32_prefix: bech32_prefix.into(),
            curve,
            hd_path: default_hd_path(),
            sdk_version: None,
            extra: Map::new(),
        }
    }

    pub fn with_hd_path(mut self, hd_path: impl Into<String>) -> Self {
        self.hd_path = hd_path.into();
        self
    }
}

/// Locally held key material.
#[derive(Debug)]
pub struct WalletCredential {
    pub name: String,
    /// Hex-encoded secp256k1 secret.
    pub private_key: SecretString,
    pub is_active: bool,
}

impl WalletCredential {
    pub fn new(name: impl Into<String>, private_key_hex: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            private_key: SecretString::from(private_key_hex.into()),
            is_active: false,
        }
    }

    pub fn active(mut self) -> Self {
        self.is_active = true;
        self
    }
}

/// Persisted wallet-connection record, stored under a chain's `hd_path`.
///
/// Written by the connection flow; this crate only reads and clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRecord {
    #[serde(default)]
    pub cosmos_address: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A decoded connection: the account bytes and the prefix they were stored with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedIdentity {
    pub source_prefix: String,
    pub raw_address_bytes: Vec<u8>,
}

/// Address derived from key material under one curve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedAddress {
    pub curve: Curve,
    pub bytes: [u8; 20],
    /// `0x`-prefixed EIP-55 for ETH, bare lowercase hex for Cosmos.
    pub hex: String,
}

/// A packaged signing intent awaiting external confirmation.
#[derive(Debug)]
pub struct SigningRequest {
    pub sender: String,
    pub tx_type: String,
    pub target_endpoint: String,
    pub serialized_params: String,
    pub signing_key: SecretString,
}

/// Notification emitted by the confirmation flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TxEvent {
    #[serde(rename = "eventType", default)]
    pub event_type: String,
    #[serde(default)]
    pub hash: Option<String>,
}
