pub mod address;
pub mod bootstrap;
pub mod chains;
pub mod config;
pub mod error;
pub mod handoff;
pub mod prober;
pub mod storage;
pub mod types;
pub mod wallet;

pub use bootstrap::WalletCore;
pub use error::WalletError;
pub use types::{ChainDescriptor, Curve};

uniffi::setup_scaffolding!();

// ─── UniFFI-exported functions ───────────────────────────────────────
// Note: UniFFI passes owned String/Vec<u8> across FFI, so all functions
// accept owned types (not references).

/// Derive the native hex address of a hex private key under `curve`.
#[uniffi::export]
pub fn derive_hex_address(private_key_hex: String, curve: Curve) -> Result<String, WalletError> {
    Ok(address::derive_address_from_hex(&private_key_hex, curve)?.hex)
}

/// Render a hex or bech32 address under `prefix`.
#[uniffi::export]
pub fn reprefix_address(address: String, prefix: String) -> Result<String, WalletError> {
    address::reprefix(&address, &prefix)
}

/// Raw account bytes of a hex or bech32 address.
#[uniffi::export]
pub fn address_to_bytes(address: String) -> Result<Vec<u8>, WalletError> {
    address::address_bytes(&address)
}

/// Cosmos SDK version from a raw `/node_info` JSON reply.
#[uniffi::export]
pub fn sdk_version_from_node_info(node_info_json: String) -> Result<String, WalletError> {
    let info: prober::NodeInfo = serde_json::from_str(&node_info_json)
        .map_err(|e| WalletError::ProbeFailure(format!("malformed node info: {e}")))?;
    prober::parse_sdk_version(&info)
}
