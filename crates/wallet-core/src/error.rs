use thiserror::Error;

#[derive(Debug, Error, uniffi::Error)]
#[uniffi(flat_error)]
pub enum WalletError {
    #[error("Chain not found: {0}")]
    ChainNotFound(String),

    #[error("No chain selected")]
    NoChainSelected,

    #[error("Invalid key material: {0}")]
    InvalidKeyMaterial(String),

    #[error("Invalid address encoding: {0}")]
    InvalidAddressEncoding(String),

    #[error("Version probe failed: {0}")]
    ProbeFailure(String),

    #[error("No wallet credentials configured")]
    EmptyWallet,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<chain_eth::error::EthError> for WalletError {
    fn from(e: chain_eth::error::EthError) -> Self {
        use chain_eth::error::EthError;
        match e {
            EthError::InvalidAddress(msg) => WalletError::InvalidAddressEncoding(msg),
            other => WalletError::InvalidKeyMaterial(format!("ETH: {other}")),
        }
    }
}

impl From<chain_cosmos::CosmosError> for WalletError {
    fn from(e: chain_cosmos::CosmosError) -> Self {
        use chain_cosmos::CosmosError;
        match e {
            CosmosError::InvalidPrivateKey(_) | CosmosError::InvalidPublicKey(_) => {
                WalletError::InvalidKeyMaterial(format!("Cosmos: {e}"))
            }
            CosmosError::InvalidPrefix(_) | CosmosError::InvalidAddress(_) => {
                WalletError::InvalidAddressEncoding(e.to_string())
            }
        }
    }
}

impl From<std::io::Error> for WalletError {
    fn from(e: std::io::Error) -> Self {
        WalletError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for WalletError {
    fn from(e: serde_json::Error) -> Self {
        WalletError::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for WalletError {
    fn from(e: reqwest::Error) -> Self {
        WalletError::ProbeFailure(e.to_string())
    }
}
