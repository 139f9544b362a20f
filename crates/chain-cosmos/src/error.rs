use thiserror::Error;

/// Cosmos address errors.
#[derive(Debug, Error)]
pub enum CosmosError {
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid prefix: {0}")]
    InvalidPrefix(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_prefix() {
        let err = CosmosError::InvalidPrefix("empty".into());
        assert_eq!(err.to_string(), "invalid prefix: empty");
    }

    #[test]
    fn error_trait_is_implemented() {
        let err: Box<dyn std::error::Error> = Box::new(CosmosError::InvalidAddress("test".into()));
        assert!(err.to_string().contains("test"));
    }
}
