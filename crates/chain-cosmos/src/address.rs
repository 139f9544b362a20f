use k256::SecretKey;
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

use crate::error::CosmosError;

/// Derive the 20-byte Cosmos account for a 32-byte secp256k1 private key.
pub fn private_key_to_account(private_key: &[u8]) -> Result<[u8; 20], CosmosError> {
    if private_key.len() != 32 {
        return Err(CosmosError::InvalidPrivateKey(format!(
            "expected 32 bytes, got {}",
            private_key.len()
        )));
    }

    let secret = SecretKey::from_slice(private_key)
        .map_err(|_| CosmosError::InvalidPrivateKey("scalar out of range".into()))?;

    let compressed: [u8; 33] = secret
        .public_key()
        .to_sec1_bytes()
        .as_ref()
        .try_into()
        .map_err(|_| CosmosError::InvalidPublicKey("unexpected compressed length".into()))?;

    pubkey_to_account(&compressed)
}

/// Hash a 33-byte compressed public key to its account bytes.
///
/// Steps:
/// 1. SHA-256(pubkey)
/// 2. RIPEMD-160(sha256_result) -> 20-byte account
pub fn pubkey_to_account(pubkey_bytes: &[u8; 33]) -> Result<[u8; 20], CosmosError> {
    if pubkey_bytes[0] != 0x02 && pubkey_bytes[0] != 0x03 {
        return Err(CosmosError::InvalidPublicKey(
            "compressed key must start with 0x02 or 0x03".into(),
        ));
    }

    let sha = Sha256::digest(pubkey_bytes);
    Ok(Ripemd160::digest(sha).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Private key 1 has the generator as its public key:
    /// 0279BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798
    #[test]
    fn generator_key_account() {
        let mut privkey = [0u8; 32];
        privkey[31] = 1;

        let account = private_key_to_account(&privkey).unwrap();
        assert_eq!(
            hex::encode(account),
            "751e76e8199196d454941c45d1b3a323f1433bd6"
        );
    }

    #[test]
    fn pubkey_matches_private_key_path() {
        let pubkey: [u8; 33] =
            hex::decode("0279BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798")
                .unwrap()
                .try_into()
                .unwrap();

        let mut privkey = [0u8; 32];
        privkey[31] = 1;

        assert_eq!(
            pubkey_to_account(&pubkey).unwrap(),
            private_key_to_account(&privkey).unwrap()
        );
    }

    #[test]
    fn wrong_length_key_is_rejected() {
        let err = private_key_to_account(&[7u8; 33]).unwrap_err();
        assert!(matches!(err, CosmosError::InvalidPrivateKey(_)));
    }

    #[test]
    fn zero_key_is_rejected() {
        assert!(private_key_to_account(&[0u8; 32]).is_err());
    }

    #[test]
    fn uncompressed_prefix_is_rejected() {
        let mut key = [0u8; 33];
        key[0] = 0x04;
        assert!(pubkey_to_account(&key).is_err());
    }
}
