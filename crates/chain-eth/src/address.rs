use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::SecretKey;
use sha3::{Digest, Keccak256};

use crate::error::EthError;

/// An Ethereum account: the raw 20 bytes and their EIP-55 rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EthAddress {
    pub bytes: [u8; 20],
    pub checksummed: String,
}

/// Derives the Ethereum account for a 32-byte secp256k1 private key.
///
/// Only exact 32-byte keys are accepted; k256 would otherwise left-pad
/// shorter slices, which hides truncated input.
pub fn private_key_to_address(private_key: &[u8]) -> Result<EthAddress, EthError> {
    if private_key.len() != 32 {
        return Err(EthError::InvalidPrivateKey(format!(
            "expected 32 bytes, got {}",
            private_key.len()
        )));
    }

    let secret = SecretKey::from_slice(private_key)
        .map_err(|_| EthError::InvalidPrivateKey("scalar out of range".into()))?;

    let uncompressed = secret.public_key().to_encoded_point(false);
    let key_65: [u8; 65] = uncompressed
        .as_bytes()
        .try_into()
        .map_err(|_| EthError::InvalidPublicKey("unexpected uncompressed length".into()))?;

    let bytes = pubkey_to_address_bytes(&key_65)?;
    let checksummed = checksum_address(&format!("0x{}", hex::encode(bytes)))?;

    Ok(EthAddress { bytes, checksummed })
}

/// Hashes an uncompressed public key (65 bytes, 0x04 prefix) to its 20-byte
/// account: the last 20 bytes of Keccak-256 over the 64-byte point.
pub fn pubkey_to_address_bytes(uncompressed_pubkey: &[u8; 65]) -> Result<[u8; 20], EthError> {
    if uncompressed_pubkey[0] != 0x04 {
        return Err(EthError::InvalidPublicKey(
            "uncompressed key must start with 0x04".into(),
        ));
    }

    let hash = Keccak256::digest(&uncompressed_pubkey[1..]);

    let mut addr_bytes = [0u8; 20];
    addr_bytes.copy_from_slice(&hash[12..]);
    Ok(addr_bytes)
}

/// Applies EIP-55 mixed-case checksum encoding to a 0x-prefixed address.
pub fn checksum_address(address: &str) -> Result<String, EthError> {
    let hex_part = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .ok_or_else(|| EthError::InvalidAddress("address must start with 0x".into()))?
        .to_lowercase();

    if hex_part.len() != 40 {
        return Err(EthError::InvalidAddress(format!(
            "expected 40 hex characters, got {}",
            hex_part.len()
        )));
    }

    if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(EthError::InvalidAddress(
            "address contains non-hex characters".into(),
        ));
    }

    let hash = Keccak256::digest(hex_part.as_bytes());

    let mut checksummed = String::with_capacity(42);
    checksummed.push_str("0x");

    for (i, c) in hex_part.chars().enumerate() {
        // High nibble for even positions, low nibble for odd ones.
        let nibble = if i % 2 == 0 {
            hash[i / 2] >> 4
        } else {
            hash[i / 2] & 0x0f
        };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            checksummed.push(c.to_ascii_uppercase());
        } else {
            checksummed.push(c);
        }
    }

    Ok(checksummed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_one() -> [u8; 32] {
        let mut privkey = [0u8; 32];
        privkey[31] = 1;
        privkey
    }

    #[test]
    fn eip55_checksum_known_addresses() {
        let cases = [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        ];

        for expected in &cases {
            let lower = format!("0x{}", expected[2..].to_lowercase());
            let result = checksum_address(&lower).unwrap();
            assert_eq!(&result, expected, "checksum mismatch for {}", expected);
        }
    }

    #[test]
    fn private_key_one_known_vector() {
        let address = private_key_to_address(&key_one()).unwrap();
        assert_eq!(
            address.checksummed,
            "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"
        );
        assert_eq!(
            hex::encode(address.bytes),
            "7e5f4552091a69125d5dfcb7b8c2659029395bdf"
        );
    }

    #[test]
    fn short_key_is_rejected() {
        let err = private_key_to_address(&[1u8; 31]).unwrap_err();
        assert!(matches!(err, EthError::InvalidPrivateKey(_)));
    }

    #[test]
    fn zero_key_is_rejected() {
        assert!(private_key_to_address(&[0u8; 32]).is_err());
    }

    #[test]
    fn invalid_uncompressed_prefix_errors() {
        let mut key = [0u8; 65];
        key[0] = 0x03;
        assert!(pubkey_to_address_bytes(&key).is_err());
    }

    #[test]
    fn checksum_address_invalid_no_prefix() {
        assert!(checksum_address("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").is_err());
    }

    #[test]
    fn checksum_address_invalid_length() {
        assert!(checksum_address("0xdeadbeef").is_err());
    }
}
