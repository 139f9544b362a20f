//! Bech32 conversion between raw account bytes and prefixed strings.
//!
//! `from_bech32(&to_bech32(bytes, prefix)?)? == (prefix, bytes)` holds for
//! every valid lowercase prefix.

use bech32::{Bech32, Hrp};

use crate::error::CosmosError;

/// Encode raw bytes under `prefix` with the classic Bech32 checksum.
pub fn to_bech32(raw: &[u8], prefix: &str) -> Result<String, CosmosError> {
    if prefix.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(CosmosError::InvalidPrefix(format!(
            "prefix must be lowercase: {prefix}"
        )));
    }

    let hrp = Hrp::parse(prefix)
        .map_err(|e| CosmosError::InvalidPrefix(format!("{prefix}: {e}")))?;

    bech32::encode::<Bech32>(hrp, raw)
        .map_err(|e| CosmosError::InvalidAddress(format!("bech32 encoding failed: {e}")))
}

/// Decode a bech32 string into its lowercase prefix and raw bytes.
pub fn from_bech32(address: &str) -> Result<(String, Vec<u8>), CosmosError> {
    let (hrp, data) = bech32::decode(address)
        .map_err(|e| CosmosError::InvalidAddress(format!("{address}: {e}")))?;
    Ok((hrp.as_str().to_ascii_lowercase(), data))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENERATOR_ACCOUNT: &str = "751e76e8199196d454941c45d1b3a323f1433bd6";

    fn account() -> Vec<u8> {
        hex::decode(GENERATOR_ACCOUNT).unwrap()
    }

    #[test]
    fn encodes_known_vectors() {
        assert_eq!(
            to_bech32(&account(), "cosmos").unwrap(),
            "cosmos1w508d6qejxtdg4y5r3zarvary0c5xw7k6ah60c"
        );
        assert_eq!(
            to_bech32(&account(), "osmo").unwrap(),
            "osmo1w508d6qejxtdg4y5r3zarvary0c5xw7kjxy2e2"
        );
    }

    #[test]
    fn decode_returns_prefix_and_bytes() {
        let (prefix, raw) = from_bech32("osmo1w508d6qejxtdg4y5r3zarvary0c5xw7kjxy2e2").unwrap();
        assert_eq!(prefix, "osmo");
        assert_eq!(raw, account());
    }

    #[test]
    fn round_trip_across_prefixes_and_lengths() {
        let samples: [&[u8]; 3] = [&[0xAB; 20], &[0x00; 32], &[0x01, 0x02, 0x03]];
        for raw in samples {
            for prefix in ["cosmos", "osmo", "evmos", "cosmosvaloper"] {
                let encoded = to_bech32(raw, prefix).unwrap();
                let (p, b) = from_bech32(&encoded).unwrap();
                assert_eq!(p, prefix);
                assert_eq!(b, raw);
            }
        }
    }

    #[test]
    fn uppercase_address_decodes() {
        let (prefix, raw) =
            from_bech32("COSMOS1W508D6QEJXTDG4Y5R3ZARVARY0C5XW7K6AH60C").unwrap();
        assert_eq!(prefix, "cosmos");
        assert_eq!(raw, account());
    }

    #[test]
    fn corrupted_checksum_is_rejected() {
        let err = from_bech32("cosmos1w508d6qejxtdg4y5r3zarvary0c5xw7k6ah60d").unwrap_err();
        assert!(matches!(err, CosmosError::InvalidAddress(_)));
    }

    #[test]
    fn missing_separator_is_rejected() {
        assert!(from_bech32("notbech32").is_err());
    }

    #[test]
    fn empty_and_uppercase_prefix_rejected() {
        assert!(matches!(
            to_bech32(&account(), ""),
            Err(CosmosError::InvalidPrefix(_))
        ));
        assert!(matches!(
            to_bech32(&account(), "Cosmos"),
            Err(CosmosError::InvalidPrefix(_))
        ));
    }
}
