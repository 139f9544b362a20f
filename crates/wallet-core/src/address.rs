use chain_cosmos::codec;
use zeroize::Zeroizing;

use crate::error::WalletError;
use crate::types::{ChainDescriptor, Curve, DerivedAddress};

impl Curve {
    /// Derive the native account for a raw 32-byte secret under this curve.
    pub fn derive(self, private_key: &[u8]) -> Result<DerivedAddress, WalletError> {
        match self {
            Curve::Secp256k1Eth => {
                let address = chain_eth::address::private_key_to_address(private_key)?;
                Ok(DerivedAddress {
                    curve: self,
                    bytes: address.bytes,
                    hex: address.checksummed,
                })
            }
            Curve::Secp256k1Cosmos => {
                let bytes = chain_cosmos::address::private_key_to_account(private_key)?;
                Ok(DerivedAddress {
                    curve: self,
                    bytes,
                    hex: hex::encode(bytes),
                })
            }
        }
    }
}

/// Derive an address from raw key bytes for the given curve.
pub fn derive_address(private_key: &[u8], curve: Curve) -> Result<DerivedAddress, WalletError> {
    curve.derive(private_key)
}

/// Derive an address from a hex-encoded secret (an optional `0x` is ignored).
pub fn derive_address_from_hex(
    private_key_hex: &str,
    curve: Curve,
) -> Result<DerivedAddress, WalletError> {
    let trimmed = strip_0x(private_key_hex.trim());
    let key = Zeroizing::new(
        hex::decode(trimmed)
            .map_err(|e| WalletError::InvalidKeyMaterial(format!("key is not hex: {e}")))?,
    );
    derive_address(&key, curve)
}

/// Render `address` under `chain.bech32_prefix`.
///
/// Accepts bare hex, `0x` hex, or bech32 under any prefix; only the
/// underlying account bytes survive.
pub fn resolve_display_address(
    address: &str,
    chain: &ChainDescriptor,
) -> Result<String, WalletError> {
    reprefix(address, &chain.bech32_prefix)
}

/// Re-encode `address` under `prefix`.
pub fn reprefix(address: &str, prefix: &str) -> Result<String, WalletError> {
    let raw = address_bytes(address)?;
    Ok(codec::to_bech32(&raw, prefix)?)
}

/// Decode the account bytes of a hex or bech32 address.
///
/// Unmarked input is tried as bech32 first, since a bech32 string may
/// consist only of hex digits. Bare hex is the fallback.
pub fn address_bytes(address: &str) -> Result<Vec<u8>, WalletError> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(WalletError::InvalidAddressEncoding("empty address".into()));
    }

    let stripped = strip_0x(trimmed);
    if stripped.len() == trimmed.len() {
        let bech32_err = match codec::from_bech32(trimmed) {
            Ok((_, raw)) => return Ok(raw),
            Err(e) => e,
        };
        if !trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(bech32_err.into());
        }
    }

    hex::decode(stripped).map_err(|e| WalletError::InvalidAddressEncoding(format!("{trimmed}: {e}")))
}

fn strip_0x(value: &str) -> &str {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_ONE: &str = "0000000000000000000000000000000000000000000000000000000000000001";

    fn chain(prefix: &str) -> ChainDescriptor {
        ChainDescriptor::new(prefix, "https://api.example", prefix, Curve::Secp256k1Cosmos)
    }

    #[test]
    fn cosmos_curve_reports_bare_hex() {
        let addr = derive_address_from_hex(KEY_ONE, Curve::Secp256k1Cosmos).unwrap();
        assert_eq!(addr.hex, "751e76e8199196d454941c45d1b3a323f1433bd6");
        assert!(!addr.curve.uses_0x_marker());
    }

    #[test]
    fn eth_curve_reports_checksummed_0x_hex() {
        let addr = derive_address_from_hex(KEY_ONE, Curve::Secp256k1Eth).unwrap();
        assert_eq!(addr.hex, "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf");
        assert!(addr.curve.uses_0x_marker());
    }

    #[test]
    fn curves_produce_different_accounts() {
        let cosmos = derive_address_from_hex(KEY_ONE, Curve::Secp256k1Cosmos).unwrap();
        let eth = derive_address_from_hex(KEY_ONE, Curve::Secp256k1Eth).unwrap();
        assert_ne!(cosmos.bytes, eth.bytes);
    }

    #[test]
    fn malformed_key_material_fails() {
        for bad in ["", "zz", "0102", &"ff".repeat(33)] {
            for curve in [Curve::Secp256k1Cosmos, Curve::Secp256k1Eth] {
                let err = derive_address_from_hex(bad, curve).unwrap_err();
                assert!(
                    matches!(err, WalletError::InvalidKeyMaterial(_)),
                    "{bad:?} under {curve:?} gave {err:?}"
                );
            }
        }
    }

    #[test]
    fn resolves_bare_hex_and_0x_hex() {
        let cosmos = chain("cosmos");
        let expected = "cosmos1w508d6qejxtdg4y5r3zarvary0c5xw7k6ah60c";
        assert_eq!(
            resolve_display_address("751e76e8199196d454941c45d1b3a323f1433bd6", &cosmos).unwrap(),
            expected
        );
        assert_eq!(
            resolve_display_address("0x751e76e8199196d454941c45d1b3a323f1433bd6", &cosmos).unwrap(),
            expected
        );
    }

    #[test]
    fn eth_address_renders_under_evmos_prefix() {
        let evmos = chain("evmos");
        assert_eq!(
            resolve_display_address("0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf", &evmos).unwrap(),
            "evmos10e0525sfrf53yh2aljmm3sn9jq5njk7lxpag6e"
        );
    }

    #[test]
    fn reprefixing_ignores_original_prefix() {
        let raw = [0xABu8; 20];
        for from in ["cosmos", "osmo", "evmos"] {
            let encoded = codec::to_bech32(&raw, from).unwrap();
            for to in ["cosmos", "osmo", "juno"] {
                assert_eq!(
                    resolve_display_address(&encoded, &chain(to)).unwrap(),
                    codec::to_bech32(&raw, to).unwrap()
                );
            }
        }
    }

    #[test]
    fn all_hex_bech32_decodes_as_bech32() {
        let raw = hex::decode("d6559cb53da6525eb555ae707d2bd16ea95567bd").unwrap();
        let encoded = "a16e2eedfa5ef9ad244ec86273d6542eaa00923f";
        assert_eq!(codec::to_bech32(&raw, "a").unwrap(), encoded);

        assert_eq!(address_bytes(encoded).unwrap(), raw);
        assert_eq!(
            resolve_display_address(encoded, &chain("osmo")).unwrap(),
            "osmo16e2eedfa5ef9ad244ec86273d6542eaa87r2pv"
        );
    }

    #[test]
    fn reprefixing_holds_for_hex_only_prefixes() {
        let cases = [
            ("a", "d6559cb53da6525eb555ae707d2bd16ea95567bd"),
            ("abc", "a3f452f5b46ab587d3ba7bcea3aa8a7aa98c78b4"),
            ("dead", "4e29dca71ec532f4d6a9297bac9eba4c7caf7945"),
        ];
        for (from, raw_hex) in cases {
            let raw = hex::decode(raw_hex).unwrap();
            let encoded = codec::to_bech32(&raw, from).unwrap();
            assert!(encoded.chars().all(|c| c.is_ascii_hexdigit()), "{encoded}");
            for to in ["a", "abc", "dead", "cosmos", "osmo"] {
                assert_eq!(
                    resolve_display_address(&encoded, &chain(to)).unwrap(),
                    codec::to_bech32(&raw, to).unwrap(),
                    "{from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn bare_hex_still_decodes_when_not_bech32() {
        // contains the separator '1' but no valid checksum
        let bare = "751e76e8199196d454941c45d1b3a323f1433bd6";
        assert_eq!(address_bytes(bare).unwrap(), hex::decode(bare).unwrap());
    }

    #[test]
    fn malformed_addresses_fail() {
        let cosmos = chain("cosmos");
        for bad in ["", "0xnothex", "cosmos1qqqq", "hello world"] {
            let err = resolve_display_address(bad, &cosmos).unwrap_err();
            assert!(
                matches!(err, WalletError::InvalidAddressEncoding(_)),
                "{bad:?} gave {err:?}"
            );
        }
    }
}
