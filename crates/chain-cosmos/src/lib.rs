//! Cosmos SDK account addresses.
//!
//! - `address`: secp256k1 key to 20-byte account (`RIPEMD-160(SHA-256(pubkey))`)
//! - `codec`: bech32 encoding of raw account bytes under any prefix

pub mod address;
pub mod codec;
pub mod error;

pub use error::CosmosError;
