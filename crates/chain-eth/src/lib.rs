//! Ethereum-style account addresses for the wallet core.
//!
//! This crate provides:
//! - Address derivation from a raw secp256k1 private key
//! - Keccak-256 public key hashing to the 20-byte account
//! - EIP-55 mixed-case checksum encoding

pub mod address;
pub mod error;
