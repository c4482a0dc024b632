//! # Cryptography Module
//!
//! This module provides all cryptographic primitives used by the identity
//! core.
//!
//! ## Security Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    CRYPTOGRAPHIC ARCHITECTURE                           │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    KEY HIERARCHY                                │   │
//! │  ├─────────────────────────────────────────────────────────────────┤   │
//! │  │                                                                 │   │
//! │  │  Recovery Phrase (BIP39 - 12/24 words, 128/256 bits entropy)   │   │
//! │  │                          │                                      │   │
//! │  │                          ▼                                      │   │
//! │  │  ┌─────────────────────────────────────────────────────────┐   │   │
//! │  │  │              BIP39 Seed (512 bits)                       │   │   │
//! │  │  │         Derived via PBKDF2-SHA512 (2048 rounds)         │   │   │
//! │  │  └─────────────────────────────────────────────────────────┘   │   │
//! │  │                          │                                      │   │
//! │  │                          ▼  (first 32 bytes)                   │   │
//! │  │  ┌─────────────────────────────────────────────────────────┐   │   │
//! │  │  │         secp256k1 Private Key Scalar (256 bits)          │   │   │
//! │  │  │                                                          │   │   │
//! │  │  │  • Identity                                              │   │   │
//! │  │  │  • Challenge signatures (ECDSA)                          │   │   │
//! │  │  │  • Public key derivation (SEC1)                          │   │   │
//! │  │  └─────────────────────────────────────────────────────────┘   │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Algorithm Choices & Rationale
//!
//! | Algorithm | Purpose | Why Chosen |
//! |-----------|---------|------------|
//! | secp256k1 ECDSA | Signing | Wallet-compatible, widely deployed |
//! | SHA-256 | Message Digest | Standard pre-hash for ECDSA |
//! | BIP39 | Recovery Phrase | User-friendly backup, standard |
//! | AES-256-GCM | Storage Encryption | Hardware acceleration, AEAD |
//!
//! ## Security Considerations
//!
//! 1. **Key Zeroization**: Private key hex is zeroized when dropped
//! 2. **Secure Random**: `rand::rngs::OsRng` only, failing closed
//! 3. **Validation Before Trust**: imported key material is format- and
//!    range-checked before any use

mod curve;

pub use curve::{CurveEngine, KeyPair};

use sha2::{Digest, Sha256};

/// Size of private key scalars in bytes (256 bits)
pub const PRIVATE_KEY_SIZE: usize = 32;

/// Size of an uncompressed SEC1 public key in bytes
pub const PUBLIC_KEY_UNCOMPRESSED_SIZE: usize = 65;

/// Size of a compressed SEC1 public key in bytes
pub const PUBLIC_KEY_COMPRESSED_SIZE: usize = 33;

/// SHA-256 digest of arbitrary bytes.
///
/// All canonical protocol messages are hashed with this before signing.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        // SHA-256("abc")
        let digest = sha256(b"abc");
        assert_eq!(
            hex::encode(digest),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
