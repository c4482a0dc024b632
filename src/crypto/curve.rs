//! # Elliptic Curve Engine
//!
//! secp256k1 primitives: key generation, public-key derivation, ECDSA
//! signing and verification over pre-hashed messages.
//!
//! ## Signature Flow
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         SIGNING FLOW                                    │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Canonical message string                                              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  SHA-256 digest (32 bytes)                                             │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ECDSA/secp256k1 sign over the digest                                  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  DER-encoded signature, hex                                            │
//! │                                                                         │
//! │  Verification recomputes the digest and checks the signature against   │
//! │  the SEC1 public key. Any malformed input verifies as `false` —        │
//! │  validation failures are data, not exceptions.                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Edge Cases
//!
//! A scalar of zero or ≥ the curve order is not a private key. `k256`
//! rejects both in `SigningKey::from_slice`, which this engine relies on
//! at generation and at import time alike.

use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use rand::rngs::OsRng;
use rand_core::RngCore;
use zeroize::ZeroizeOnDrop;

use crate::crypto::{PRIVATE_KEY_SIZE, PUBLIC_KEY_COMPRESSED_SIZE, PUBLIC_KEY_UNCOMPRESSED_SIZE};
use crate::error::{Error, Result};

/// A secp256k1 keypair, hex-encoded.
///
/// ## Security
///
/// - The private half is zeroized when dropped
/// - `Debug` never prints the private key
/// - Invariant: `public_key == derive(private_key)` for every constructor
#[derive(ZeroizeOnDrop)]
pub struct KeyPair {
    /// Private key scalar as 64 hex chars (secret)
    private_key: String,
    /// Uncompressed SEC1 public key as 130 hex chars
    #[zeroize(skip)]
    public_key: String,
}

impl KeyPair {
    /// Get the private key hex (for secure storage only)
    ///
    /// ## Security Warning
    ///
    /// Only use this for secure storage. Never log or transmit this value.
    pub fn private_key_hex(&self) -> &str {
        &self.private_key
    }

    /// Get the public key hex (safe to share)
    pub fn public_key_hex(&self) -> &str {
        &self.public_key
    }
}

// Prevent accidental logging
impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("private_key", &"[REDACTED]")
            .field("public_key", &self.public_key)
            .finish()
    }
}

/// secp256k1 engine, platform-independent.
///
/// Stateless; exists as a value so it can be constructor-injected and
/// mocked at the seams.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurveEngine;

impl CurveEngine {
    /// Create a new engine
    pub fn new() -> Self {
        Self
    }

    /// Generate a fresh keypair from the OS CSPRNG
    ///
    /// Fails closed with `Error::RngFailed` if no secure randomness is
    /// available — there is no degraded fallback.
    pub fn generate_keypair(&self) -> Result<KeyPair> {
        // A uniformly random 32-byte string is a valid scalar with
        // overwhelming probability; retry the negligible remainder.
        for _ in 0..8 {
            let mut entropy = [0u8; PRIVATE_KEY_SIZE];
            OsRng
                .try_fill_bytes(&mut entropy)
                .map_err(|_| Error::RngFailed)?;

            if let Ok(secret) = SigningKey::from_slice(&entropy) {
                let public = encode_public_key(secret.verifying_key());
                return Ok(KeyPair {
                    private_key: hex::encode(entropy),
                    public_key: public,
                });
            }
        }

        Err(Error::KeyDerivationFailed(
            "Could not produce a valid scalar from entropy".into(),
        ))
    }

    /// Derive the uncompressed SEC1 public key from a private key
    ///
    /// Pure and deterministic: the same scalar always yields the same
    /// point encoding.
    pub fn derive_public_key(&self, private_key_hex: &str) -> Result<String> {
        let secret = parse_private_key(private_key_hex)?;
        Ok(encode_public_key(secret.verifying_key()))
    }

    /// Build a full keypair from a private key hex string
    ///
    /// Validates the scalar before trusting it (zero and ≥ order are
    /// rejected by the parse).
    pub fn keypair_from_private_key(&self, private_key_hex: &str) -> Result<KeyPair> {
        let secret = parse_private_key(private_key_hex)?;
        Ok(KeyPair {
            private_key: private_key_hex.to_lowercase(),
            public_key: encode_public_key(secret.verifying_key()),
        })
    }

    /// Sign a pre-hashed message, returning a DER signature in hex
    pub fn sign_hash(&self, private_key_hex: &str, digest: &[u8; 32]) -> Result<String> {
        let secret = parse_private_key(private_key_hex)?;
        let signature: Signature = secret
            .sign_prehash(digest)
            .map_err(|e| Error::SigningFailed(e.to_string()))?;
        Ok(hex::encode(signature.to_der().as_bytes()))
    }

    /// Verify a signature over a pre-hashed message
    ///
    /// Returns `false` — never an error — for malformed keys, malformed
    /// signatures, or a failed check. Accepts DER and fixed-width (64-byte)
    /// signature encodings.
    pub fn verify_hash(&self, public_key_hex: &str, digest: &[u8; 32], signature_hex: &str) -> bool {
        let verifying_key = match parse_public_key(public_key_hex) {
            Ok(k) => k,
            Err(_) => return false,
        };

        let sig_bytes = match hex::decode(signature_hex) {
            Ok(b) => b,
            Err(_) => return false,
        };

        let signature = match Signature::from_der(&sig_bytes)
            .or_else(|_| Signature::from_slice(&sig_bytes))
        {
            Ok(s) => s,
            Err(_) => return false,
        };

        verifying_key.verify_prehash(digest, &signature).is_ok()
    }

    /// Check private key format and range without side effects
    pub fn is_valid_private_key(&self, value: &str) -> bool {
        parse_private_key(value).is_ok()
    }

    /// Check public key format without side effects
    ///
    /// Accepts compressed (33-byte) and uncompressed (65-byte) SEC1 hex.
    pub fn is_valid_public_key(&self, value: &str) -> bool {
        parse_public_key(value).is_ok()
    }
}

fn parse_private_key(private_key_hex: &str) -> Result<SigningKey> {
    let bytes = hex::decode(private_key_hex)
        .map_err(|e| Error::InvalidKey(format!("Invalid private key hex: {}", e)))?;

    if bytes.len() != PRIVATE_KEY_SIZE {
        return Err(Error::InvalidKey(format!(
            "Private key must be {} bytes, got {}",
            PRIVATE_KEY_SIZE,
            bytes.len()
        )));
    }

    SigningKey::from_slice(&bytes)
        .map_err(|_| Error::InvalidKey("Private key scalar out of range".into()))
}

fn parse_public_key(public_key_hex: &str) -> Result<VerifyingKey> {
    let bytes = hex::decode(public_key_hex)
        .map_err(|e| Error::InvalidKey(format!("Invalid public key hex: {}", e)))?;

    if bytes.len() != PUBLIC_KEY_COMPRESSED_SIZE && bytes.len() != PUBLIC_KEY_UNCOMPRESSED_SIZE {
        return Err(Error::InvalidKey(format!(
            "Public key must be {} or {} bytes, got {}",
            PUBLIC_KEY_COMPRESSED_SIZE,
            PUBLIC_KEY_UNCOMPRESSED_SIZE,
            bytes.len()
        )));
    }

    VerifyingKey::from_sec1_bytes(&bytes)
        .map_err(|_| Error::InvalidKey("Not a valid secp256k1 point".into()))
}

fn encode_public_key(key: &VerifyingKey) -> String {
    hex::encode(key.to_encoded_point(false).as_bytes())
}

// ============================================================================
// TESTS
// ============================================================================
