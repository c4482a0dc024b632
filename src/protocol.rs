//! # Challenge Signature Protocol
//!
//! Canonical message construction, signing, and verification with
//! freshness enforcement.
//!
//! ## Authentication Flow
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     CHALLENGE-RESPONSE FLOW                             │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  1. Idle      Server issues AuthChallenge { challenge, issued_at }     │
//! │                                                                         │
//! │  2. Signing   Client builds "auth:{pk}:{challenge}:{ts}" with its      │
//! │               current time, hashes it (SHA-256), signs the digest      │
//! │               with the stored private key → SignedMessage              │
//! │                                                                         │
//! │  3. Verifying Verifier recomputes the identical canonical string,      │
//! │               hashes it, checks the signature, and enforces BOTH       │
//! │               timers against its own wall clock:                       │
//! │               • signature age  ≤ MAX_SIGNATURE_AGE_MS                  │
//! │               • challenge age  ≤ CHALLENGE_TTL_MS                      │
//! │                                                                         │
//! │  4. Consumed / Rejected (terminal). Single-use enforcement lives       │
//! │               with the session service that issued the challenge.      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Canonical Messages
//!
//! | Template | Format |
//! |----------|--------|
//! | Auth | `auth:{publicKey}:{challenge}:{timestamp}` |
//! | Registration | `oxy:register:{publicKey}:{timestamp}` |
//! | Request | `request:{publicKey}:{timestamp}:{canonicalData}` |
//!
//! The canonical strings are the bit-exact contract between signer and
//! verifier: separators, field order, and the lexicographic key ordering
//! of request payloads must match byte-for-byte on both sides.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::crypto::{sha256, CurveEngine, KeyPair};
use crate::error::Result;
use crate::time::{Clock, SharedClock};

/// Maximum accepted distance between a signature's claimed timestamp and
/// the verifier's clock (5 minutes).
pub const MAX_SIGNATURE_AGE_MS: i64 = 5 * 60 * 1000;

/// Lifetime of a server-issued challenge from its issue time (5 minutes).
pub const CHALLENGE_TTL_MS: i64 = 5 * 60 * 1000;

/// A server-issued authentication challenge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthChallenge {
    /// Server-issued random nonce
    pub challenge: String,
    /// When the server issued it, Unix ms
    pub issued_at: i64,
}

/// A canonical message plus its signature, ready for transmission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignedMessage {
    /// The canonical message string that was signed
    pub message: String,
    /// DER-encoded ECDSA signature, hex
    pub signature: String,
    /// Signer's timestamp, Unix ms
    pub timestamp: i64,
    /// Signer's public key, SEC1 hex
    pub public_key: String,
}

// ============================================================================
// CANONICAL MESSAGE BUILDERS
// ============================================================================

/// Build the canonical authentication message.
pub fn build_auth_message(public_key: &str, challenge: &str, timestamp: i64) -> String {
    format!("auth:{}:{}:{}", public_key, challenge, timestamp)
}

/// Build the canonical registration message.
pub fn build_registration_message(public_key: &str, timestamp: i64) -> String {
    format!("oxy:register:{}:{}", public_key, timestamp)
}

/// Build the canonical generic-request message.
pub fn build_request_message(
    public_key: &str,
    timestamp: i64,
    data: &serde_json::Map<String, serde_json::Value>,
) -> String {
    format!(
        "request:{}:{}:{}",
        public_key,
        timestamp,
        canonicalize_data(data)
    )
}

/// Canonicalize a request payload.
///
/// Keys are sorted lexicographically and joined as `key:jsonValue` pairs
/// with `|`, so two semantically equal objects produce byte-identical
/// output regardless of insertion order. The server rebuilds this string
/// independently to verify the signature.
pub fn canonicalize_data(data: &serde_json::Map<String, serde_json::Value>) -> String {
    let sorted: BTreeMap<&String, &serde_json::Value> = data.iter().collect();
    sorted
        .into_iter()
        .map(|(key, value)| format!("{}:{}", key, value))
        .collect::<Vec<_>>()
        .join("|")
}

// ============================================================================
// SIGNATURE SERVICE
// ============================================================================

/// Builds and verifies signed protocol messages.
///
/// Holds the curve engine and the wall clock; both are injected so
/// freshness checks are testable against a pinned instant.
pub struct SignatureService {
    engine: CurveEngine,
    clock: SharedClock,
}

impl SignatureService {
    /// Create a signature service.
    pub fn new(engine: CurveEngine, clock: SharedClock) -> Self {
        Self { engine, clock }
    }

    /// Sign a canonical message string: SHA-256 then ECDSA.
    pub fn sign_message(&self, keypair: &KeyPair, message: &str) -> Result<String> {
        let digest = sha256(message.as_bytes());
        self.engine.sign_hash(keypair.private_key_hex(), &digest)
    }

    /// Respond to an authentication challenge.
    pub fn sign_challenge(&self, keypair: &KeyPair, challenge: &AuthChallenge) -> Result<SignedMessage> {
        let timestamp = self.clock.now_millis();
        let message =
            build_auth_message(keypair.public_key_hex(), &challenge.challenge, timestamp);
        let signature = self.sign_message(keypair, &message)?;

        Ok(SignedMessage {
            message,
            signature,
            timestamp,
            public_key: keypair.public_key_hex().to_string(),
        })
    }

    /// Produce the registration signature for a new account.
    ///
    /// The canonical registration message binds only the public key and
    /// timestamp; `username` and `email` travel alongside the signature
    /// and are bound to the verified key by the server.
    pub fn create_registration_signature(
        &self,
        keypair: &KeyPair,
        username: &str,
        email: Option<&str>,
    ) -> Result<SignedMessage> {
        tracing::debug!(username, has_email = email.is_some(), "signing registration");

        let timestamp = self.clock.now_millis();
        let message = build_registration_message(keypair.public_key_hex(), timestamp);
        let signature = self.sign_message(keypair, &message)?;

        Ok(SignedMessage {
            message,
            signature,
            timestamp,
            public_key: keypair.public_key_hex().to_string(),
        })
    }

    /// Sign a generic request payload.
    pub fn sign_request(
        &self,
        keypair: &KeyPair,
        data: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<SignedMessage> {
        let timestamp = self.clock.now_millis();
        let message = build_request_message(keypair.public_key_hex(), timestamp, data);
        let signature = self.sign_message(keypair, &message)?;

        Ok(SignedMessage {
            message,
            signature,
            timestamp,
            public_key: keypair.public_key_hex().to_string(),
        })
    }

    /// Verify a signed message: cryptographic validity plus freshness.
    ///
    /// Returns `false` — never an error — when the signature fails, the
    /// key or signature is malformed, or `timestamp` is more than
    /// `MAX_SIGNATURE_AGE_MS` from the verifier's current time. The
    /// signer's honesty about when it signed is irrelevant: only the
    /// wall-clock comparison here counts.
    pub fn verify(&self, message: &str, signature: &str, public_key: &str, timestamp: i64) -> bool {
        let age = self.clock.now_millis() - timestamp;
        if age > MAX_SIGNATURE_AGE_MS || age < -MAX_SIGNATURE_AGE_MS {
            return false;
        }

        let digest = sha256(message.as_bytes());
        self.engine.verify_hash(public_key, &digest, signature)
    }

    /// Verify a challenge response end-to-end.
    ///
    /// Recomputes the canonical auth message from its parts, checks the
    /// signature and signature age, and additionally enforces the
    /// challenge's own TTL from `issued_at`. The two timers are
    /// independent; both must pass.
    pub fn verify_challenge(&self, challenge: &AuthChallenge, signed: &SignedMessage) -> bool {
        let now = self.clock.now_millis();
        if now - challenge.issued_at > CHALLENGE_TTL_MS {
            return false;
        }

        let expected =
            build_auth_message(&signed.public_key, &challenge.challenge, signed.timestamp);
        if expected != signed.message {
            return false;
        }

        self.verify(
            &signed.message,
            &signed.signature,
            &signed.public_key,
            signed.timestamp,
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================
