//! # Oxy Identity
//!
//! Passwordless public-key identity core: key generation, recovery
//! phrases, challenge-response authentication, and secure key storage.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         OXY IDENTITY CORE                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  identity — IdentityManager                                     │   │
//! │  │  create / import / backup / restore / delete / migrate          │   │
//! │  └───────┬──────────────────┬──────────────────┬──────────────────┘   │
//! │          │                  │                  │                      │
//! │          ▼                  ▼                  ▼                      │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────────────────┐  │
//! │  │  crypto      │   │  store       │   │  protocol                │  │
//! │  │  secp256k1   │   │  namespaced  │   │  canonical messages,     │  │
//! │  │  keys + ECDSA│   │  keystore +  │   │  challenge signatures,   │  │
//! │  │  over SHA-256│   │  providers   │   │  freshness window        │  │
//! │  └──────────────┘   └──────────────┘   └──────────────────────────┘  │
//! │          ▲                                                            │
//! │  ┌───────┴──────┐                                                     │
//! │  │  recovery    │   BIP39 mnemonics ⇄ private keys                    │
//! │  └──────────────┘                                                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//!
//! 1. **No passwords anywhere.** Possession of the private key is the
//!    entire credential; the recovery phrase is the only restore path.
//! 2. **Private keys never leave the device.** Servers see public keys
//!    and signatures, nothing else.
//! 3. **Injected dependencies.** Storage provider and clock are chosen
//!    by the host's bootstrap code and passed in; the core never sniffs
//!    the platform or reads ambient global state.
//! 4. **Fail closed.** Entropy failures, storage failures, and unknown
//!    states surface as errors — never silently degrade to weaker
//!    behavior or a false "no identity".
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use oxy_identity::{IdentityManager, MemoryStorage};
//!
//! # async fn demo() -> oxy_identity::Result<()> {
//! let manager = IdentityManager::with_defaults(Arc::new(MemoryStorage::new()));
//!
//! let public_key = manager.create_identity().await?;
//! println!("identity: {}", oxy_identity::shorten_public_key(&public_key));
//! # Ok(())
//! # }
//! ```

pub mod crypto;
pub mod error;
pub mod identity;
pub mod protocol;
pub mod recovery;
pub mod store;
pub mod time;

pub use crypto::{CurveEngine, KeyPair};
pub use error::{Error, Result};
pub use identity::{shorten_public_key, DeleteOptions, DeleteOutcome, IdentityManager};
pub use protocol::{
    AuthChallenge, SignatureService, SignedMessage, CHALLENGE_TTL_MS, MAX_SIGNATURE_AGE_MS,
};
pub use recovery::{PhraseStrength, RecoveryPhrase};
pub use store::{
    AccessPolicy, FileStorage, MemoryStorage, Namespace, SecureKeyStore, SecureStorageProvider,
    UnsupportedStorage,
};
pub use time::{Clock, SharedClock, SystemClock};

/// Crate-level configuration.
///
/// Kept deliberately small: everything else is injected per-component.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// Prefix for every storage key, isolating cooperating apps that
    /// share a provider.
    pub service_name: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            service_name: "oxy".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = IdentityConfig::default();
        assert_eq!(config.service_name, "oxy");
    }
}
