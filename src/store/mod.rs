//! # Secure Storage
//!
//! Encrypted-at-rest persistence of key material behind a platform
//! provider abstraction.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      SECURE STORAGE                                     │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  SecureStorageProvider Trait                                    │   │
//! │  │  ───────────────────────────                                     │   │
//! │  │                                                                 │   │
//! │  │  • put(key, value, policy) - Store a secret                    │   │
//! │  │  • get(key)                - Retrieve a secret (absent = None) │   │
//! │  │  • delete(key)             - Idempotent delete                 │   │
//! │  │  • supports(policy)        - Capability check                  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  Providers (capability-set polymorphism, no platform sniffing):        │
//! │  ─────────────────────────────────────────────────────────────          │
//! │                                                                         │
//! │  ┌───────────────┐  ┌───────────────┐  ┌───────────────┐              │
//! │  │ MemoryStorage │  │  FileStorage  │  │ Unsupported   │              │
//! │  │               │  │               │  │ Storage       │              │
//! │  │ - tests/dev   │  │ - AES-256-GCM │  │               │              │
//! │  │ - both        │  │   at rest     │  │ - every call  │              │
//! │  │   policies    │  │ - tmp+rename  │  │   fails with  │              │
//! │  │               │  │   writes      │  │   Unavailable │              │
//! │  └───────────────┘  └───────────────┘  └───────────────┘              │
//! │                                                                         │
//! │  SecureKeyStore sits on top: namespaces (primary/backup/shared),       │
//! │  named slots, and an instance-owned read cache for identity            │
//! │  existence and public key.                                             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod keystore;
mod provider;

pub use keystore::{slots, Namespace, SecureKeyStore};
pub use provider::{
    AccessPolicy, FileStorage, MemoryStorage, SecureStorageProvider, UnsupportedStorage,
};
