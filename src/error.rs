//! # Error Handling
//!
//! This module provides the error types for the identity core.
//!
//! ## Error Hierarchy
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           ERROR HIERARCHY                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Error (top-level)                                                     │
//! │  │                                                                      │
//! │  ├── Validation Errors                                                 │
//! │  │   ├── InvalidKey             - Malformed private/public key         │
//! │  │   ├── InvalidRecoveryPhrase  - Bad word, checksum, or word count    │
//! │  │   └── InvalidTimestamp       - Malformed timestamp in a message     │
//! │  │                                                                      │
//! │  ├── Identity Errors                                                   │
//! │  │   ├── NoIdentity             - No identity stored on this device    │
//! │  │   ├── IntegrityMismatch      - Stored keys fail consistency checks  │
//! │  │   └── ConfirmationRequired   - Destructive op without confirmation  │
//! │  │                                                                      │
//! │  ├── Crypto Errors                                                     │
//! │  │   ├── SigningFailed          - ECDSA signing failed                 │
//! │  │   ├── KeyDerivationFailed    - Seed/scalar derivation failed        │
//! │  │   └── RngFailed              - No secure randomness available       │
//! │  │                                                                      │
//! │  └── Storage Errors                                                    │
//! │      ├── StorageUnavailable     - Secure storage inaccessible          │
//! │      ├── StorageReadError       - Failed to read from storage          │
//! │      ├── StorageWriteError      - Failed to write to storage           │
//! │      └── SerializationError     - Record (de)serialization failed      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Propagation Policy
//!
//! Cryptographic verification failures are data, not errors: `verify`
//! returns `false` and never surfaces through this enum. Storage and
//! validation failures are typed errors propagated to the caller. No
//! error path ever carries private key material in its message.

use thiserror::Error;

/// Result type alias for identity core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the identity core
///
/// Variants are categorized by domain so callers can route corrective
/// action: re-prompt for input, prompt identity creation, retry storage
/// later, or attempt a backup restore.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Validation Errors (100-199)
    // ========================================================================

    /// Invalid key format, length, or range
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Invalid recovery phrase
    #[error("Invalid recovery phrase: {0}")]
    InvalidRecoveryPhrase(String),

    /// Malformed timestamp in a signed message
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    // ========================================================================
    // Identity Errors (200-299)
    // ========================================================================

    /// No identity stored on this device
    #[error("No identity on this device. Create or import an identity first.")]
    NoIdentity,

    /// Stored key material fails internal consistency checks
    #[error("Identity integrity mismatch: {0}")]
    IntegrityMismatch(String),

    /// Destructive operation attempted without explicit confirmation
    #[error("Deleting an identity requires force or explicit user confirmation.")]
    ConfirmationRequired,

    // ========================================================================
    // Crypto Errors (300-399)
    // ========================================================================

    /// Signing failed
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    /// Key derivation failed
    #[error("Failed to derive keys: {0}")]
    KeyDerivationFailed(String),

    /// Secure random number generation failed
    #[error("Secure random number generation failed")]
    RngFailed,

    // ========================================================================
    // Storage Errors (400-499)
    // ========================================================================

    /// Platform secure storage is inaccessible
    ///
    /// Read paths treat this as "identity state unknown", never as
    /// "no identity" — the two must stay distinguishable.
    #[error("Secure storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Failed to read from storage
    #[error("Failed to read from storage: {0}")]
    StorageReadError(String),

    /// Failed to write to storage
    #[error("Failed to write to storage: {0}")]
    StorageWriteError(String),

    /// Record (de)serialization failed
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl Error {
    /// Get the numeric error code
    ///
    /// Error codes are organized by category:
    /// - 100-199: Validation
    /// - 200-299: Identity
    /// - 300-399: Crypto
    /// - 400-499: Storage
    pub fn code(&self) -> i32 {
        match self {
            // Validation (100-199)
            Error::InvalidKey(_) => 100,
            Error::InvalidRecoveryPhrase(_) => 101,
            Error::InvalidTimestamp(_) => 102,

            // Identity (200-299)
            Error::NoIdentity => 200,
            Error::IntegrityMismatch(_) => 201,
            Error::ConfirmationRequired => 202,

            // Crypto (300-399)
            Error::SigningFailed(_) => 300,
            Error::KeyDerivationFailed(_) => 301,
            Error::RngFailed => 302,

            // Storage (400-499)
            Error::StorageUnavailable(_) => 400,
            Error::StorageReadError(_) => 401,
            Error::StorageWriteError(_) => 402,
            Error::SerializationError(_) => 403,
        }
    }

    /// Check if this error is recoverable
    ///
    /// Recoverable errors can potentially be resolved by retrying.
    /// Retries belong to the calling layer, with backoff — the core
    /// never retries storage automatically.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::StorageUnavailable(_)
                | Error::StorageReadError(_)
                | Error::StorageWriteError(_)
        )
    }

    /// Check if this error requires user action
    pub fn requires_user_action(&self) -> bool {
        matches!(
            self,
            Error::NoIdentity
                | Error::InvalidRecoveryPhrase(_)
                | Error::InvalidKey(_)
                | Error::IntegrityMismatch(_)
        )
    }
}

// ============================================================================
// ERROR CONVERSIONS
// ============================================================================

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::StorageReadError(err.to_string())
    }
}

// ============================================================================
// TESTS
// ============================================================================
