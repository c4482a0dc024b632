//! # Identity Module
//!
//! Identity lifecycle orchestration: create, import, backup, restore,
//! delete, and cross-app migration.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      IDENTITY LIFECYCLE                                 │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Application code                                                      │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  IdentityManager (the only mutation surface)                    │   │
//! │  │                                                                 │   │
//! │  │  create / import_from_private_key / import_from_recovery_phrase │   │
//! │  │  backup / restore_from_backup / delete / migrate_to_shared      │   │
//! │  │  verify_integrity / has_identity / get_public_key               │   │
//! │  │  sign_challenge / create_registration_signature / sign_request  │   │
//! │  └───────┬───────────────┬──────────────────┬─────────────────────┘   │
//! │          │               │                  │                          │
//! │          ▼               ▼                  ▼                          │
//! │   CurveEngine      SecureKeyStore    SignatureService                  │
//! │   (raw crypto)     (persistence +    (canonical messages)              │
//! │                     read cache)                                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Safety Invariants
//!
//! - A public key is returned to the caller only AFTER the private key is
//!   durably stored. Generate-then-return-then-store would orphan the
//!   identity if the process died between the last two steps.
//! - Deletion demands `force` or `user_confirmed`, and attempts a backup
//!   before the primary delete unless told to skip. The backup attempt
//!   completes (either way) before the delete is issued.
//! - Restore validates the backup's internal consistency before touching
//!   the primary namespace; it never partially restores.
//! - Mutations are serialized through one async mutex so two concurrent
//!   creations cannot race storage and cache into disagreement. Reads
//!   run concurrently and go through the keystore's cache.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::crypto::{CurveEngine, KeyPair};
use crate::error::{Error, Result};
use crate::protocol::{AuthChallenge, SignatureService, SignedMessage};
use crate::recovery::RecoveryPhrase;
use crate::store::{slots, AccessPolicy, Namespace, SecureKeyStore, SecureStorageProvider};
use crate::time::{Clock, SharedClock};
use crate::IdentityConfig;

/// Flags controlling identity deletion.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteOptions {
    /// Skip the pre-delete backup attempt
    pub skip_backup: bool,
    /// Programmatic override; also purges the backup namespace
    pub force: bool,
    /// The user explicitly confirmed the deletion
    pub user_confirmed: bool,
}

/// Composite result of a deletion, exposing both phases.
///
/// The backup outcome is reported rather than swallowed so callers can
/// act on a failed best-effort backup independently of the delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// Whether a primary identity was removed
    pub deleted: bool,
    /// Whether the pre-delete backup landed (false when skipped or failed)
    pub backup_succeeded: bool,
}

/// Orchestrates identity mutation with safety invariants.
///
/// This is the only component that exposes destructive operations;
/// everything else in the crate is a collaborator it delegates to.
pub struct IdentityManager {
    store: SecureKeyStore,
    engine: CurveEngine,
    signer: SignatureService,
    clock: SharedClock,
    /// Serializes create/import/delete/backup/restore/migrate.
    mutation: Mutex<()>,
}

impl IdentityManager {
    /// Create a manager over an injected storage provider and clock.
    ///
    /// Dependencies are resolved once by the host's bootstrap code and
    /// passed in here — the core never detects platforms at runtime.
    pub fn new(
        provider: Arc<dyn SecureStorageProvider>,
        config: &IdentityConfig,
        clock: SharedClock,
    ) -> Self {
        let engine = CurveEngine::new();
        Self {
            store: SecureKeyStore::new(provider, config.service_name.clone()),
            engine,
            signer: SignatureService::new(engine, clock.clone()),
            clock,
            mutation: Mutex::new(()),
        }
    }

    /// Create a manager with the default config and system clock.
    pub fn with_defaults(provider: Arc<dyn SecureStorageProvider>) -> Self {
        Self::new(provider, &IdentityConfig::default(), crate::time::system_clock())
    }

    // ========================================================================
    // CREATION & IMPORT
    // ========================================================================

    /// Generate a new identity and persist it as primary.
    ///
    /// Returns the public key only after the private key is stored.
    pub async fn create_identity(&self) -> Result<String> {
        let _guard = self.mutation.lock().await;

        let keypair = self.engine.generate_keypair()?;
        self.persist_primary(&keypair).await?;

        info!("Created new identity");
        Ok(keypair.public_key_hex().to_string())
    }

    /// Import an identity from a raw private key hex string.
    pub async fn import_from_private_key(&self, private_key_hex: &str) -> Result<String> {
        let _guard = self.mutation.lock().await;

        let keypair = self.engine.keypair_from_private_key(private_key_hex)?;
        self.persist_primary(&keypair).await?;

        info!("Imported identity from private key");
        Ok(keypair.public_key_hex().to_string())
    }

    /// Import an identity from a recovery phrase.
    pub async fn import_from_recovery_phrase(&self, phrase: &str) -> Result<String> {
        let _guard = self.mutation.lock().await;

        let keypair = RecoveryPhrase::derive_identity_from_phrase(phrase)?;
        self.persist_primary(&keypair).await?;

        info!("Imported identity from recovery phrase");
        Ok(keypair.public_key_hex().to_string())
    }

    async fn persist_primary(&self, keypair: &KeyPair) -> Result<()> {
        self.store
            .store_identity(
                Namespace::Primary,
                keypair.private_key_hex(),
                keypair.public_key_hex(),
            )
            .await
    }

    // ========================================================================
    // READS
    // ========================================================================

    /// Whether a primary identity exists (cached after the first read).
    pub async fn has_identity(&self) -> Result<bool> {
        self.store.has_identity().await
    }

    /// The primary public key, if any (cached after the first read).
    pub async fn get_public_key(&self) -> Result<Option<String>> {
        self.store.get_public_key().await
    }

    /// Read-only consistency check of the stored primary identity.
    ///
    /// Verifies key formats and that the stored public key is derivable
    /// from the stored private key. Returns `false` for absent, partial,
    /// or mismatched material — callers should then attempt
    /// `restore_from_backup` or prompt a re-import.
    pub async fn verify_integrity(&self) -> Result<bool> {
        let loaded = match self.store.load_identity(Namespace::Primary).await {
            Ok(Some(tuple)) => tuple,
            Ok(None) => return Ok(false),
            Err(Error::IntegrityMismatch(_)) => return Ok(false),
            Err(e) => return Err(e),
        };

        Ok(self.tuple_is_consistent(&loaded.0, &loaded.1))
    }

    fn tuple_is_consistent(&self, private_key: &str, public_key: &str) -> bool {
        if !self.engine.is_valid_private_key(private_key)
            || !self.engine.is_valid_public_key(public_key)
        {
            return false;
        }

        match self.engine.derive_public_key(private_key) {
            Ok(derived) => derived.eq_ignore_ascii_case(public_key),
            Err(_) => false,
        }
    }

    // ========================================================================
    // BACKUP & RESTORE
    // ========================================================================

    /// Copy the primary identity into the backup namespace.
    ///
    /// Returns `false` (not an error) when there is nothing to back up.
    pub async fn backup_identity(&self) -> Result<bool> {
        let _guard = self.mutation.lock().await;
        self.backup_locked().await
    }

    async fn backup_locked(&self) -> Result<bool> {
        let (private_key, public_key) = match self.store.load_identity(Namespace::Primary).await? {
            Some(tuple) => tuple,
            None => return Ok(false),
        };

        self.store
            .store_identity(Namespace::Backup, &private_key, &public_key)
            .await?;
        self.store
            .put(
                Namespace::Backup,
                slots::BACKUP_TIMESTAMP,
                self.clock.now_millis().to_string().as_bytes(),
            )
            .await?;

        info!("Backed up identity");
        Ok(true)
    }

    /// Promote the backup identity to primary after validating it.
    ///
    /// Returns `false` when the backup is absent or fails consistency
    /// checks (bad formats, or stored public key not derivable from the
    /// stored private key). The primary namespace is never touched unless
    /// validation passes in full.
    pub async fn restore_from_backup(&self) -> Result<bool> {
        let _guard = self.mutation.lock().await;

        let (private_key, public_key) = match self.store.load_identity(Namespace::Backup).await {
            Ok(Some(tuple)) => tuple,
            Ok(None) => return Ok(false),
            // A half-written backup is inconsistent, not fatal
            Err(Error::IntegrityMismatch(_)) => return Ok(false),
            Err(e) => return Err(e),
        };

        if !self.tuple_is_consistent(&private_key, &public_key) {
            warn!("Backup identity failed consistency checks; not restoring");
            return Ok(false);
        }

        self.store
            .store_identity(Namespace::Primary, &private_key, &public_key)
            .await?;

        info!("Restored identity from backup");
        Ok(true)
    }

    // ========================================================================
    // DELETION
    // ========================================================================

    /// Delete the primary identity.
    ///
    /// Requires `force` or `user_confirmed` — anything else is a
    /// programming error surfaced as `ConfirmationRequired` with no
    /// storage mutation. Unless `skip_backup`, a backup is attempted and
    /// completes (success or failure) before the delete is issued; a
    /// failed backup is reported in the outcome but does not block the
    /// delete, since blocking could trap a user removing a compromised
    /// identity. `force` additionally purges the backup namespace.
    pub async fn delete_identity(&self, options: DeleteOptions) -> Result<DeleteOutcome> {
        if !options.force && !options.user_confirmed {
            return Err(Error::ConfirmationRequired);
        }

        let _guard = self.mutation.lock().await;

        let backup_succeeded = if options.skip_backup {
            false
        } else {
            match self.backup_locked().await {
                Ok(done) => done,
                Err(e) => {
                    warn!(error = %e, "Pre-delete backup failed; continuing with delete");
                    false
                }
            }
        };

        let deleted = self.store.clear_identity(Namespace::Primary).await?;

        if options.force {
            self.store.clear_identity(Namespace::Backup).await?;
        }

        if deleted {
            info!(backup_succeeded, "Deleted identity");
        }

        Ok(DeleteOutcome {
            deleted,
            backup_succeeded,
        })
    }

    // ========================================================================
    // CROSS-APP MIGRATION
    // ========================================================================

    /// Copy the primary identity into the shared (cross-app) namespace.
    ///
    /// One-directional and explicit: the shared copy is not kept in sync
    /// afterwards. Idempotent — a shared identity already being present
    /// is a no-op success.
    pub async fn migrate_to_shared(&self) -> Result<bool> {
        if !self.store.supports(AccessPolicy::SharedGroup) {
            return Err(Error::StorageUnavailable(
                "Provider has no cross-application storage".into(),
            ));
        }

        let _guard = self.mutation.lock().await;

        match self.store.load_identity(Namespace::Shared).await {
            Ok(Some(_)) => return Ok(true),
            Ok(None) => {}
            // A half-written shared copy gets overwritten by the migration
            Err(Error::IntegrityMismatch(_)) => {}
            Err(e) => return Err(e),
        }

        let (private_key, public_key) = self
            .store
            .load_identity(Namespace::Primary)
            .await?
            .ok_or(Error::NoIdentity)?;

        self.store
            .store_identity(Namespace::Shared, &private_key, &public_key)
            .await?;

        info!("Migrated identity to shared namespace");
        Ok(true)
    }

    // ========================================================================
    // SIGNATURE OPERATIONS
    // ========================================================================

    /// Respond to a server-issued authentication challenge.
    pub async fn sign_challenge(&self, challenge: &AuthChallenge) -> Result<SignedMessage> {
        let keypair = self.load_keypair().await?;
        self.signer.sign_challenge(&keypair, challenge)
    }

    /// Produce a registration signature for a new account.
    pub async fn create_registration_signature(
        &self,
        username: &str,
        email: Option<&str>,
    ) -> Result<SignedMessage> {
        let keypair = self.load_keypair().await?;
        self.signer
            .create_registration_signature(&keypair, username, email)
    }

    /// Sign a generic request payload.
    pub async fn sign_request(
        &self,
        data: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<SignedMessage> {
        let keypair = self.load_keypair().await?;
        self.signer.sign_request(&keypair, data)
    }

    /// Verify a signed message against freshness and the given key.
    ///
    /// Pure read; returns `false` rather than erroring on any failure.
    pub fn verify(&self, message: &str, signature: &str, public_key: &str, timestamp: i64) -> bool {
        self.signer.verify(message, signature, public_key, timestamp)
    }

    /// Verify a challenge response end-to-end (signature + both timers).
    pub fn verify_challenge(&self, challenge: &AuthChallenge, signed: &SignedMessage) -> bool {
        self.signer.verify_challenge(challenge, signed)
    }

    async fn load_keypair(&self) -> Result<KeyPair> {
        let (private_key, _): (Zeroizing<String>, String) = self
            .store
            .load_identity(Namespace::Primary)
            .await?
            .ok_or(Error::NoIdentity)?;

        self.engine.keypair_from_private_key(&private_key)
    }
}

/// Shorten a public key for display: first 8 + last 8 hex chars.
///
/// Pure formatting with no cryptographic relevance; part of the public
/// contract because other layers render keys this way.
pub fn shorten_public_key(public_key: &str) -> String {
    // Counted in chars: keys are hex, but the helper accepts any string.
    let chars: Vec<char> = public_key.chars().collect();
    if chars.len() <= 16 {
        return public_key.to_string();
    }

    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 8..].iter().collect();
    format!("{}...{}", head, tail)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStorage, UnsupportedStorage};
    use crate::time::SystemClock;

    fn manager() -> IdentityManager {
        IdentityManager::with_defaults(Arc::new(MemoryStorage::new()))
    }

    #[tokio::test]
    async fn test_create_identity() {
        let mgr = manager();

        assert!(!mgr.has_identity().await.unwrap());

        let public_key = mgr.create_identity().await.unwrap();
        assert!(public_key.starts_with("04"));
        assert_eq!(public_key.len(), 130);

        assert!(mgr.has_identity().await.unwrap());
        assert_eq!(mgr.get_public_key().await.unwrap().unwrap(), public_key);
    }

    #[tokio::test]
    async fn test_returned_key_is_durably_stored() {
        let mgr = manager();
        let public_key = mgr.create_identity().await.unwrap();

        // What the caller received must match what storage holds
        let (private, stored_public) = mgr
            .store
            .load_identity(Namespace::Primary)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored_public, public_key);
        assert_eq!(
            mgr.engine.derive_public_key(&private).unwrap(),
            public_key
        );
    }

    #[tokio::test]
    async fn test_import_from_private_key() {
        let mgr = manager();
        let keypair = CurveEngine::new().generate_keypair().unwrap();

        let public_key = mgr
            .import_from_private_key(keypair.private_key_hex())
            .await
            .unwrap();
        assert_eq!(public_key, keypair.public_key_hex());

        assert!(matches!(
            mgr.import_from_private_key("not a key").await,
            Err(Error::InvalidKey(_))
        ));
    }

    #[tokio::test]
    async fn test_import_from_recovery_phrase_deterministic() {
        let phrase =
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

        let pk1 = manager().import_from_recovery_phrase(phrase).await.unwrap();
        let pk2 = manager().import_from_recovery_phrase(phrase).await.unwrap();
        assert_eq!(pk1, pk2);

        assert!(matches!(
            manager().import_from_recovery_phrase("twelve bogus words").await,
            Err(Error::InvalidRecoveryPhrase(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let mgr = manager();
        mgr.create_identity().await.unwrap();

        let result = mgr.delete_identity(DeleteOptions::default()).await;
        assert!(matches!(result, Err(Error::ConfirmationRequired)));

        // No storage mutation happened
        assert!(mgr.has_identity().await.unwrap());
    }

    #[tokio::test]
    async fn test_backup_before_delete() {
        let mgr = manager();
        let public_key = mgr.create_identity().await.unwrap();

        let outcome = mgr
            .delete_identity(DeleteOptions {
                user_confirmed: true,
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(outcome.deleted);
        assert!(outcome.backup_succeeded);
        assert!(!mgr.has_identity().await.unwrap());

        // Backup holds material whose derived public key matches the
        // pre-deletion public key
        let (private, _) = mgr
            .store
            .load_identity(Namespace::Backup)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(mgr.engine.derive_public_key(&private).unwrap(), public_key);
    }

    #[tokio::test]
    async fn test_delete_skip_backup() {
        let mgr = manager();
        mgr.create_identity().await.unwrap();

        let outcome = mgr
            .delete_identity(DeleteOptions {
                skip_backup: true,
                user_confirmed: true,
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(outcome.deleted);
        assert!(!outcome.backup_succeeded);
        assert!(mgr
            .store
            .load_identity(Namespace::Backup)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_force_delete_purges_backup() {
        let mgr = manager();
        mgr.create_identity().await.unwrap();
        mgr.backup_identity().await.unwrap();

        let outcome = mgr
            .delete_identity(DeleteOptions {
                skip_backup: true,
                force: true,
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(outcome.deleted);
        assert!(mgr
            .store
            .load_identity(Namespace::Backup)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_nothing() {
        let mgr = manager();
        let outcome = mgr
            .delete_identity(DeleteOptions {
                user_confirmed: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(!outcome.deleted);
        assert!(!outcome.backup_succeeded);
    }

    #[tokio::test]
    async fn test_backup_with_no_identity_is_false() {
        let mgr = manager();
        assert!(!mgr.backup_identity().await.unwrap());
    }

    #[tokio::test]
    async fn test_restore_from_backup() {
        let mgr = manager();
        let original = mgr.create_identity().await.unwrap();
        mgr.backup_identity().await.unwrap();

        mgr.delete_identity(DeleteOptions {
            skip_backup: true,
            user_confirmed: true,
            ..Default::default()
        })
        .await
        .unwrap();
        assert!(!mgr.has_identity().await.unwrap());

        assert!(mgr.restore_from_backup().await.unwrap());
        assert_eq!(mgr.get_public_key().await.unwrap().unwrap(), original);
    }

    #[tokio::test]
    async fn test_restore_absent_backup_is_false() {
        let mgr = manager();
        assert!(!mgr.restore_from_backup().await.unwrap());
    }

    #[tokio::test]
    async fn test_restore_inconsistent_backup_leaves_primary_untouched() {
        let mgr = manager();
        let original = mgr.create_identity().await.unwrap();

        // Backup whose public key is not derivable from its private key
        let other = CurveEngine::new().generate_keypair().unwrap();
        let mismatched = CurveEngine::new().generate_keypair().unwrap();
        mgr.store
            .store_identity(
                Namespace::Backup,
                other.private_key_hex(),
                mismatched.public_key_hex(),
            )
            .await
            .unwrap();

        assert!(!mgr.restore_from_backup().await.unwrap());
        assert_eq!(mgr.get_public_key().await.unwrap().unwrap(), original);
    }

    #[tokio::test]
    async fn test_verify_integrity() {
        let mgr = manager();
        assert!(!mgr.verify_integrity().await.unwrap());

        mgr.create_identity().await.unwrap();
        assert!(mgr.verify_integrity().await.unwrap());

        // Corrupt the stored public key
        let other = CurveEngine::new().generate_keypair().unwrap();
        mgr.store
            .put(
                Namespace::Primary,
                slots::PUBLIC_KEY,
                other.public_key_hex().as_bytes(),
            )
            .await
            .unwrap();
        assert!(!mgr.verify_integrity().await.unwrap());
    }

    #[tokio::test]
    async fn test_migrate_to_shared() {
        let mgr = manager();
        mgr.create_identity().await.unwrap();

        assert!(mgr.migrate_to_shared().await.unwrap());
        assert!(mgr
            .store
            .load_identity(Namespace::Shared)
            .await
            .unwrap()
            .is_some());

        // Idempotent
        assert!(mgr.migrate_to_shared().await.unwrap());
    }

    #[tokio::test]
    async fn test_migrate_without_identity() {
        let mgr = manager();
        assert!(matches!(
            mgr.migrate_to_shared().await,
            Err(Error::NoIdentity)
        ));
    }

    #[tokio::test]
    async fn test_migrate_overwrites_partial_shared_tuple() {
        let mgr = manager();
        let public_key = mgr.create_identity().await.unwrap();

        // Only half of the shared tuple is present
        mgr.store
            .put(Namespace::Shared, slots::PUBLIC_KEY, b"04stale")
            .await
            .unwrap();

        assert!(mgr.migrate_to_shared().await.unwrap());
        let (_, shared_public) = mgr
            .store
            .load_identity(Namespace::Shared)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(shared_public, public_key);
    }

    #[tokio::test]
    async fn test_migrate_propagates_shared_read_failure() {
        struct SharedReadFailing(MemoryStorage);

        #[async_trait::async_trait]
        impl crate::store::SecureStorageProvider for SharedReadFailing {
            async fn put(&self, key: &str, value: &[u8], policy: AccessPolicy) -> Result<()> {
                self.0.put(key, value, policy).await
            }

            async fn get(&self, key: &str) -> Result<Option<Zeroizing<Vec<u8>>>> {
                if key.contains(".shared.") {
                    return Err(Error::StorageUnavailable("shared location offline".into()));
                }
                self.0.get(key).await
            }

            async fn delete(&self, key: &str) -> Result<bool> {
                self.0.delete(key).await
            }

            fn supports(&self, _policy: AccessPolicy) -> bool {
                true
            }
        }

        let mgr = IdentityManager::with_defaults(Arc::new(SharedReadFailing(
            MemoryStorage::new(),
        )));
        mgr.create_identity().await.unwrap();

        assert!(matches!(
            mgr.migrate_to_shared().await,
            Err(Error::StorageUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_migrate_unsupported_provider() {
        let mgr = IdentityManager::with_defaults(Arc::new(UnsupportedStorage));
        assert!(matches!(
            mgr.migrate_to_shared().await,
            Err(Error::StorageUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_sign_challenge_requires_identity() {
        let mgr = manager();
        let challenge = AuthChallenge {
            challenge: "nonce".into(),
            issued_at: SystemClock.now_millis(),
        };

        assert!(matches!(
            mgr.sign_challenge(&challenge).await,
            Err(Error::NoIdentity)
        ));
    }

    #[tokio::test]
    async fn test_sign_and_verify_challenge() {
        let mgr = manager();
        mgr.create_identity().await.unwrap();

        let challenge = AuthChallenge {
            challenge: "nonce-42".into(),
            issued_at: SystemClock.now_millis(),
        };
        let signed = mgr.sign_challenge(&challenge).await.unwrap();

        assert!(mgr.verify_challenge(&challenge, &signed));
        assert!(mgr.verify(
            &signed.message,
            &signed.signature,
            &signed.public_key,
            signed.timestamp
        ));
    }

    #[tokio::test]
    async fn test_storage_failure_is_not_no_identity() {
        let mgr = IdentityManager::with_defaults(Arc::new(UnsupportedStorage));

        // Unknown state surfaces as an error, never as "no identity"
        assert!(matches!(
            mgr.has_identity().await,
            Err(Error::StorageUnavailable(_))
        ));
        assert!(matches!(
            mgr.create_identity().await,
            Err(Error::StorageUnavailable(_))
        ));
    }

    #[test]
    fn test_shorten_public_key() {
        let long = "04bb50e2d89a4ed70663d080659fe0ad4b9bc3e06c17a227433966cb59ceee020decddbf6e00192011648d13b1c00af770c0c1bb609d4d3a5c98a43772e0e18ef4";
        assert_eq!(shorten_public_key(long), "04bb50e2...e0e18ef4");

        // Short inputs pass through unchanged
        assert_eq!(shorten_public_key("abcd1234"), "abcd1234");
        assert_eq!(shorten_public_key("0123456789abcdef"), "0123456789abcdef");
    }

    #[test]
    fn test_shorten_public_key_multibyte_input() {
        // Display helper must not panic on non-ASCII input
        assert_eq!(
            shorten_public_key("ключидентичностидляпоказа"),
            "ключиден...ляпоказа"
        );
        assert_eq!(shorten_public_key("ключ"), "ключ");
    }
}
