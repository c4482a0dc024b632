//! Namespaced key store with an in-process read cache.
//!
//! The keystore owns the mapping from logical namespaces and slots to
//! provider keys, and memoizes "does an identity exist" / "what is the
//! public key" so hot read paths skip redundant storage round-trips.
//! Storage remains the source of truth: the cache is populated only after
//! a real read and is cleared by every mutation, never time-expired.

use std::sync::Arc;

use parking_lot::RwLock;
use zeroize::Zeroizing;

use crate::error::{Error, Result};
use crate::store::provider::{AccessPolicy, SecureStorageProvider};

/// Named slots within a namespace.
pub mod slots {
    /// The private key scalar, hex
    pub const PRIVATE_KEY: &str = "private_key";

    /// The public key point, hex
    pub const PUBLIC_KEY: &str = "public_key";

    /// Unix-millisecond timestamp of the last backup
    pub const BACKUP_TIMESTAMP: &str = "backup_timestamp";
}

/// Logical storage namespaces for identity material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    /// The device's single primary identity
    Primary,
    /// Backup copy, written before destructive operations
    Backup,
    /// Cross-application copy for SSO; synced explicitly via migration
    Shared,
}

impl Namespace {
    /// Namespace segment used in provider keys
    pub fn as_str(self) -> &'static str {
        match self {
            Namespace::Primary => "primary",
            Namespace::Backup => "backup",
            Namespace::Shared => "shared",
        }
    }

    /// Access policy secrets in this namespace are stored under
    pub fn policy(self) -> AccessPolicy {
        match self {
            Namespace::Primary | Namespace::Backup => AccessPolicy::DeviceUnlock,
            Namespace::Shared => AccessPolicy::SharedGroup,
        }
    }
}

#[derive(Default)]
struct IdentityCache {
    has_identity: Option<bool>,
    public_key: Option<Option<String>>,
}

/// Namespaced secure storage for identity key material.
///
/// The cache is owned by this instance — its lifecycle is tied to the
/// instance, not to the process, so tests never leak state across stores.
pub struct SecureKeyStore {
    provider: Arc<dyn SecureStorageProvider>,
    service: String,
    cache: RwLock<IdentityCache>,
}

impl SecureKeyStore {
    /// Create a key store over the given provider.
    ///
    /// `service` prefixes every provider key (e.g. `oxy.primary.private_key`)
    /// so cooperating apps sharing a provider stay isolated.
    pub fn new(provider: Arc<dyn SecureStorageProvider>, service: impl Into<String>) -> Self {
        Self {
            provider,
            service: service.into(),
            cache: RwLock::new(IdentityCache::default()),
        }
    }

    /// Whether the underlying provider can honor `policy`.
    pub fn supports(&self, policy: AccessPolicy) -> bool {
        self.provider.supports(policy)
    }

    fn storage_key(&self, namespace: Namespace, slot: &str) -> String {
        format!("{}.{}.{}", self.service, namespace.as_str(), slot)
    }

    /// Drop all memoized reads.
    ///
    /// Callers must finish their storage write BEFORE invalidating, so a
    /// concurrent reader never sees an empty cache backed by a
    /// not-yet-written store.
    pub fn invalidate_cache(&self) {
        let mut cache = self.cache.write();
        cache.has_identity = None;
        cache.public_key = None;
    }

    // ========================================================================
    // RAW SLOT ACCESS
    // ========================================================================

    /// Store a value; invalidates the read cache after the write lands.
    pub async fn put(&self, namespace: Namespace, slot: &str, value: &[u8]) -> Result<()> {
        self.provider
            .put(&self.storage_key(namespace, slot), value, namespace.policy())
            .await?;
        self.invalidate_cache();
        Ok(())
    }

    /// Retrieve a value; `None` means nothing is stored.
    pub async fn get(&self, namespace: Namespace, slot: &str) -> Result<Option<Zeroizing<Vec<u8>>>> {
        self.provider.get(&self.storage_key(namespace, slot)).await
    }

    /// Retrieve a value as UTF-8.
    pub async fn get_string(&self, namespace: Namespace, slot: &str) -> Result<Option<Zeroizing<String>>> {
        match self.get(namespace, slot).await? {
            Some(bytes) => {
                let s = String::from_utf8(bytes.to_vec())
                    .map_err(|_| Error::StorageReadError("Stored value is not UTF-8".into()))?;
                Ok(Some(Zeroizing::new(s)))
            }
            None => Ok(None),
        }
    }

    /// Delete a value (idempotent); invalidates the read cache.
    pub async fn delete(&self, namespace: Namespace, slot: &str) -> Result<bool> {
        let removed = self
            .provider
            .delete(&self.storage_key(namespace, slot))
            .await?;
        self.invalidate_cache();
        Ok(removed)
    }

    // ========================================================================
    // IDENTITY TUPLES
    // ========================================================================

    /// Store a (private, public) identity tuple in a namespace.
    ///
    /// The private key is written first so a reader can never observe a
    /// public key whose private half is missing after a crash mid-write.
    pub async fn store_identity(
        &self,
        namespace: Namespace,
        private_key_hex: &str,
        public_key_hex: &str,
    ) -> Result<()> {
        self.provider
            .put(
                &self.storage_key(namespace, slots::PRIVATE_KEY),
                private_key_hex.as_bytes(),
                namespace.policy(),
            )
            .await?;
        self.provider
            .put(
                &self.storage_key(namespace, slots::PUBLIC_KEY),
                public_key_hex.as_bytes(),
                namespace.policy(),
            )
            .await?;
        self.invalidate_cache();
        Ok(())
    }

    /// Load the (private, public) tuple from a namespace.
    ///
    /// Returns `None` when neither half is present. A half-present tuple
    /// is corruption, not absence — it surfaces as `IntegrityMismatch` so
    /// callers route to backup-restore rather than a false fresh
    /// registration.
    pub async fn load_identity(
        &self,
        namespace: Namespace,
    ) -> Result<Option<(Zeroizing<String>, String)>> {
        let private = self.get_string(namespace, slots::PRIVATE_KEY).await?;
        let public = self.get_string(namespace, slots::PUBLIC_KEY).await?;

        match (private, public) {
            (Some(private), Some(public)) => Ok(Some((private, public.to_string()))),
            (None, None) => Ok(None),
            _ => Err(Error::IntegrityMismatch(format!(
                "Partial identity tuple in {} namespace",
                namespace.as_str()
            ))),
        }
    }

    /// Remove all identity slots from a namespace (idempotent).
    ///
    /// Returns whether any slot was removed.
    pub async fn clear_identity(&self, namespace: Namespace) -> Result<bool> {
        let mut removed = false;
        for slot in [slots::PRIVATE_KEY, slots::PUBLIC_KEY, slots::BACKUP_TIMESTAMP] {
            removed |= self
                .provider
                .delete(&self.storage_key(namespace, slot))
                .await?;
        }
        self.invalidate_cache();
        Ok(removed)
    }

    // ========================================================================
    // CACHED READS
    // ========================================================================

    /// Whether a primary identity exists, memoized after the first real read.
    pub async fn has_identity(&self) -> Result<bool> {
        if let Some(known) = self.cache.read().has_identity {
            return Ok(known);
        }

        let exists = self
            .get(Namespace::Primary, slots::PRIVATE_KEY)
            .await?
            .is_some();

        self.cache.write().has_identity = Some(exists);
        Ok(exists)
    }

    /// The primary public key, memoized after the first real read.
    pub async fn get_public_key(&self) -> Result<Option<String>> {
        if let Some(known) = self.cache.read().public_key.clone() {
            return Ok(known);
        }

        let public = self
            .get_string(Namespace::Primary, slots::PUBLIC_KEY)
            .await?
            .map(|z| z.to_string());

        self.cache.write().public_key = Some(public.clone());
        Ok(public)
    }
}

// ============================================================================
// TESTS
// ============================================================================
