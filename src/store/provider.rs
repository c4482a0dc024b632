//! Platform storage providers.
//!
//! The core never sniffs the runtime platform: the host's bootstrap code
//! picks a provider once and injects it. Every provider satisfies the same
//! `put`/`get`/`delete` contract; `supports` advertises which access
//! policies it can honor.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use async_trait::async_trait;
use parking_lot::RwLock;
use rand::rngs::OsRng;
use rand_core::RngCore;
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// AES-GCM nonce size in bytes
const NONCE_SIZE: usize = 12;

/// How a stored secret may be accessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    /// Readable only after device unlock, only by the originating app.
    DeviceUnlock,
    /// Deliberately shared with a defined group of cooperating apps (SSO).
    SharedGroup,
}

/// Platform-supplied secure key/value store.
///
/// ## Failure Semantics
///
/// - `get` returns `Ok(None)` for an absent key; an `Err` means the
///   storage subsystem itself failed and identity state is unknown.
/// - `delete` is idempotent: deleting an absent key returns `Ok(false)`.
#[async_trait]
pub trait SecureStorageProvider: Send + Sync {
    /// Store a secret under the given access policy.
    async fn put(&self, key: &str, value: &[u8], policy: AccessPolicy) -> Result<()>;

    /// Retrieve a secret. Absence is data, not an error.
    async fn get(&self, key: &str) -> Result<Option<Zeroizing<Vec<u8>>>>;

    /// Delete a secret. Returns whether anything was removed.
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Whether this provider can honor the given policy.
    fn supports(&self, policy: AccessPolicy) -> bool;
}

// ============================================================================
// IN-MEMORY PROVIDER (development/testing)
// ============================================================================

/// In-memory provider for tests and development.
#[derive(Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SecureStorageProvider for MemoryStorage {
    async fn put(&self, key: &str, value: &[u8], _policy: AccessPolicy) -> Result<()> {
        self.entries.write().insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Zeroizing<Vec<u8>>>> {
        Ok(self.entries.read().get(key).cloned().map(Zeroizing::new))
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.entries.write().remove(key).is_some())
    }

    fn supports(&self, _policy: AccessPolicy) -> bool {
        true
    }
}

// ============================================================================
// UNSUPPORTED PROVIDER (platforms without secure storage)
// ============================================================================

/// Provider for platforms without a secure storage capability.
///
/// Every operation fails with `StorageUnavailable`, which read paths
/// upstream surface as "identity state unknown" rather than "no identity".
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedStorage;

impl UnsupportedStorage {
    fn unavailable() -> Error {
        Error::StorageUnavailable("Secure storage is not supported on this platform".into())
    }
}

#[async_trait]
impl SecureStorageProvider for UnsupportedStorage {
    async fn put(&self, _key: &str, _value: &[u8], _policy: AccessPolicy) -> Result<()> {
        Err(Self::unavailable())
    }

    async fn get(&self, _key: &str) -> Result<Option<Zeroizing<Vec<u8>>>> {
        Err(Self::unavailable())
    }

    async fn delete(&self, _key: &str) -> Result<bool> {
        Err(Self::unavailable())
    }

    fn supports(&self, _policy: AccessPolicy) -> bool {
        false
    }
}

// ============================================================================
// FILE PROVIDER (encrypted at rest)
// ============================================================================

/// File-backed provider, one file per key, AES-256-GCM at rest.
///
/// `DeviceUnlock` secrets live under `device/`, `SharedGroup` secrets
/// under `shared/` — the latter stands in for a cross-application
/// location on platforms that expose one. Writes go to a temp file and
/// are renamed into place so a crash never leaves a torn record.
pub struct FileStorage {
    root: PathBuf,
    cipher: Aes256Gcm,
}

impl FileStorage {
    /// Open a file store rooted at `root`, encrypting with `key`.
    ///
    /// The 32-byte key is expected to come from the platform's keyring or
    /// an equivalent unlock-gated source.
    pub fn new(root: impl AsRef<Path>, key: &[u8; 32]) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key)),
        }
    }

    fn dir_for(&self, policy: AccessPolicy) -> PathBuf {
        match policy {
            AccessPolicy::DeviceUnlock => self.root.join("device"),
            AccessPolicy::SharedGroup => self.root.join("shared"),
        }
    }

    fn path_in(&self, policy: AccessPolicy, key: &str) -> PathBuf {
        // Storage keys are dotted identifiers; keep them filesystem-safe.
        let file = key.replace(['/', '\\'], "_");
        self.dir_for(policy).join(file)
    }

    /// Locate an existing record for `key` regardless of policy.
    ///
    /// An I/O failure during the lookup is a storage failure, not
    /// absence — the two must stay distinguishable for callers.
    async fn find(&self, key: &str) -> Result<Option<PathBuf>> {
        for policy in [AccessPolicy::DeviceUnlock, AccessPolicy::SharedGroup] {
            let path = self.path_in(policy, key);
            match tokio::fs::try_exists(&path).await {
                Ok(true) => return Ok(Some(path)),
                Ok(false) => {}
                Err(e) => return Err(Error::StorageUnavailable(e.to_string())),
            }
        }
        Ok(None)
    }

    fn seal(&self, key: &str, value: &[u8]) -> Result<Vec<u8>> {
        let mut nonce = [0u8; NONCE_SIZE];
        OsRng.try_fill_bytes(&mut nonce).map_err(|_| Error::RngFailed)?;

        let ciphertext = self
            .cipher
            .encrypt(
                Nonce::from_slice(&nonce),
                Payload {
                    msg: value,
                    // Binding the storage key prevents record swapping
                    aad: key.as_bytes(),
                },
            )
            .map_err(|_| Error::StorageWriteError("Encryption failed".into()))?;

        let mut record = nonce.to_vec();
        record.extend_from_slice(&ciphertext);
        Ok(record)
    }

    fn open(&self, key: &str, record: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        if record.len() < NONCE_SIZE {
            return Err(Error::StorageReadError("Stored record too short".into()));
        }

        let (nonce, ciphertext) = record.split_at(NONCE_SIZE);
        let plaintext = self
            .cipher
            .decrypt(
                Nonce::from_slice(nonce),
                Payload {
                    msg: ciphertext,
                    aad: key.as_bytes(),
                },
            )
            .map_err(|_| Error::StorageReadError("Record failed authentication".into()))?;

        Ok(Zeroizing::new(plaintext))
    }
}

#[async_trait]
impl SecureStorageProvider for FileStorage {
    async fn put(&self, key: &str, value: &[u8], policy: AccessPolicy) -> Result<()> {
        let dir = self.dir_for(policy);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| Error::StorageUnavailable(e.to_string()))?;

        let record = self.seal(key, value)?;

        let path = self.path_in(policy, key);
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, &record)
            .await
            .map_err(|e| Error::StorageWriteError(e.to_string()))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| Error::StorageWriteError(e.to_string()))?;

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Zeroizing<Vec<u8>>>> {
        let path = match self.find(key).await? {
            Some(p) => p,
            None => return Ok(None),
        };

        let record = match tokio::fs::read(&path).await {
            Ok(r) => r,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::StorageUnavailable(e.to_string())),
        };

        self.open(key, &record).map(Some)
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut removed = false;
        for policy in [AccessPolicy::DeviceUnlock, AccessPolicy::SharedGroup] {
            let path = self.path_in(policy, key);
            match tokio::fs::remove_file(&path).await {
                Ok(()) => removed = true,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(Error::StorageWriteError(e.to_string())),
            }
        }
        Ok(removed)
    }

    fn supports(&self, _policy: AccessPolicy) -> bool {
        true
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_roundtrip() {
        let store = MemoryStorage::new();

        store
            .put("test-key", b"test-value", AccessPolicy::DeviceUnlock)
            .await
            .unwrap();

        let value = store.get("test-key").await.unwrap().unwrap();
        assert_eq!(&**value, b"test-value");

        assert!(store.delete("test-key").await.unwrap());
        assert!(store.get("test-key").await.unwrap().is_none());
        // Idempotent
        assert!(!store.delete("test-key").await.unwrap());
    }

    #[tokio::test]
    async fn test_unsupported_always_unavailable() {
        let store = UnsupportedStorage;

        assert!(matches!(
            store.put("k", b"v", AccessPolicy::DeviceUnlock).await,
            Err(Error::StorageUnavailable(_))
        ));
        assert!(matches!(
            store.get("k").await,
            Err(Error::StorageUnavailable(_))
        ));
        assert!(!store.supports(AccessPolicy::DeviceUnlock));
        assert!(!store.supports(AccessPolicy::SharedGroup));
    }

    #[tokio::test]
    async fn test_file_roundtrip_encrypted() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStorage::new(dir.path(), &[7u8; 32]);

        store
            .put("oxy.primary.private_key", b"secret-bytes", AccessPolicy::DeviceUnlock)
            .await
            .unwrap();

        let value = store.get("oxy.primary.private_key").await.unwrap().unwrap();
        assert_eq!(&**value, b"secret-bytes");

        // On-disk record must not contain the plaintext
        let path = dir.path().join("device").join("oxy.primary.private_key");
        let raw = std::fs::read(path).unwrap();
        assert!(!raw.windows(b"secret-bytes".len()).any(|w| w == b"secret-bytes"));
    }

    #[tokio::test]
    async fn test_file_absent_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStorage::new(dir.path(), &[7u8; 32]);

        assert!(store.get("missing").await.unwrap().is_none());
        assert!(!store.delete("missing").await.unwrap());
    }

    #[tokio::test]
    async fn test_file_shared_policy_separate_location() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStorage::new(dir.path(), &[7u8; 32]);

        store
            .put("oxy.shared.private_key", b"sso", AccessPolicy::SharedGroup)
            .await
            .unwrap();

        assert!(dir.path().join("shared").join("oxy.shared.private_key").exists());
        let value = store.get("oxy.shared.private_key").await.unwrap().unwrap();
        assert_eq!(&**value, b"sso");
    }

    #[tokio::test]
    async fn test_file_io_failure_is_not_absence() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStorage::new(dir.path(), &[7u8; 32]);

        // A regular file where the policy directory should be makes every
        // lookup beneath it fail with a real I/O error, not NotFound.
        std::fs::write(dir.path().join("device"), b"in the way").unwrap();

        assert!(matches!(
            store.get("oxy.primary.private_key").await,
            Err(Error::StorageUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_file_wrong_key_fails_authentication() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStorage::new(dir.path(), &[7u8; 32]);
        store
            .put("k", b"v", AccessPolicy::DeviceUnlock)
            .await
            .unwrap();

        let other = FileStorage::new(dir.path(), &[8u8; 32]);
        assert!(matches!(
            other.get("k").await,
            Err(Error::StorageReadError(_))
        ));
    }
}
