//! Session Store
//! Mission: Process-wide session state with best-effort persistence
//!
//! The in-memory copy is authoritative for the lifetime of the process;
//! durable storage is a convenience for the next start. A storage
//! failure never aborts the session.

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::codec::Credential;
use super::models::UserProfile;

/// Persisted credential pair.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredTokens {
    pub access: Option<String>,
    pub refresh: Option<String>,
}

/// Durable client-side storage seam.
pub trait TokenStorage: Send + Sync {
    fn load(&self) -> Result<StoredTokens>;
    fn save(&self, tokens: &StoredTokens) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// JSON file storage.
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> Result<StoredTokens> {
        if !self.path.exists() {
            return Ok(StoredTokens::default());
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read token file {}", self.path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Malformed token file {}", self.path.display()))
    }

    fn save(&self, tokens: &StoredTokens) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        let raw = serde_json::to_string(tokens).context("Failed to serialize tokens")?;
        fs::write(&self.path, raw)
            .with_context(|| format!("Failed to write token file {}", self.path.display()))
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove token file {}", self.path.display()))?;
        }
        Ok(())
    }
}

/// In-memory storage, used as the fallback when no durable path is
/// configured and as the test double.
#[derive(Default)]
pub struct MemoryTokenStorage {
    slot: RwLock<StoredTokens>,
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> Result<StoredTokens> {
        Ok(self.slot.read().clone())
    }

    fn save(&self, tokens: &StoredTokens) -> Result<()> {
        *self.slot.write() = tokens.clone();
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot.write() = StoredTokens::default();
        Ok(())
    }
}

/// Single source of truth for the current session.
///
/// Holds the primary credential, the optional renewal credential, and
/// the resolved profile. A profile is present iff the last validation
/// pass or login succeeded.
pub struct SessionStore {
    storage: Box<dyn TokenStorage>,
    credential: RwLock<Option<Credential>>,
    renewal: RwLock<Option<String>>,
    profile: RwLock<Option<UserProfile>>,
    loading: AtomicBool,
}

impl SessionStore {
    pub fn new(storage: Box<dyn TokenStorage>) -> Self {
        Self {
            storage,
            credential: RwLock::new(None),
            renewal: RwLock::new(None),
            profile: RwLock::new(None),
            loading: AtomicBool::new(false),
        }
    }

    /// Read persisted tokens and install them in memory. Startup only.
    /// An unreadable store degrades to a signed-out session.
    pub fn load(&self) -> StoredTokens {
        let tokens = match self.storage.load() {
            Ok(t) => t,
            Err(e) => {
                warn!("Token storage unreadable, starting signed out: {:#}", e);
                StoredTokens::default()
            }
        };
        *self.credential.write() = tokens.access.as_deref().map(Credential::new);
        *self.renewal.write() = tokens.refresh.clone();
        tokens
    }

    /// Install a new primary credential, rotating the renewal
    /// credential only when a new one is supplied. Immediately visible
    /// to concurrent readers; persistence is best-effort.
    pub fn save(&self, access: &str, renewal: Option<&str>) {
        *self.credential.write() = Some(Credential::new(access));
        if renewal.is_some() {
            *self.renewal.write() = renewal.map(String::from);
        }
        let snapshot = StoredTokens {
            access: Some(access.to_string()),
            refresh: self.renewal.read().clone(),
        };
        if let Err(e) = self.storage.save(&snapshot) {
            warn!("Failed to persist session tokens, memory copy stands: {:#}", e);
        }
    }

    /// Drop every trace of the session, memory and durable store.
    pub fn clear(&self) {
        *self.credential.write() = None;
        *self.renewal.write() = None;
        *self.profile.write() = None;
        if let Err(e) = self.storage.clear() {
            warn!("Failed to clear persisted tokens: {:#}", e);
        }
    }

    pub fn credential(&self) -> Option<Credential> {
        self.credential.read().clone()
    }

    pub fn renewal(&self) -> Option<String> {
        self.renewal.read().clone()
    }

    pub fn set_profile(&self, profile: UserProfile) {
        *self.profile.write() = Some(profile);
    }

    pub fn profile(&self) -> Option<UserProfile> {
        self.profile.read().clone()
    }

    /// True only during the initial restore-from-storage pass.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    pub(crate) fn set_loading(&self, value: bool) {
        self.loading.store(value, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::models::Role;

    fn memory_store() -> SessionStore {
        SessionStore::new(Box::new(MemoryTokenStorage::default()))
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let store = memory_store();
        store.save("abc.def", Some("renewal-1"));

        let tokens = store.load();
        assert_eq!(tokens.access.as_deref(), Some("abc.def"));
        assert_eq!(tokens.refresh.as_deref(), Some("renewal-1"));
        assert_eq!(store.credential().unwrap().token(), "abc.def");
    }

    #[test]
    fn test_save_keeps_existing_renewal() {
        let store = memory_store();
        store.save("tok1", Some("renewal-1"));
        store.save("tok2", None);
        assert_eq!(store.renewal().as_deref(), Some("renewal-1"));

        store.save("tok3", Some("renewal-2"));
        assert_eq!(store.renewal().as_deref(), Some("renewal-2"));
    }

    #[test]
    fn test_clear_removes_everything() {
        let store = memory_store();
        store.save("tok", Some("ren"));
        store.set_profile(UserProfile {
            id: 1,
            username: "alice".into(),
            email: String::new(),
            role: Role::Regular,
            admin_level: 0,
        });

        store.clear();
        assert!(store.credential().is_none());
        assert!(store.renewal().is_none());
        assert!(store.profile().is_none());
        assert!(store.load().access.is_none());
    }

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");

        let storage = FileTokenStorage::new(&path);
        storage
            .save(&StoredTokens {
                access: Some("a".into()),
                refresh: Some("r".into()),
            })
            .unwrap();

        let loaded = storage.load().unwrap();
        assert_eq!(loaded.access.as_deref(), Some("a"));
        assert_eq!(loaded.refresh.as_deref(), Some("r"));

        storage.clear().unwrap();
        assert!(!path.exists());
        // clearing twice is fine
        storage.clear().unwrap();
        assert!(storage.load().unwrap().access.is_none());
    }

    #[test]
    fn test_unwritable_storage_keeps_memory_authoritative() {
        // The tempdir itself is a directory, so writing "to it" as a
        // file fails deterministically.
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(Box::new(FileTokenStorage::new(dir.path())));

        store.save("tok", None);
        assert_eq!(store.credential().unwrap().token(), "tok");
    }

    #[test]
    fn test_loading_flag() {
        let store = memory_store();
        assert!(!store.is_loading());
        store.set_loading(true);
        assert!(store.is_loading());
        store.set_loading(false);
        assert!(!store.is_loading());
    }
}
