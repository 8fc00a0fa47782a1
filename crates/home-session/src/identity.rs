//! Persisted identity record storage.
//!
//! The entry view stores the signed-in user as a single JSON record under a
//! fixed name. The UserHome view only ever reads it, and clears it on logout.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chat_core::User;
use tracing::debug;

use crate::error::SessionError;

/// Fixed storage name of the current-user record.
pub const STORAGE_KEY: &str = "usuario";

/// Storage for the current-user record.
///
/// `load` returns the raw record so that callers decide how to treat
/// malformed content.
pub trait IdentityStore: Send + Sync {
    /// Read the raw record, `None` when nothing is stored.
    fn load(&self) -> Result<Option<String>, SessionError>;

    /// Store a user as the current record.
    fn save(&self, user: &User) -> Result<(), SessionError>;

    /// Remove the current record. Clearing an empty store succeeds.
    fn clear(&self) -> Result<(), SessionError>;
}

/// Identity record kept as a JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileIdentityStore {
    path: PathBuf,
}

impl FileIdentityStore {
    /// Store the record at an explicit file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store the record as `usuario.json` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(format!("{}.json", STORAGE_KEY)))
    }

    /// Path of the record file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IdentityStore for FileIdentityStore {
    fn load(&self) -> Result<Option<String>, SessionError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(None),
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, user: &User) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string_pretty(user)?;
        fs::write(&self.path, raw)?;
        debug!("Saved identity record to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Removed identity record {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Identity record held in memory. Used by tests and demos.
#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    record: Mutex<Option<String>>,
}

impl MemoryIdentityStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the given raw record, which need not be valid JSON.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            record: Mutex::new(Some(raw.into())),
        }
    }

    /// A store holding the given user.
    pub fn with_user(user: &User) -> Result<Self, SessionError> {
        Ok(Self::with_raw(serde_json::to_string(user)?))
    }

    /// Whether a record is currently stored.
    pub fn is_empty(&self) -> bool {
        self.lock().is_none()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.record.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl IdentityStore for MemoryIdentityStore {
    fn load(&self) -> Result<Option<String>, SessionError> {
        Ok(self.lock().clone().filter(|raw| !raw.trim().is_empty()))
    }

    fn save(&self, user: &User) -> Result<(), SessionError> {
        *self.lock() = Some(serde_json::to_string(user)?);
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.lock() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn scratch_dir() -> PathBuf {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        let n = COUNTER.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir().join(format!("home-session-identity-{}-{}", std::process::id(), n))
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = scratch_dir();
        let store = FileIdentityStore::in_dir(&dir);
        assert_eq!(store.path(), dir.join("usuario.json"));

        assert!(store.load().unwrap().is_none());

        let user = User::new("u1", "Ana", "a@x.com");
        store.save(&user).unwrap();
        let raw = store.load().unwrap().unwrap();
        let loaded: User = serde_json::from_str(&raw).unwrap();
        assert_eq!(loaded, user);

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        // Clearing twice is fine
        store.clear().unwrap();

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_file_store_blank_file_is_absent() {
        let dir = scratch_dir();
        fs::create_dir_all(&dir).unwrap();
        let store = FileIdentityStore::in_dir(&dir);
        fs::write(store.path(), "  \n").unwrap();

        assert!(store.load().unwrap().is_none());

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryIdentityStore::new();
        assert!(store.is_empty());

        store.save(&User::new("u1", "Ana", "a@x.com")).unwrap();
        assert!(store.load().unwrap().unwrap().contains("\"nombre\":\"Ana\""));

        store.clear().unwrap();
        assert!(store.is_empty());
    }
}
