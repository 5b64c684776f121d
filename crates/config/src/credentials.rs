// Credential persistence
//
// The session token is the only client-side state that survives a restart.
// It is stored under a fixed key in one of:
// 1. System keychain (preferred)
// 2. A 0600 JSON file in the config directory
// 3. Memory (tests, throwaway sessions)

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Fixed key the session token is stored under.
pub const CREDENTIAL_KEY: &str = "auth-token";

/// Service name for keychain storage
#[cfg(feature = "keychain")]
const KEYCHAIN_SERVICE: &str = "filehost";

/// Error type for credential storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Reading or writing the backing file failed
    Io(String),
    /// The stored value could not be encoded or decoded
    Serialize(String),
    /// The system keychain rejected the operation
    Keychain(String),
    /// No usable location for the store
    Unavailable(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(msg) => write!(f, "I/O error: {}", msg),
            StoreError::Serialize(msg) => write!(f, "Invalid credential data: {}", msg),
            StoreError::Keychain(msg) => write!(f, "Keychain error: {}", msg),
            StoreError::Unavailable(msg) => write!(f, "Credential store unavailable: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// Minimal key-value persistence for the session token.
pub trait CredentialStore {
    /// Read the stored token, `None` when nothing is stored.
    fn get(&self) -> Result<Option<String>, StoreError>;

    /// Replace the stored token.
    fn set(&self, token: &str) -> Result<(), StoreError>;

    /// Remove the stored token. Clearing an empty store succeeds.
    fn clear(&self) -> Result<(), StoreError>;
}

/// In-memory store. Clones share the same slot, so a test can keep one
/// handle and inspect what the session persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Rc<RefCell<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self { slot: Rc::new(RefCell::new(Some(token.into()))) }
    }

    /// Current contents, for inspection.
    pub fn peek(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self) -> Result<Option<String>, StoreError> {
        Ok(self.slot.borrow().clone())
    }

    fn set(&self, token: &str) -> Result<(), StoreError> {
        *self.slot.borrow_mut() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.slot.borrow_mut() = None;
        Ok(())
    }
}

/// File-backed store. The file holds a single JSON object keyed by
/// [`CREDENTIAL_KEY`] and is restricted to the owner on Unix.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at ~/.config/filehost/credentials.json
    pub fn default_location() -> Result<Self, StoreError> {
        let dir = dirs::config_dir()
            .ok_or_else(|| StoreError::Unavailable("could not determine config directory".into()))?;
        Ok(Self::new(dir.join("filehost").join("credentials.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, StoreError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = fs::read_to_string(&self.path)
            .map_err(|e| StoreError::Io(format!("Failed to read {}: {}", self.path.display(), e)))?;
        serde_json::from_str(&contents).map_err(|e| StoreError::Serialize(e.to_string()))
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| StoreError::Io(format!("Failed to create config directory: {}", e)))?;
        }

        let contents = serde_json::to_string_pretty(map)
            .map_err(|e| StoreError::Serialize(e.to_string()))?;

        fs::write(&self.path, contents)
            .map_err(|e| {
                StoreError::Io(format!("Failed to write {}: {}", self.path.display(), e))
            })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&self.path, permissions)
                .map_err(|e| StoreError::Io(format!("Failed to set file permissions: {}", e)))?;
        }

        Ok(())
    }
}

impl CredentialStore for FileStore {
    fn get(&self) -> Result<Option<String>, StoreError> {
        Ok(self.read_map()?.remove(CREDENTIAL_KEY).filter(|t| !t.is_empty()))
    }

    fn set(&self, token: &str) -> Result<(), StoreError> {
        // An unreadable file is replaced rather than blocking a fresh login.
        let mut map = self.read_map().unwrap_or_default();
        map.insert(CREDENTIAL_KEY.to_string(), token.to_string());
        self.write_map(&map)
    }

    fn clear(&self) -> Result<(), StoreError> {
        if !self.path.exists() {
            return Ok(());
        }
        let mut map = self.read_map().unwrap_or_default();
        map.remove(CREDENTIAL_KEY);
        if map.is_empty() {
            fs::remove_file(&self.path)
                .map_err(|e| {
                StoreError::Io(format!("Failed to delete {}: {}", self.path.display(), e))
            })
        } else {
            self.write_map(&map)
        }
    }
}

/// System keychain store.
#[cfg(feature = "keychain")]
#[derive(Debug, Clone)]
pub struct KeychainStore {
    service: String,
}

#[cfg(feature = "keychain")]
impl KeychainStore {
    pub fn new() -> Self {
        Self { service: KEYCHAIN_SERVICE.to_string() }
    }

    fn entry(&self) -> Result<keyring::Entry, StoreError> {
        keyring::Entry::new(&self.service, CREDENTIAL_KEY)
            .map_err(|e| StoreError::Keychain(format!("Failed to access keychain entry: {}", e)))
    }
}

#[cfg(feature = "keychain")]
impl Default for KeychainStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "keychain")]
impl CredentialStore for KeychainStore {
    fn get(&self) -> Result<Option<String>, StoreError> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(StoreError::Keychain(format!("Failed to read token: {}", e))),
        }
    }

    fn set(&self, token: &str) -> Result<(), StoreError> {
        self.entry()?
            .set_password(token)
            .map_err(|e| StoreError::Keychain(format!("Failed to store token in keychain: {}", e)))
    }

    fn clear(&self) -> Result<(), StoreError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(StoreError::Keychain(format!(
                "Failed to delete token from keychain: {}",
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_shared_slot() {
        let store = MemoryStore::new();
        let handle = store.clone();
        assert_eq!(store.get().unwrap(), None);

        store.set("T1").unwrap();
        assert_eq!(handle.peek().as_deref(), Some("T1"));

        handle.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("filehost/credentials.json"));

        assert_eq!(store.get().unwrap(), None);
        store.set("tok123").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("tok123"));

        let raw = fs::read_to_string(store.path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json[CREDENTIAL_KEY], "tok123");

        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_file_store_clear_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("credentials.json"));
        assert!(store.clear().is_ok());
    }

    #[test]
    fn test_file_store_keeps_foreign_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(&path, r#"{"other":"x","auth-token":"old"}"#).unwrap();

        let store = FileStore::new(&path);
        store.clear().unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("other"));
        assert!(!raw.contains("auth-token"));
    }

    #[test]
    fn test_file_store_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(&path, "garbage").unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(store.get(), Err(StoreError::Serialize(_))));

        // A new login overwrites the corrupt file
        store.set("fresh").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("fresh"));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("credentials.json"));
        store.set("secret").unwrap();
        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
