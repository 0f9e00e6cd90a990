//! Durable key-value storage for the signed-in session.
//!
//! Three keys are kept: `accessToken`, `refreshToken` and `user` (the user
//! record as JSON). They are written together after a successful sign-in
//! and removed together on logout.

use std::collections::HashMap;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::api::LoginResponse;
use crate::error::StorageError;

use super::config::SessionBackend;
use super::data_dir;

const SESSION_FILE: &str = "session.json";
const KEYRING_SERVICE: &str = "fittrack";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKey {
    AccessToken,
    RefreshToken,
    User,
}

impl SessionKey {
    pub const ALL: [SessionKey; 3] = [
        SessionKey::AccessToken,
        SessionKey::RefreshToken,
        SessionKey::User,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKey::AccessToken => "accessToken",
            SessionKey::RefreshToken => "refreshToken",
            SessionKey::User => "user",
        }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Durable local storage.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: SessionKey) -> Result<Option<String>, StorageError>;
    fn set(&self, key: SessionKey, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: SessionKey) -> Result<(), StorageError>;
}

/// A session read back from storage.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSession {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub user: Option<serde_json::Value>,
}

/// Write tokens and user record after a successful sign-in.
pub fn persist_session(store: &dyn SessionStore, login: &LoginResponse) -> Result<(), StorageError> {
    let user = serde_json::to_string(&login.user)
        .map_err(|e| StorageError::QueryFailed(format!("serialize user: {e}")))?;
    store.set(SessionKey::AccessToken, &login.access)?;
    store.set(SessionKey::RefreshToken, &login.refresh)?;
    store.set(SessionKey::User, &user)?;
    Ok(())
}

/// `None` when no access token is stored.
pub fn load_session(store: &dyn SessionStore) -> Result<Option<StoredSession>, StorageError> {
    let Some(access_token) = store.get(SessionKey::AccessToken)? else {
        return Ok(None);
    };
    let refresh_token = store
        .get(SessionKey::RefreshToken)?
        .filter(|t| !t.is_empty());
    let user = match store.get(SessionKey::User)? {
        Some(raw) => match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(error = %e, "stored user record is not valid JSON");
                None
            }
        },
        None => None,
    };
    Ok(Some(StoredSession {
        access_token,
        refresh_token,
        user,
    }))
}

/// Remove every session key. Missing keys are not an error.
pub fn clear_session(store: &dyn SessionStore) -> Result<(), StorageError> {
    for key in SessionKey::ALL {
        store.remove(key)?;
    }
    Ok(())
}

/// Open the store selected in the configuration.
pub fn open_store(backend: SessionBackend) -> Result<Box<dyn SessionStore>, StorageError> {
    Ok(match backend {
        SessionBackend::File => Box::new(FileSessionStore::open()?),
        SessionBackend::Keyring => Box::new(KeyringSessionStore::new()),
    })
}

/// In-memory store for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<SessionKey, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().map(|e| e.is_empty()).unwrap_or(true)
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: SessionKey) -> Result<Option<String>, StorageError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StorageError::QueryFailed("session store poisoned".into()))?;
        Ok(entries.get(&key).cloned())
    }

    fn set(&self, key: SessionKey, value: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StorageError::QueryFailed("session store poisoned".into()))?;
        entries.insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: SessionKey) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StorageError::QueryFailed("session store poisoned".into()))?;
        entries.remove(&key);
        Ok(())
    }
}

/// JSON object in `session.json`, rewritten through a temp file on every change.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSessionStore {
    /// Store in the data directory.
    pub fn open() -> Result<Self, StorageError> {
        Ok(Self::at(data_dir()?.join(SESSION_FILE)))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file_error(&self, message: impl fmt::Display) -> StorageError {
        StorageError::SessionFile {
            path: self.path.clone(),
            message: message.to_string(),
        }
    }

    fn read_all(&self) -> Result<serde_json::Map<String, serde_json::Value>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(serde_json::Map::new()),
            Ok(content) => serde_json::from_str(&content).map_err(|e| self.file_error(e)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(serde_json::Map::new()),
            Err(e) => Err(self.file_error(e)),
        }
    }

    fn write_all(&self, map: &serde_json::Map<String, serde_json::Value>) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(map).map_err(|e| self.file_error(e))?;
        let tmp = self.path.with_extension("json.tmp");
        // A leftover temp file would keep its old mode.
        match std::fs::remove_file(&tmp) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => return Err(self.file_error(e)),
            _ => {}
        }
        let mut file = private_file(&tmp).map_err(|e| self.file_error(e))?;
        file.write_all(content.as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(|e| self.file_error(e))?;
        drop(file);
        std::fs::rename(&tmp, &self.path).map_err(|e| self.file_error(e))
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, ()>, StorageError> {
        self.lock
            .lock()
            .map_err(|_| self.file_error("session file lock poisoned"))
    }
}

/// New file readable only by the owner (tokens live in it).
fn private_file(path: &Path) -> std::io::Result<std::fs::File> {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options.open(path)
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: SessionKey) -> Result<Option<String>, StorageError> {
        let _guard = self.guard()?;
        let map = self.read_all()?;
        Ok(map
            .get(key.as_str())
            .and_then(|v| v.as_str())
            .map(String::from))
    }

    fn set(&self, key: SessionKey, value: &str) -> Result<(), StorageError> {
        let _guard = self.guard()?;
        let mut map = self.read_all()?;
        map.insert(key.as_str().to_string(), value.into());
        self.write_all(&map)
    }

    fn remove(&self, key: SessionKey) -> Result<(), StorageError> {
        let _guard = self.guard()?;
        let mut map = self.read_all()?;
        if map.remove(key.as_str()).is_some() {
            self.write_all(&map)?;
        }
        Ok(())
    }
}

/// OS keyring entries under the `fittrack` service.
#[derive(Debug, Default)]
pub struct KeyringSessionStore;

impl KeyringSessionStore {
    pub fn new() -> Self {
        Self
    }

    fn entry(key: SessionKey) -> Result<keyring::Entry, StorageError> {
        Ok(keyring::Entry::new(KEYRING_SERVICE, key.as_str())?)
    }
}

impl SessionStore for KeyringSessionStore {
    fn get(&self, key: SessionKey) -> Result<Option<String>, StorageError> {
        match Self::entry(key)?.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: SessionKey, value: &str) -> Result<(), StorageError> {
        Self::entry(key)?.set_password(value)?;
        Ok(())
    }

    fn remove(&self, key: SessionKey) -> Result<(), StorageError> {
        match Self::entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login() -> LoginResponse {
        LoginResponse {
            access: "acc-123".into(),
            refresh: "ref-456".into(),
            user: serde_json::json!({"id": 7, "email": "jane.doe@example.com"}),
        }
    }

    #[test]
    fn memory_store_persist_and_load() {
        let store = MemorySessionStore::new();
        assert_eq!(load_session(&store).unwrap(), None);

        persist_session(&store, &login()).unwrap();
        let session = load_session(&store).unwrap().unwrap();
        assert_eq!(session.access_token, "acc-123");
        assert_eq!(session.refresh_token.as_deref(), Some("ref-456"));
        assert_eq!(session.user.unwrap()["id"], 7);
    }

    #[test]
    fn clear_removes_everything() {
        let store = MemorySessionStore::new();
        persist_session(&store, &login()).unwrap();
        clear_session(&store).unwrap();
        assert!(store.is_empty());
        // Clearing twice is fine.
        clear_session(&store).unwrap();
    }

    #[test]
    fn file_store_uses_camel_case_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::at(dir.path().join(SESSION_FILE));
        persist_session(&store, &login()).unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["accessToken"], "acc-123");
        assert_eq!(json["refreshToken"], "ref-456");
        let user: serde_json::Value =
            serde_json::from_str(json["user"].as_str().unwrap()).unwrap();
        assert_eq!(user["email"], "jane.doe@example.com");
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SESSION_FILE);
        FileSessionStore::at(&path)
            .set(SessionKey::AccessToken, "tok")
            .unwrap();
        let reopened = FileSessionStore::at(&path);
        assert_eq!(
            reopened.get(SessionKey::AccessToken).unwrap().as_deref(),
            Some("tok")
        );
        reopened.remove(SessionKey::AccessToken).unwrap();
        assert_eq!(reopened.get(SessionKey::AccessToken).unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn file_store_is_private_to_owner() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SESSION_FILE);
        std::fs::write(path.with_extension("json.tmp"), "stale").unwrap();
        std::fs::set_permissions(
            path.with_extension("json.tmp"),
            std::fs::Permissions::from_mode(0o644),
        )
        .unwrap();

        let store = FileSessionStore::at(&path);
        store.set(SessionKey::AccessToken, "tok").unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        store.set(SessionKey::RefreshToken, "ref").unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::at(dir.path().join("nope.json"));
        assert_eq!(store.get(SessionKey::User).unwrap(), None);
        store.remove(SessionKey::User).unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn file_store_reports_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SESSION_FILE);
        std::fs::write(&path, "{not json").unwrap();
        let store = FileSessionStore::at(&path);
        assert!(matches!(
            store.get(SessionKey::AccessToken),
            Err(StorageError::SessionFile { .. })
        ));
    }

    #[test]
    fn empty_refresh_token_loads_as_none() {
        let store = MemorySessionStore::new();
        store.set(SessionKey::AccessToken, "a").unwrap();
        store.set(SessionKey::RefreshToken, "").unwrap();
        let session = load_session(&store).unwrap().unwrap();
        assert_eq!(session.refresh_token, None);
        assert_eq!(session.user, None);
    }
}
