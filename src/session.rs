//! Session state: the signed-in user and their credential.
//!
//! The credential is read-only once stored; login, logout, and detected
//! expiry replace the whole session value, and every reader observes the
//! latest value on its next access. Sessions persist across restarts
//! through a small key-value [`StorageAdapter`] (a JSON file in
//! production, memory in tests), under the same `token`/`user` keys the
//! backend's other clients use.

use crate::model::UserProfile;
use crate::monitor::OnExpired;
use crate::token::Credential;
use arc_swap::ArcSwapOption;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

const TOKEN_KEY: &str = "token";
const USER_KEY: &str = "user";

/// Errors raised by session persistence.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing file could not be read or written.
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// A persisted record is not valid JSON.
    #[error("persisted session is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Key-value persistence boundary for session state.
pub trait StorageAdapter: Send + Sync + std::fmt::Debug {
    /// Read a value.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    /// Write a value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    /// Delete a value.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// JSON-file storage: one flat string-to-string object.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Store backed by the given file; created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    fn read_all(&self) -> Result<HashMap<String, String>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, map: &HashMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(map)?)?;
        Ok(())
    }
}

impl StorageAdapter for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock().unwrap();
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap();
        let mut map = self.read_all()?;
        map.insert(key.to_string(), value.to_string());
        self.write_all(&map)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap();
        let mut map = self.read_all()?;
        if map.remove(key).is_some() {
            self.write_all(&map)?;
        }
        Ok(())
    }
}

/// In-memory storage for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageAdapter for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.map.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.map.lock().unwrap().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.map.lock().unwrap().remove(key);
        Ok(())
    }
}

/// One signed-in session.
#[derive(Debug, Clone)]
pub struct Session {
    /// Who is signed in.
    pub user: UserProfile,
    /// Their bearer credential.
    pub credential: Credential,
}

/// Holds the current session and keeps it in sync with storage.
#[derive(Debug)]
pub struct SessionStore {
    storage: Arc<dyn StorageAdapter>,
    current: ArcSwapOption<Session>,
}

impl SessionStore {
    /// Store over the given persistence adapter, initially signed out.
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self { storage, current: ArcSwapOption::from(None) }
    }

    /// Restore a persisted session, if one exists and still decodes.
    /// A malformed persisted credential clears the stored state rather
    /// than producing a half-constructed session.
    pub fn load(&self) -> Result<Option<Arc<Session>>, StoreError> {
        let raw_token = self.storage.get(TOKEN_KEY)?;
        let raw_user = self.storage.get(USER_KEY)?;
        let (raw_token, raw_user) = match (raw_token, raw_user) {
            (Some(t), Some(u)) => (t, u),
            _ => return Ok(None),
        };
        let credential = match Credential::parse(raw_token) {
            Ok(credential) => credential,
            Err(e) => {
                warn!(error = %e, "discarding undecodable persisted credential");
                self.clear_storage()?;
                return Ok(None);
            }
        };
        let user: UserProfile = match serde_json::from_str(&raw_user) {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "discarding malformed persisted user record");
                self.clear_storage()?;
                return Ok(None);
            }
        };
        let session = Arc::new(Session { user, credential });
        self.current.store(Some(Arc::clone(&session)));
        debug!(username = %session.user.username, "restored persisted session");
        Ok(Some(session))
    }

    /// Sign in: replace the whole session value and persist it.
    pub fn login(&self, user: UserProfile, credential: Credential) -> Result<(), StoreError> {
        self.storage.set(TOKEN_KEY, credential.raw())?;
        self.storage.set(USER_KEY, &serde_json::to_string(&user)?)?;
        debug!(username = %user.username, "session established");
        self.current.store(Some(Arc::new(Session { user, credential })));
        Ok(())
    }

    /// Sign out: clear the session and its persisted state.
    pub fn logout(&self) -> Result<(), StoreError> {
        self.current.store(None);
        self.clear_storage()?;
        debug!("session cleared");
        Ok(())
    }

    /// The current session snapshot.
    pub fn current(&self) -> Option<Arc<Session>> {
        self.current.load_full()
    }

    /// The current credential, when signed in.
    pub fn credential(&self) -> Option<Credential> {
        self.current().map(|s| s.credential.clone())
    }

    /// Whether the signed-in user holds the admin role.
    pub fn is_admin(&self) -> bool {
        self.current().map(|s| s.user.is_admin()).unwrap_or(false)
    }

    /// Whether the signed-in user holds the employee role.
    pub fn is_employee(&self) -> bool {
        self.current().map(|s| s.user.is_employee()).unwrap_or(false)
    }

    /// Expiry callback for a monitor watching this store's credential:
    /// clears the session the same way a logout does.
    pub fn expiry_callback(self: Arc<Self>) -> OnExpired {
        Arc::new(move || {
            warn!("credential expired, clearing session");
            if let Err(e) = self.logout() {
                warn!(error = %e, "failed clearing persisted session state");
            }
        })
    }

    fn clear_storage(&self) -> Result<(), StoreError> {
        self.storage.remove(TOKEN_KEY)?;
        self.storage.remove(USER_KEY)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::test_support::encode_token;
    use serde_json::json;

    const NOW: u64 = 1_700_000_000;

    fn profile(roles: &[&str]) -> UserProfile {
        UserProfile {
            username: "chef_amara".to_string(),
            email: Some("amara@example.test".to_string()),
            first_name: Some("Amara".to_string()),
            last_name: Some("Iyer".to_string()),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            role: None,
        }
    }

    fn credential() -> Credential {
        Credential::parse(encode_token(&json!({"exp": NOW + 3600, "sub": "chef_amara"})))
            .unwrap()
    }

    #[test]
    fn login_persists_and_exposes_the_session() {
        let storage = Arc::new(MemoryStore::new());
        let store = SessionStore::new(storage.clone());

        store.login(profile(&["ROLE_ADMIN"]), credential()).unwrap();

        assert!(store.is_admin());
        assert!(!store.is_employee());
        assert_eq!(store.credential().unwrap().claims().sub.as_deref(), Some("chef_amara"));
        assert!(storage.get("token").unwrap().is_some());
        assert!(storage.get("user").unwrap().is_some());
    }

    #[test]
    fn logout_clears_memory_and_storage() {
        let storage = Arc::new(MemoryStore::new());
        let store = SessionStore::new(storage.clone());
        store.login(profile(&["ROLE_EMPLOYEE"]), credential()).unwrap();

        store.logout().unwrap();

        assert!(store.current().is_none());
        assert!(storage.get("token").unwrap().is_none());
        assert!(storage.get("user").unwrap().is_none());
    }

    #[test]
    fn load_restores_a_persisted_session() {
        let storage = Arc::new(MemoryStore::new());
        {
            let store = SessionStore::new(storage.clone());
            store.login(profile(&["ROLE_ADMIN"]), credential()).unwrap();
        }

        let fresh = SessionStore::new(storage);
        let session = fresh.load().unwrap().expect("session should restore");
        assert_eq!(session.user.username, "chef_amara");
        assert!(fresh.is_admin());
    }

    #[test]
    fn load_discards_undecodable_tokens() {
        let storage = Arc::new(MemoryStore::new());
        storage.set("token", "garbage").unwrap();
        storage.set("user", &serde_json::to_string(&profile(&[])).unwrap()).unwrap();

        let store = SessionStore::new(storage.clone());
        assert!(store.load().unwrap().is_none());
        assert!(storage.get("token").unwrap().is_none(), "bad state is cleared");
    }

    #[test]
    fn load_with_no_persisted_state_is_signed_out() {
        let store = SessionStore::new(Arc::new(MemoryStore::new()));
        assert!(store.load().unwrap().is_none());
        assert!(store.current().is_none());
        assert!(!store.is_admin());
    }

    #[test]
    fn expiry_callback_clears_like_logout() {
        let storage = Arc::new(MemoryStore::new());
        let store = Arc::new(SessionStore::new(storage.clone()));
        store.login(profile(&["ROLE_ADMIN"]), credential()).unwrap();

        let callback = Arc::clone(&store).expiry_callback();
        callback();

        assert!(store.current().is_none());
        assert!(storage.get("token").unwrap().is_none());
    }

    #[test]
    fn file_store_round_trips_values() {
        let dir = std::env::temp_dir().join(format!(
            "brigade-session-test-{}-{:?}",
            std::process::id(),
            std::thread::current().id()
        ));
        let path = dir.join("session.json");
        let store = FileStore::new(&path);

        assert!(store.get("token").unwrap().is_none());
        store.set("token", "abc").unwrap();
        store.set("user", "{}").unwrap();
        assert_eq!(store.get("token").unwrap().as_deref(), Some("abc"));

        store.remove("token").unwrap();
        assert!(store.get("token").unwrap().is_none());
        assert_eq!(store.get("user").unwrap().as_deref(), Some("{}"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
