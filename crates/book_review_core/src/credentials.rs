//! crates/book_review_core/src/credentials.rs
//!
//! The credential store: the single durable holder of the bearer token and the
//! display name shown in the header.

use crate::domain::Session;
use crate::ports::{KeyValueStorage, PortResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const AUTH_TOKEN_KEY: &str = "authToken";
pub const USER_NAME_KEY: &str = "userName";

#[derive(Clone)]
pub struct CredentialStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl CredentialStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Persists a fresh session. A missing display name removes any stored one.
    pub fn set_session(&self, token: &str, display_name: Option<&str>) -> PortResult<()> {
        self.storage.set(AUTH_TOKEN_KEY, token)?;
        match display_name {
            Some(name) => self.storage.set(USER_NAME_KEY, name),
            None => self.storage.remove(USER_NAME_KEY),
        }
    }

    pub fn get_token(&self) -> Option<String> {
        self.storage.get(AUTH_TOKEN_KEY)
    }

    /// The stored display name, only while a token is held.
    pub fn display_name(&self) -> Option<String> {
        self.get_token()?;
        self.storage.get(USER_NAME_KEY)
    }

    /// Replaces the display name of the current session. Does nothing when logged out.
    pub fn set_display_name(&self, name: &str) -> PortResult<()> {
        if self.get_token().is_none() {
            return Ok(());
        }
        self.storage.set(USER_NAME_KEY, name)
    }

    pub fn session(&self) -> Session {
        match self.get_token() {
            Some(token) => Session {
                token: Some(token),
                display_name: self.storage.get(USER_NAME_KEY),
            },
            None => Session::default(),
        }
    }

    pub fn clear_session(&self) -> PortResult<()> {
        self.storage.remove(AUTH_TOKEN_KEY)?;
        self.storage.remove(USER_NAME_KEY)
    }
}

/// A process-local `KeyValueStorage`. Nothing survives the process.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still a valid map.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStorage for InMemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> PortResult<()> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> PortResult<()> {
        self.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (Arc<InMemoryStorage>, CredentialStore) {
        let storage = Arc::new(InMemoryStorage::new());
        (storage.clone(), CredentialStore::new(storage))
    }

    #[test]
    fn set_session_is_readable_until_cleared() {
        let (_, store) = store();
        store.set_session("abc", Some("Taro")).unwrap();

        assert_eq!(store.get_token().as_deref(), Some("abc"));
        assert_eq!(store.display_name().as_deref(), Some("Taro"));

        store.clear_session().unwrap();
        assert_eq!(store.get_token(), None);
        assert_eq!(store.display_name(), None);
        assert_eq!(store.session(), Session::default());
    }

    #[test]
    fn clear_session_is_idempotent() {
        let (_, store) = store();
        store.clear_session().unwrap();
        store.clear_session().unwrap();
        assert!(!store.session().is_authenticated());
    }

    #[test]
    fn display_name_is_hidden_without_a_token() {
        let (storage, store) = store();
        storage.set(USER_NAME_KEY, "stray").unwrap();

        assert_eq!(store.display_name(), None);
        assert_eq!(store.session().display_name, None);
    }

    #[test]
    fn new_session_without_name_drops_the_previous_name() {
        let (_, store) = store();
        store.set_session("first", Some("Taro")).unwrap();
        store.set_session("second", None).unwrap();

        assert_eq!(store.get_token().as_deref(), Some("second"));
        assert_eq!(store.display_name(), None);
    }

    #[test]
    fn set_display_name_requires_a_session() {
        let (storage, store) = store();
        store.set_display_name("Hanako").unwrap();
        assert_eq!(storage.get(USER_NAME_KEY), None);

        store.set_session("abc", Some("Taro")).unwrap();
        store.set_display_name("Hanako").unwrap();
        assert_eq!(store.display_name().as_deref(), Some("Hanako"));
    }
}
