//! Credential persistence (key/value plumbing only).
//!
//! The store never inspects values. Token and profile semantics live in
//! [`crate::session`] and [`crate::lifecycle`].

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store refused a write because it is full.
    #[error("storage quota exceeded while writing '{0}'")]
    QuotaExceeded(String),

    /// The backing store could not be reached (disabled, sandboxed, ...).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Internal lock poisoning (in-memory adapter).
    #[error("storage lock poisoned")]
    Poisoned,
}

/// Flat string key/value store.
///
/// Implemented by the in-memory adapter ([`crate::memory::MemoryStore`]) and
/// by browser `localStorage`/`sessionStorage` wrappers. All calls are
/// synchronous.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove_item(&self, key: &str) -> Result<(), StoreError>;

    /// Remove every entry.
    fn clear(&self) -> Result<(), StoreError>;
}

/// Persistent + session-scoped storage pair holding the credential bundle.
pub struct CredentialStore {
    persistent: Box<dyn KeyValueStore>,
    session: Box<dyn KeyValueStore>,
}

impl CredentialStore {
    pub fn new(
        persistent: impl KeyValueStore + 'static,
        session: impl KeyValueStore + 'static,
    ) -> Self {
        Self {
            persistent: Box::new(persistent),
            session: Box::new(session),
        }
    }

    /// First non-empty persistent value among `aliases`, in the given order.
    ///
    /// A failing read on one alias is logged and treated as absent.
    pub fn get(&self, aliases: &[&str]) -> Option<String> {
        aliases.iter().find_map(|key| match self.persistent.get_item(key) {
            Ok(Some(value)) if !value.is_empty() => Some(value),
            Ok(_) => None,
            Err(err) => {
                tracing::warn!(key = *key, error = %err, "credential read failed");
                None
            }
        })
    }

    pub fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.persistent.set_item(key, value)
    }

    /// Write entries in order.
    ///
    /// Not transactional: on failure the earlier entries stay written.
    pub fn set_many<'a, I>(&self, entries: I) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (key, value) in entries {
            self.persistent.set_item(key, value)?;
        }
        Ok(())
    }

    /// Remove `keys` from persistent storage.
    ///
    /// Every key is attempted; the first failure is returned.
    pub fn clear<'a, I>(&self, keys: I) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        remove_all(self.persistent.as_ref(), keys)
    }

    /// Remove `keys` from session-scoped storage.
    pub fn clear_session<'a, I>(&self, keys: I) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        remove_all(self.session.as_ref(), keys)
    }

    /// Wipe session-scoped storage entirely.
    pub fn clear_session_all(&self) -> Result<(), StoreError> {
        self.session.clear()
    }
}

fn remove_all<'a, I>(store: &dyn KeyValueStore, keys: I) -> Result<(), StoreError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut first_error = None;
    for key in keys {
        if let Err(err) = store.remove_item(key) {
            tracing::warn!(key, error = %err, "credential removal failed");
            first_error.get_or_insert(err);
        }
    }
    first_error.map_or(Ok(()), Err)
}

impl core::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CredentialStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    fn store() -> (CredentialStore, MemoryStore, MemoryStore) {
        let persistent = MemoryStore::new();
        let session = MemoryStore::new();
        (
            CredentialStore::new(persistent.clone(), session.clone()),
            persistent,
            session,
        )
    }

    #[test]
    fn get_returns_first_non_empty_alias() {
        let (store, persistent, _) = store();
        persistent.insert("authToken", "");
        persistent.insert("adminToken", "admin-tok");
        persistent.insert("refresh_token", "later");

        let found = store.get(&["token", "authToken", "adminToken", "refresh_token"]);
        assert_eq!(found.as_deref(), Some("admin-tok"));
    }

    #[test]
    fn get_respects_caller_priority() {
        let (store, persistent, _) = store();
        persistent.insert("token", "canonical");
        persistent.insert("adminToken", "legacy");

        assert_eq!(store.get(&["adminToken", "token"]).as_deref(), Some("legacy"));
        assert_eq!(store.get(&["token", "adminToken"]).as_deref(), Some("canonical"));
        assert_eq!(store.get(&["nothing"]), None);
    }

    #[test]
    fn set_many_keeps_partial_writes_on_quota_failure() {
        let persistent = MemoryStore::with_quota(2);
        let store = CredentialStore::new(persistent.clone(), MemoryStore::new());

        let err = store
            .set_many([("a", "1"), ("b", "2"), ("c", "3")])
            .unwrap_err();

        assert_eq!(err, StoreError::QuotaExceeded("c".to_string()));
        assert_eq!(persistent.get("a").as_deref(), Some("1"));
        assert_eq!(persistent.get("b").as_deref(), Some("2"));
        assert!(!persistent.contains("c"));
    }

    #[test]
    fn clear_touches_only_the_named_scope() {
        let (store, persistent, session) = store();
        persistent.insert("token", "p");
        session.insert("token", "s");
        session.insert("draft", "keep");

        store.clear(["token"]).unwrap();
        assert!(!persistent.contains("token"));
        assert!(session.contains("token"));

        store.clear_session(["token"]).unwrap();
        assert!(!session.contains("token"));
        assert!(session.contains("draft"));

        store.clear_session_all().unwrap();
        assert!(session.is_empty());
    }
}
