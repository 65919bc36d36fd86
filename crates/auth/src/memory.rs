//! In-memory adapters for tests and non-browser hosts.
//!
//! - No IO
//! - Cheap to clone (clones share state), so a test can keep a handle to a
//!   store after moving it into a [`crate::CredentialStore`]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::lifecycle::{AuthEvent, AuthEvents, NavigationError, Navigator};
use crate::store::{KeyValueStore, StoreError};

/// Map-backed [`KeyValueStore`].
///
/// An optional entry quota makes writes of new keys fail with
/// [`StoreError::QuotaExceeded`], mirroring a full browser storage area.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that accepts at most `max_entries` distinct keys.
    pub fn with_quota(max_entries: usize) -> Self {
        Self {
            entries: Arc::default(),
            quota: Some(max_entries),
        }
    }

    pub fn insert(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        if let Some(max) = self.quota {
            if !entries.contains_key(key) && entries.len() >= max {
                return Err(StoreError::QuotaExceeded(key.to_string()));
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.clear();
        Ok(())
    }
}

/// [`AuthEvents`] sink that keeps every emitted event.
#[derive(Debug, Clone, Default)]
pub struct RecordingEvents {
    events: Arc<Mutex<Vec<AuthEvent>>>,
}

impl RecordingEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AuthEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl AuthEvents for RecordingEvents {
    fn emit(&self, event: &AuthEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

/// [`Navigator`] that records full-page navigations instead of performing them.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    visits: Arc<Mutex<Vec<String>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl Navigator for RecordingNavigator {
    fn hard_navigate(&self, path: &str) -> Result<(), NavigationError> {
        let mut visits = self
            .visits
            .lock()
            .map_err(|_| NavigationError("navigator lock poisoned".to_string()))?;
        visits.push(path.to_string());
        Ok(())
    }
}
