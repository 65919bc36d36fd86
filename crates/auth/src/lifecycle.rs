//! Login/logout: the only regular writers of the credential bundle.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::keys;
use crate::profile::Profile;
use crate::store::{CredentialStore, StoreError};
use crate::Role;

/// Change notification emitted after the credential bundle is written or
/// removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// Generic storage change, visible to other tabs.
    StorageChanged { at: DateTime<Utc> },

    /// App-level auth change for same-tab reactive updates.
    AuthStateChanged {
        role: Option<Role>,
        at: DateTime<Utc>,
    },
}

impl AuthEvent {
    pub fn is_storage_changed(&self) -> bool {
        matches!(self, AuthEvent::StorageChanged { .. })
    }

    pub fn is_auth_state_changed(&self) -> bool {
        matches!(self, AuthEvent::AuthStateChanged { .. })
    }
}

/// Sink for [`AuthEvent`]s. Delivery is best-effort and infallible from the
/// caller's point of view.
pub trait AuthEvents {
    fn emit(&self, event: &AuthEvent);
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("navigation failed: {0}")]
pub struct NavigationError(pub String);

/// Full-page navigation primitive.
///
/// Implementations must discard all in-memory application state (a document
/// reload), not perform a client-side route transition.
pub trait Navigator {
    fn hard_navigate(&self, path: &str) -> Result<(), NavigationError>;
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// Storage rejected a write or removal. Earlier writes are not rolled back.
    #[error("credential storage failed: {0}")]
    StorageWrite(#[from] StoreError),

    #[error("profile could not be serialized: {0}")]
    Profile(#[from] serde_json::Error),

    #[error(transparent)]
    Navigation(#[from] NavigationError),
}

/// Writes and clears the credential bundle.
pub struct AuthLifecycle<'a> {
    store: &'a CredentialStore,
    events: &'a dyn AuthEvents,
    navigator: &'a dyn Navigator,
    root_path: &'a str,
}

impl<'a> AuthLifecycle<'a> {
    pub fn new(
        store: &'a CredentialStore,
        events: &'a dyn AuthEvents,
        navigator: &'a dyn Navigator,
        root_path: &'a str,
    ) -> Self {
        Self {
            store,
            events,
            navigator,
            root_path,
        }
    }

    /// Persist a freshly issued credential bundle.
    ///
    /// Every enumerated alias is removed before anything is written, so a
    /// token left by a previous login under another role can never win the
    /// session alias probe. Writes are not transactional: a failure part way
    /// leaves the bundle partially written and is returned as-is.
    pub fn store(&self, token: &str, profile: &Profile) -> Result<(), AuthError> {
        self.store.clear(keys::all_keys())?;
        self.store.clear_session(keys::all_keys())?;

        let role = profile.role();
        let profile_json = profile.to_json()?;
        let scratch: Vec<(&str, String)> = keys::PROFILE_SCRATCH_FIELDS
            .iter()
            .filter_map(|&field| profile.scratch_value(field).map(|value| (field, value)))
            .collect();

        let mut entries: Vec<(&str, &str)> = vec![
            (keys::TOKEN, token),
            (keys::USER, profile_json.as_str()),
            (keys::USER_ROLE, profile.role.as_str()),
        ];
        if let Some((token_key, profile_key)) = keys::role_aliases(&role) {
            entries.push((token_key, token));
            entries.push((profile_key, profile_json.as_str()));
        }
        entries.extend(scratch.iter().map(|(field, value)| (*field, value.as_str())));

        self.store.set_many(entries)?;

        tracing::info!(role = %role, "credential bundle stored");
        emit_changed(self.events, Some(role));
        Ok(())
    }

    /// Log out: purge the credential bundle, then reload the document at the
    /// root path.
    ///
    /// The navigation is attempted exactly once, even when some key could not
    /// be removed. A storage error takes precedence over a navigation error;
    /// the latter is then only logged.
    pub fn clear(&self) -> Result<(), AuthError> {
        let purged = Self::purge_with(self.store, self.events);
        let navigated = self.navigator.hard_navigate(self.root_path);
        match (&purged, &navigated) {
            (Err(_), Err(nav)) => tracing::warn!(error = %nav, "logout navigation failed"),
            (_, Ok(())) => tracing::info!(path = self.root_path, "logged out"),
            (Ok(()), Err(_)) => {}
        }
        purged?;
        navigated?;
        Ok(())
    }

    /// Purge without navigating.
    pub fn purge(&self) -> Result<(), StoreError> {
        Self::purge_with(self.store, self.events)
    }

    /// Remove every enumerated key from persistent storage, wipe session
    /// storage, and emit both change signals.
    pub(crate) fn purge_with(
        store: &CredentialStore,
        events: &dyn AuthEvents,
    ) -> Result<(), StoreError> {
        let persistent = store.clear(keys::all_keys());
        let session = store.clear_session_all();
        emit_changed(events, None);
        persistent.and(session)
    }
}

fn emit_changed(events: &dyn AuthEvents, role: Option<Role>) {
    let at = Utc::now();
    events.emit(&AuthEvent::StorageChanged { at });
    events.emit(&AuthEvent::AuthStateChanged { role, at });
}
