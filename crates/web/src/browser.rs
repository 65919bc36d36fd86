//! Browser implementations of the `campusgate-auth` ports.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CustomEvent, CustomEventInit, DomException, Event, Storage, Window};

use campusgate_auth::{
    AuthEvent, AuthEvents, CredentialStore, GateConfig, Gatekeeper, KeyValueStore,
    NavigationError, Navigator, StoreError,
};

use crate::{AUTH_STATE_CHANGED, STORAGE_CHANGED};

fn window() -> Result<Window, StoreError> {
    web_sys::window().ok_or_else(|| StoreError::Unavailable("no window object".to_string()))
}

fn js_error(err: JsValue) -> StoreError {
    StoreError::Unavailable(format!("{:?}", err))
}

/// `localStorage` or `sessionStorage`.
#[derive(Debug, Clone)]
pub struct BrowserStorage {
    storage: Storage,
}

impl BrowserStorage {
    pub fn local() -> Result<Self, StoreError> {
        let storage = window()?
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| StoreError::Unavailable("localStorage disabled".to_string()))?;
        Ok(Self { storage })
    }

    pub fn session() -> Result<Self, StoreError> {
        let storage = window()?
            .session_storage()
            .map_err(js_error)?
            .ok_or_else(|| StoreError::Unavailable("sessionStorage disabled".to_string()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for BrowserStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage.get_item(key).map_err(js_error)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage.set_item(key, value).map_err(|err| {
            let quota = err
                .dyn_ref::<DomException>()
                .is_some_and(|e| e.name() == "QuotaExceededError");
            if quota {
                StoreError::QuotaExceeded(key.to_string())
            } else {
                js_error(err)
            }
        })
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        self.storage.remove_item(key).map_err(js_error)
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.storage.clear().map_err(js_error)
    }
}

/// Dispatches auth changes as window events.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserEvents;

impl BrowserEvents {
    fn dispatch(window: &Window, event: &AuthEvent) -> Result<(), JsValue> {
        let dom_event: Event = match event {
            AuthEvent::StorageChanged { .. } => Event::new(STORAGE_CHANGED)?,
            AuthEvent::AuthStateChanged { role, .. } => {
                let init = CustomEventInit::new();
                let detail = role
                    .as_ref()
                    .map_or(JsValue::NULL, |r| JsValue::from_str(r.as_str()));
                init.set_detail(&detail);
                CustomEvent::new_with_event_init_dict(AUTH_STATE_CHANGED, &init)?.into()
            }
        };
        window.dispatch_event(&dom_event).map(|_| ())
    }
}

impl AuthEvents for BrowserEvents {
    fn emit(&self, event: &AuthEvent) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Err(err) = Self::dispatch(&window, event) {
            tracing::warn!(error = ?err, "failed to dispatch auth event");
        }
    }
}

/// Full document navigation through `window.location`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn hard_navigate(&self, path: &str) -> Result<(), NavigationError> {
        let window = web_sys::window()
            .ok_or_else(|| NavigationError("no window object".to_string()))?;
        window
            .location()
            .assign(path)
            .map_err(|err| NavigationError(format!("{:?}", err)))
    }
}

/// A [`Gatekeeper`] over the page's real storage, events and location.
pub fn browser_gatekeeper(config: GateConfig) -> Result<Gatekeeper, StoreError> {
    let store = CredentialStore::new(BrowserStorage::local()?, BrowserStorage::session()?);
    Ok(Gatekeeper::new(store, BrowserEvents, BrowserNavigator, config))
}
