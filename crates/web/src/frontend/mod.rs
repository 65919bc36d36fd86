//! Leptos integration.

pub mod guard;

use std::rc::Rc;

use leptos::*;

use campusgate_auth::{GateConfig, Gatekeeper, StoreError};

use crate::browser::browser_gatekeeper;

/// Build the browser [`Gatekeeper`] and make it available to descendants
/// (`ProtectedRoute`, `use_gatekeeper`).
pub fn provide_gatekeeper(config: GateConfig) -> Result<Rc<Gatekeeper>, StoreError> {
    let gatekeeper = Rc::new(browser_gatekeeper(config)?);
    provide_context(Rc::clone(&gatekeeper));
    Ok(gatekeeper)
}

pub fn use_gatekeeper() -> Rc<Gatekeeper> {
    expect_context::<Rc<Gatekeeper>>()
}

/// Logout action for buttons and menus.
pub fn use_logout() -> impl Fn() + Clone + 'static {
    let gatekeeper = use_gatekeeper();
    move || {
        if let Err(err) = gatekeeper.logout() {
            tracing::warn!(error = %err, "logout did not complete cleanly");
        }
    }
}
