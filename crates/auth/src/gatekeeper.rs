//! Single entry point wiring the credential store, signals, navigation and
//! route configuration together.

use crate::config::GateConfig;
use crate::gate::{GateState, RoleGate};
use crate::headers::{auth_headers, AuthHeaders};
use crate::lifecycle::{AuthError, AuthEvents, AuthLifecycle, Navigator};
use crate::profile::Profile;
use crate::router::DashboardRouter;
use crate::session::{Session, SessionResolver};
use crate::store::{CredentialStore, StoreError};
use crate::Role;

pub struct Gatekeeper {
    store: CredentialStore,
    events: Box<dyn AuthEvents>,
    navigator: Box<dyn Navigator>,
    config: GateConfig,
    router: DashboardRouter,
}

impl Gatekeeper {
    pub fn new(
        store: CredentialStore,
        events: impl AuthEvents + 'static,
        navigator: impl Navigator + 'static,
        config: GateConfig,
    ) -> Self {
        let router = DashboardRouter::new(config.dashboards.clone());
        Self {
            store,
            events: Box::new(events),
            navigator: Box::new(navigator),
            config,
            router,
        }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    pub fn resolver(&self) -> SessionResolver<'_> {
        SessionResolver::new(&self.store, self.events.as_ref())
    }

    pub fn lifecycle(&self) -> AuthLifecycle<'_> {
        AuthLifecycle::new(
            &self.store,
            self.events.as_ref(),
            self.navigator.as_ref(),
            &self.config.routes.root,
        )
    }

    /// Current session, read fresh from storage. May purge on a
    /// token/profile mismatch (see [`SessionResolver`]).
    pub fn session(&self) -> Session {
        self.resolver().resolve()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_authenticated()
    }

    /// Resolve the session and evaluate `gate` against it.
    pub fn guard(&self, gate: &RoleGate) -> GateState {
        let session = self.session();
        gate.evaluate(&session, &self.config.routes, &self.router)
    }

    pub fn login(&self, token: &str, profile: &Profile) -> Result<(), AuthError> {
        self.lifecycle().store(token, profile)
    }

    /// Purge credentials and reload the document at the root path.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.lifecycle().clear()
    }

    /// Purge credentials without navigating.
    pub fn purge(&self) -> Result<(), StoreError> {
        self.lifecycle().purge()
    }

    pub fn auth_headers(&self, role: Option<&Role>) -> AuthHeaders {
        auth_headers(&self.store, role)
    }

    pub fn dashboard_for(&self, role: &Role) -> &str {
        self.router.resolve(role)
    }

    /// Landing page for the current visitor, or the generic login page.
    pub fn landing(&self) -> String {
        match self.session().role() {
            Some(role) => self.dashboard_for(role).to_string(),
            None => self.config.routes.auth.clone(),
        }
    }
}

impl core::fmt::Debug for Gatekeeper {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Gatekeeper")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
