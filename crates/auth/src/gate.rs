//! Render-or-redirect decision for a protected view.

use serde::Serialize;

use crate::config::RoutePaths;
use crate::router::DashboardRouter;
use crate::session::Session;
use crate::Role;

/// Roles accepted by a protected view. Empty means any authenticated role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleRequirement {
    roles: Vec<Role>,
}

impl RoleRequirement {
    pub fn any() -> Self {
        Self::default()
    }

    /// Normalize route-declared role strings.
    pub fn of<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<Role> = Vec::new();
        for raw in roles {
            let role = Role::parse(raw.as_ref());
            if !normalized.contains(&role) {
                normalized.push(role);
            }
        }
        Self { roles: normalized }
    }

    pub fn is_any(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn accepts(&self, role: &Role) -> bool {
        self.is_any() || self.roles.contains(role)
    }

    pub fn requires_super_admin(&self) -> bool {
        self.roles.iter().any(Role::is_super_admin)
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RedirectReason {
    Unauthenticated,
    WrongRole,
    PrivilegedRequired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedirectDecision {
    pub path: String,
    pub reason: RedirectReason,
}

/// Gate state for one mount/navigation.
///
/// [`RoleGate::evaluate`] is a single synchronous pass and never yields
/// `Checking`. The variant is the initial value for hosts that render
/// before evaluation has run (for example a server-side shell that hydrates
/// later); such hosts must render nothing protected while in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    Checking,
    Authorized { role: Role },
    UnauthorizedNoSession(RedirectDecision),
    UnauthorizedWrongRole(RedirectDecision),
}

impl GateState {
    pub fn is_authorized(&self) -> bool {
        matches!(self, GateState::Authorized { .. })
    }

    pub fn redirect(&self) -> Option<&RedirectDecision> {
        match self {
            GateState::UnauthorizedNoSession(decision)
            | GateState::UnauthorizedWrongRole(decision) => Some(decision),
            GateState::Checking | GateState::Authorized { .. } => None,
        }
    }
}

/// Access rule attached to a protected view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleGate {
    required: RoleRequirement,
    redirect_override: Option<String>,
}

impl RoleGate {
    pub fn new(required: RoleRequirement) -> Self {
        Self {
            required,
            redirect_override: None,
        }
    }

    /// Any authenticated visitor.
    pub fn authenticated() -> Self {
        Self::default()
    }

    pub fn for_roles<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(RoleRequirement::of(roles))
    }

    /// Send authenticated visitors with the wrong role here instead of their
    /// own dashboard.
    pub fn with_redirect(mut self, path: impl Into<String>) -> Self {
        self.redirect_override = Some(path.into());
        self
    }

    pub fn required(&self) -> &RoleRequirement {
        &self.required
    }

    pub fn evaluate(
        &self,
        session: &Session,
        routes: &RoutePaths,
        router: &DashboardRouter,
    ) -> GateState {
        let Some(role) = session.role() else {
            // The privileged entry point is never mixed with the generic one.
            let decision = if self.required.requires_super_admin() {
                RedirectDecision {
                    path: routes.privileged_auth.clone(),
                    reason: RedirectReason::PrivilegedRequired,
                }
            } else {
                RedirectDecision {
                    path: routes.auth.clone(),
                    reason: RedirectReason::Unauthenticated,
                }
            };
            tracing::debug!(path = %decision.path, "no session; redirecting");
            return GateState::UnauthorizedNoSession(decision);
        };

        if self.required.accepts(role) {
            return GateState::Authorized { role: role.clone() };
        }

        let path = match &self.redirect_override {
            Some(path) => path.clone(),
            None => router.resolve(role).to_string(),
        };
        tracing::debug!(role = %role, path = %path, "role not accepted; redirecting");
        GateState::UnauthorizedWrongRole(RedirectDecision {
            path,
            reason: RedirectReason::WrongRole,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Profile;
    use crate::session::{Credential, SessionError};
    use proptest::prelude::*;

    fn signed_in(role: &str) -> Session {
        let profile = Profile::new(role);
        Session::Authenticated {
            role: profile.role(),
            profile,
        }
    }

    fn signed_out() -> Session {
        Session::Anonymous(SessionError::MissingCredential(Credential::Token))
    }

    fn evaluate(gate: &RoleGate, session: &Session) -> GateState {
        gate.evaluate(session, &RoutePaths::default(), &DashboardRouter::default())
    }

    #[test]
    fn any_role_accepts_every_session() {
        let state = evaluate(&RoleGate::authenticated(), &signed_in("whatever"));
        assert_eq!(state, GateState::Authorized { role: Role::Other("whatever".into()) });
    }

    #[test]
    fn super_admin_alias_holds_both_ways() {
        let required_underscore = RoleGate::for_roles(["super_admin"]);
        let required_compact = RoleGate::for_roles(["superadmin"]);

        assert!(evaluate(&required_underscore, &signed_in("superadmin")).is_authorized());
        assert!(evaluate(&required_compact, &signed_in("super_admin")).is_authorized());
    }

    #[test]
    fn matching_is_case_sensitive() {
        let state = evaluate(&RoleGate::for_roles(["admin"]), &signed_in("Admin"));
        assert_eq!(
            state.redirect().map(|d| d.reason),
            Some(RedirectReason::WrongRole)
        );
    }

    #[test]
    fn anonymous_visitor_goes_to_generic_login() {
        let state = evaluate(&RoleGate::for_roles(["admin"]), &signed_out());
        assert_eq!(
            state,
            GateState::UnauthorizedNoSession(RedirectDecision {
                path: "/auth".to_string(),
                reason: RedirectReason::Unauthenticated,
            })
        );
    }

    #[test]
    fn anonymous_visitor_to_super_admin_area_goes_to_privileged_login() {
        for required in [vec!["superadmin"], vec!["admin", "super_admin"]] {
            let state = evaluate(&RoleGate::for_roles(required), &signed_out());
            assert_eq!(
                state.redirect(),
                Some(&RedirectDecision {
                    path: "/super-admin/login".to_string(),
                    reason: RedirectReason::PrivilegedRequired,
                })
            );
        }
    }

    #[test]
    fn wrong_role_goes_to_own_dashboard() {
        let state = evaluate(&RoleGate::for_roles(["admin"]), &signed_in("instructor"));
        assert_eq!(
            state,
            GateState::UnauthorizedWrongRole(RedirectDecision {
                path: "/instructor/dashboard".to_string(),
                reason: RedirectReason::WrongRole,
            })
        );
    }

    #[test]
    fn wrong_role_prefers_override() {
        let gate = RoleGate::for_roles(["instructor"]).with_redirect("/403");
        let state = evaluate(&gate, &signed_in("student"));
        assert_eq!(state.redirect().map(|d| d.path.as_str()), Some("/403"));
    }

    #[test]
    fn override_does_not_apply_to_anonymous_visitors() {
        let gate = RoleGate::for_roles(["instructor"]).with_redirect("/403");
        let state = evaluate(&gate, &signed_out());
        assert_eq!(state.redirect().map(|d| d.path.as_str()), Some("/auth"));
    }

    #[test]
    fn requirement_deduplicates_aliases() {
        let requirement = RoleRequirement::of(["super_admin", "superadmin", "admin"]);
        assert_eq!(requirement.roles(), &[Role::SuperAdmin, Role::Admin]);
    }

    proptest! {
        /// Evaluation always settles on a final state.
        #[test]
        fn evaluate_never_yields_checking(
            required in prop::collection::vec(
                prop::sample::select(vec!["admin", "instructor", "student", "super_admin", "branch"]),
                0..3,
            ),
            role in prop::option::of(prop::sample::select(vec!["admin", "student", "superadmin", "auditor"])),
            redirect in prop::option::of(Just("/403")),
        ) {
            let mut gate = RoleGate::for_roles(&required);
            if let Some(path) = redirect {
                gate = gate.with_redirect(path);
            }
            let session = match role {
                Some(role) => signed_in(role),
                None => signed_out(),
            };

            prop_assert_ne!(evaluate(&gate, &session), GateState::Checking);
        }

        /// Anonymous visitors are never sent to the privileged login unless
        /// the view requires a super admin.
        #[test]
        fn privileged_login_only_for_super_admin_views(
            required in prop::collection::vec(
                prop::sample::select(vec!["admin", "instructor", "student", "branch_admin", "branch"]),
                0..4,
            ),
        ) {
            let state = evaluate(&RoleGate::for_roles(&required), &signed_out());
            let decision = state.redirect().cloned().unwrap();
            prop_assert_eq!(decision.path, "/auth");
            prop_assert_eq!(decision.reason, RedirectReason::Unauthenticated);
        }
    }
}
