//! Route-level guard component.

use leptos::*;
use leptos_router::Redirect;

use campusgate_auth::{GateState, RoleGate};

use super::use_gatekeeper;
use crate::GATE_REFRESH_EVENTS;

/// Render `children` when the current session passes the gate, otherwise
/// redirect.
///
/// The gate is evaluated synchronously on mount and again whenever an auth
/// or storage change event reaches the window.
#[component]
pub fn ProtectedRoute(
    /// Accepted roles; empty means any authenticated visitor.
    #[prop(optional, into)]
    roles: Vec<String>,
    /// Where to send authenticated visitors with the wrong role.
    #[prop(optional, into)]
    redirect_to: Option<String>,
    children: ChildrenFn,
) -> impl IntoView {
    let gatekeeper = use_gatekeeper();
    let gate = match redirect_to {
        Some(path) => RoleGate::for_roles(roles).with_redirect(path),
        None => RoleGate::for_roles(roles),
    };

    let (revision, set_revision) = create_signal(0u64);
    for event in GATE_REFRESH_EVENTS {
        let handle = window_event_listener_untyped(event, move |_| {
            set_revision.update(|n| *n += 1);
        });
        on_cleanup(move || handle.remove());
    }

    move || {
        let _ = revision.get();
        match gatekeeper.guard(&gate) {
            GateState::Authorized { .. } => children().into_view(),
            GateState::UnauthorizedNoSession(decision)
            | GateState::UnauthorizedWrongRole(decision) => {
                view! { <Redirect path=decision.path/> }.into_view()
            }
            GateState::Checking => ().into_view(),
        }
    }
}
