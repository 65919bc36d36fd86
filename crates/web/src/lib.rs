//! `campusgate-web`
//!
//! **Responsibility:** browser bindings for `campusgate-auth`.
//!
//! This crate provides (on `wasm32`):
//! - `localStorage`/`sessionStorage` adapters
//! - DOM change signals and full-page navigation
//! - A Leptos `ProtectedRoute` component
//!
//! On other targets only the shared event names are exported.

#[cfg(target_arch = "wasm32")]
pub mod browser;
#[cfg(target_arch = "wasm32")]
pub mod frontend;

/// Window event dispatched for same-tab reactive updates.
pub const AUTH_STATE_CHANGED: &str = "authStateChanged";

/// Window event name browsers use for cross-tab storage changes.
pub const STORAGE_CHANGED: &str = "storage";

/// Events after which a mounted gate must re-evaluate.
pub const GATE_REFRESH_EVENTS: [&str; 2] = [AUTH_STATE_CHANGED, STORAGE_CHANGED];
