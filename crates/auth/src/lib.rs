//! `campusgate-auth`: client-side session resolution and role gating.
//!
//! This crate is intentionally decoupled from the browser: storage,
//! change signals and navigation are ports ([`KeyValueStore`],
//! [`AuthEvents`], [`Navigator`]) with in-memory adapters in [`memory`].

pub mod claims;
pub mod config;
pub mod gate;
pub mod gatekeeper;
pub mod headers;
pub mod keys;
pub mod lifecycle;
pub mod memory;
pub mod profile;
pub mod roles;
pub mod router;
pub mod session;
pub mod store;

pub use claims::{decode_claims, TokenClaims, TokenDecodeError};
pub use config::{DashboardPaths, GateConfig, RoutePaths};
pub use gate::{GateState, RedirectDecision, RedirectReason, RoleGate, RoleRequirement};
pub use gatekeeper::Gatekeeper;
pub use headers::{auth_headers, AuthHeaders};
pub use lifecycle::{AuthError, AuthEvent, AuthEvents, AuthLifecycle, NavigationError, Navigator};
pub use memory::{MemoryStore, RecordingEvents, RecordingNavigator};
pub use profile::Profile;
pub use roles::Role;
pub use router::DashboardRouter;
pub use session::{Credential, Session, SessionError, SessionResolver};
pub use store::{CredentialStore, KeyValueStore, StoreError};
