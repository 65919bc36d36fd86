//! Authentication-state resolution.
//!
//! A [`Session`] is derived from storage on every call and never cached.

use thiserror::Error;

use crate::claims::decode_claims;
use crate::keys;
use crate::lifecycle::{AuthEvents, AuthLifecycle};
use crate::profile::{Profile, ProfileDefect};
use crate::store::CredentialStore;
use crate::Role;

/// Which half of the credential bundle was absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credential {
    Token,
    Profile,
}

impl core::fmt::Display for Credential {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Credential::Token => f.write_str("token"),
            Credential::Profile => f.write_str("profile"),
        }
    }
}

/// Reason a visitor is treated as logged out.
///
/// These are outcomes, not failures: they travel inside
/// [`Session::Anonymous`] and always end in a silent redirect.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("missing {0}")]
    MissingCredential(Credential),

    #[error("cached profile is malformed: {0}")]
    MalformedProfile(String),

    #[error("cached profile has no role")]
    MissingRole,

    /// The token names an address the cached profile does not carry. A
    /// profile without an email never matches.
    #[error(
        "token subject '{token_subject}' does not match profile email {}",
        .profile_email.as_deref().map_or("(none)".to_string(), |email| format!("'{email}'"))
    )]
    TokenProfileMismatch {
        token_subject: String,
        profile_email: Option<String>,
    },
}

/// Current authentication state.
#[derive(Debug, Clone, PartialEq)]
pub enum Session {
    Authenticated { role: Role, profile: Profile },
    Anonymous(SessionError),
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }

    pub fn role(&self) -> Option<&Role> {
        match self {
            Session::Authenticated { role, .. } => Some(role),
            Session::Anonymous(_) => None,
        }
    }

    pub fn profile(&self) -> Option<&Profile> {
        match self {
            Session::Authenticated { profile, .. } => Some(profile),
            Session::Anonymous(_) => None,
        }
    }
}

/// Decides the current [`Session`] from the credential store.
///
/// # Side effects
///
/// `resolve` is a query with exactly one write path: when the token decodes
/// as a JWT carrying a subject and the cached profile's email is different
/// or absent, the whole credential bundle is purged (every alias, both storage scopes) and
/// change signals are emitted before `Anonymous` is returned. Every other
/// outcome leaves storage untouched.
///
/// Tokens that do not decode as JWTs are trusted once a profile with a role
/// is present. This keeps legacy opaque tokens working.
pub struct SessionResolver<'a> {
    store: &'a CredentialStore,
    events: &'a dyn AuthEvents,
}

impl<'a> SessionResolver<'a> {
    pub fn new(store: &'a CredentialStore, events: &'a dyn AuthEvents) -> Self {
        Self { store, events }
    }

    pub fn is_authenticated(&self) -> bool {
        self.resolve().is_authenticated()
    }

    pub fn resolve(&self) -> Session {
        let Some(token) = self.store.get(keys::SESSION_TOKEN_ALIASES) else {
            return anonymous(SessionError::MissingCredential(Credential::Token));
        };
        let Some(raw_profile) = self.store.get(keys::SESSION_PROFILE_ALIASES) else {
            return anonymous(SessionError::MissingCredential(Credential::Profile));
        };

        let profile = match Profile::parse(&raw_profile) {
            Ok(profile) => profile,
            Err(ProfileDefect::Malformed(reason)) => {
                return anonymous(SessionError::MalformedProfile(reason));
            }
            Err(ProfileDefect::MissingRole) => return anonymous(SessionError::MissingRole),
        };

        let claims = match decode_claims(&token) {
            Ok(claims) => claims,
            Err(err) => {
                tracing::debug!(error = %err, "token is not a decodable JWT; trusting cached profile");
                return authenticated(profile);
            }
        };

        let Some(token_subject) = claims.subject() else {
            return authenticated(profile);
        };
        if profile.email.as_deref() == Some(token_subject) {
            return authenticated(profile);
        }

        let error = SessionError::TokenProfileMismatch {
            token_subject: token_subject.to_string(),
            profile_email: profile.email.clone(),
        };
        tracing::warn!(error = %error, "purging credential bundle");
        if let Err(err) = AuthLifecycle::purge_with(self.store, self.events) {
            tracing::warn!(error = %err, "credential purge incomplete");
        }
        Session::Anonymous(error)
    }
}

fn authenticated(profile: Profile) -> Session {
    Session::Authenticated {
        role: profile.role(),
        profile,
    }
}

fn anonymous(error: SessionError) -> Session {
    tracing::debug!(reason = %error, "visitor is not authenticated");
    Session::Anonymous(error)
}
