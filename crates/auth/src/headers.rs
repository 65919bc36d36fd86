use serde::Serialize;

use crate::keys;
use crate::store::CredentialStore;
use crate::Role;

pub const AUTHORIZATION: &str = "Authorization";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const JSON: &str = "application/json";

/// Headers for a protected REST call.
///
/// Serializes as a flat `{ "Authorization": ..., "Content-Type": ... }`
/// object so it can be handed to `fetch` as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthHeaders {
    #[serde(rename = "Authorization", skip_serializing_if = "Option::is_none")]
    pub authorization: Option<String>,

    #[serde(rename = "Content-Type")]
    pub content_type: &'static str,
}

impl AuthHeaders {
    pub fn bearer(token: &str) -> Self {
        Self {
            authorization: Some(format!("Bearer {token}")),
            content_type: JSON,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            authorization: None,
            content_type: JSON,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authorization.is_some()
    }

    /// `(name, value)` pairs in a stable order.
    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::with_capacity(2);
        if let Some(authorization) = &self.authorization {
            pairs.push((AUTHORIZATION, authorization.as_str()));
        }
        pairs.push((CONTENT_TYPE, self.content_type));
        pairs
    }
}

/// Build request headers from the stored token.
///
/// With a role, that role's token alias is preferred. Without any token the
/// `Authorization` header is left out and the server answers 401.
pub fn auth_headers(store: &CredentialStore, role: Option<&Role>) -> AuthHeaders {
    match store.get(&keys::header_token_aliases(role)) {
        Some(token) => AuthHeaders::bearer(&token),
        None => {
            tracing::debug!("no stored token; sending request without Authorization");
            AuthHeaders::anonymous()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    fn store_with(entries: &[(&str, &str)]) -> CredentialStore {
        let persistent = MemoryStore::new();
        for (key, value) in entries {
            persistent.insert(key, value);
        }
        CredentialStore::new(persistent, MemoryStore::new())
    }

    #[test]
    fn canonical_token_becomes_bearer() {
        let store = store_with(&[("token", "abc")]);
        let headers = auth_headers(&store, None);

        assert_eq!(
            headers.pairs(),
            vec![("Authorization", "Bearer abc"), ("Content-Type", "application/json")]
        );
    }

    #[test]
    fn role_alias_wins_over_canonical() {
        let store = store_with(&[("token", "canonical"), ("instructorToken", "mine")]);

        let headers = auth_headers(&store, Some(&Role::Instructor));
        assert_eq!(headers.authorization.as_deref(), Some("Bearer mine"));

        let headers = auth_headers(&store, Some(&Role::SuperAdmin));
        assert_eq!(headers.authorization.as_deref(), Some("Bearer canonical"));
    }

    #[test]
    fn missing_token_omits_authorization() {
        let headers = auth_headers(&store_with(&[]), Some(&Role::Student));
        assert!(!headers.is_authenticated());
        assert_eq!(
            serde_json::to_value(&headers).unwrap(),
            serde_json::json!({"Content-Type": "application/json"})
        );
    }

    #[test]
    fn serializes_with_http_header_names() {
        let value = serde_json::to_value(AuthHeaders::bearer("t")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"Authorization": "Bearer t", "Content-Type": "application/json"})
        );
    }
}
