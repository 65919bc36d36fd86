//! Storage key tables.
//!
//! Several legacy keys hold the same logical value. Each list below is
//! priority-ordered: readers take the first non-empty entry.

use crate::Role;

/// Canonical token key.
pub const TOKEN: &str = "token";
/// Canonical profile key.
pub const USER: &str = "user";
/// Cached role string of the current profile.
pub const USER_ROLE: &str = "userRole";

/// Keys probed when deciding whether a session exists.
pub const SESSION_TOKEN_ALIASES: &[&str] = &["token", "authToken", "adminToken"];

/// Keys probed for the cached profile.
pub const SESSION_PROFILE_ALIASES: &[&str] = &["user"];

/// Every key that may hold a token.
pub const TOKEN_ALIASES: &[&str] = &[
    "token",
    "authToken",
    "adminToken",
    "instructorToken",
    "studentToken",
    "access_token",
    "refresh_token",
];

/// Every key that may hold a cached profile.
pub const PROFILE_ALIASES: &[&str] = &[
    "user",
    "adminUser",
    "instructorUser",
    "studentUser",
    "adminData",
];

/// Scratch values cached alongside a session and dropped on logout.
pub const AUXILIARY_KEYS: &[&str] = &[
    "userRole",
    "role",
    "franchise_code",
    "branch_code",
    "branch_id",
    "franchise_id",
    "selectedBranch",
    "lastVisitedPath",
];

/// Profile fields copied into auxiliary keys at login.
pub const PROFILE_SCRATCH_FIELDS: &[&str] = &["branch_code", "franchise_code"];

/// Token and profile aliases, in that order.
pub fn credential_keys() -> impl Iterator<Item = &'static str> {
    TOKEN_ALIASES.iter().chain(PROFILE_ALIASES).copied()
}

/// Every enumerated key: tokens, profiles and auxiliary scratch values.
pub fn all_keys() -> impl Iterator<Item = &'static str> {
    credential_keys().chain(AUXILIARY_KEYS.iter().copied())
}

/// Role-specific `(token, profile)` alias pair written at login.
pub fn role_aliases(role: &Role) -> Option<(&'static str, &'static str)> {
    match role {
        Role::Admin | Role::BranchAdmin => Some(("adminToken", "adminUser")),
        Role::Instructor => Some(("instructorToken", "instructorUser")),
        Role::Student => Some(("studentToken", "studentUser")),
        Role::SuperAdmin | Role::Other(_) => None,
    }
}

/// Token probe order for outbound request headers.
///
/// The role's own alias wins, then the canonical session chain.
pub fn header_token_aliases(role: Option<&Role>) -> Vec<&'static str> {
    let mut aliases = Vec::with_capacity(SESSION_TOKEN_ALIASES.len() + 1);
    if let Some((token_key, _)) = role.and_then(role_aliases) {
        aliases.push(token_key);
    }
    for &key in SESSION_TOKEN_ALIASES {
        if !aliases.contains(&key) {
            aliases.push(key);
        }
    }
    aliases
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_probe_is_a_prefix_of_token_aliases() {
        assert_eq!(&TOKEN_ALIASES[..SESSION_TOKEN_ALIASES.len()], SESSION_TOKEN_ALIASES);
    }

    #[test]
    fn role_alias_keys_are_enumerated() {
        for role in [Role::Admin, Role::BranchAdmin, Role::Instructor, Role::Student] {
            let (token_key, profile_key) = role_aliases(&role).unwrap();
            assert!(TOKEN_ALIASES.contains(&token_key));
            assert!(PROFILE_ALIASES.contains(&profile_key));
        }
    }

    #[test]
    fn header_probe_prefers_role_alias() {
        assert_eq!(
            header_token_aliases(Some(&Role::Instructor)),
            vec!["instructorToken", "token", "authToken", "adminToken"]
        );
        assert_eq!(
            header_token_aliases(Some(&Role::Admin)),
            vec!["adminToken", "token", "authToken"]
        );
        assert_eq!(header_token_aliases(None), SESSION_TOKEN_ALIASES.to_vec());
    }

    #[test]
    fn all_keys_has_no_duplicates() {
        let mut keys: Vec<_> = all_keys().collect();
        let total = keys.len();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), total);
    }
}
