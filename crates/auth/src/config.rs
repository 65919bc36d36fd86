//! Route configuration.
//!
//! Every path has a default, so partial JSON documents and sparse
//! environments are valid.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Entry points outside the protected area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutePaths {
    /// Generic login page.
    pub auth: String,
    /// Dedicated login page for super admins.
    pub privileged_auth: String,
    /// Target of the full reload after logout.
    pub root: String,
}

impl Default for RoutePaths {
    fn default() -> Self {
        Self {
            auth: "/auth".to_string(),
            privileged_auth: "/super-admin/login".to_string(),
            root: "/".to_string(),
        }
    }
}

/// Landing page per role family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardPaths {
    pub super_admin: String,
    pub admin: String,
    pub instructor: String,
    pub branch: String,
    pub student: String,
}

impl Default for DashboardPaths {
    fn default() -> Self {
        Self {
            super_admin: "/super-admin/dashboard".to_string(),
            admin: "/admin/dashboard".to_string(),
            instructor: "/instructor/dashboard".to_string(),
            branch: "/branch-admin/dashboard".to_string(),
            student: "/student/dashboard".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    pub routes: RoutePaths,
    pub dashboards: DashboardPaths,
}

impl GateConfig {
    pub fn from_json_str(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw).context("invalid gate configuration JSON")
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read gate configuration at {:?}", path))?;
        Self::from_json_str(&raw).with_context(|| format!("in {:?}", path))
    }

    /// Defaults overridden by `CAMPUSGATE_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for the
    /// `CAMPUSGATE_*` variable names. Empty values are ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let overrides: [(&str, &mut String); 8] = [
            ("CAMPUSGATE_AUTH_PATH", &mut config.routes.auth),
            ("CAMPUSGATE_PRIVILEGED_AUTH_PATH", &mut config.routes.privileged_auth),
            ("CAMPUSGATE_ROOT_PATH", &mut config.routes.root),
            ("CAMPUSGATE_DASHBOARD_SUPER_ADMIN", &mut config.dashboards.super_admin),
            ("CAMPUSGATE_DASHBOARD_ADMIN", &mut config.dashboards.admin),
            ("CAMPUSGATE_DASHBOARD_INSTRUCTOR", &mut config.dashboards.instructor),
            ("CAMPUSGATE_DASHBOARD_BRANCH", &mut config.dashboards.branch),
            ("CAMPUSGATE_DASHBOARD_STUDENT", &mut config.dashboards.student),
        ];
        for (name, slot) in overrides {
            if let Some(value) = lookup(name).filter(|v| !v.trim().is_empty()) {
                tracing::debug!(variable = name, value = %value, "route override");
                *slot = value;
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = GateConfig::from_json_str(
            r#"{"routes":{"auth":"/login"},"dashboards":{"student":"/learn"}}"#,
        )
        .unwrap();

        assert_eq!(config.routes.auth, "/login");
        assert_eq!(config.routes.privileged_auth, "/super-admin/login");
        assert_eq!(config.dashboards.student, "/learn");
        assert_eq!(config.dashboards.admin, "/admin/dashboard");
    }

    #[test]
    fn invalid_json_is_reported() {
        let err = GateConfig::from_json_str("{").unwrap_err();
        assert!(err.to_string().contains("invalid gate configuration"));
    }

    #[test]
    fn lookup_overrides_non_empty_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("CAMPUSGATE_PRIVILEGED_AUTH_PATH", "/root-login"),
            ("CAMPUSGATE_DASHBOARD_BRANCH", "/branch/home"),
            ("CAMPUSGATE_AUTH_PATH", "  "),
        ]);

        let config = GateConfig::from_lookup(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.routes.privileged_auth, "/root-login");
        assert_eq!(config.dashboards.branch, "/branch/home");
        assert_eq!(config.routes.auth, "/auth");
    }

    #[test]
    fn missing_file_has_context() {
        let err = GateConfig::from_file("/nonexistent/campusgate.json").unwrap_err();
        assert!(format!("{err:#}").contains("failed to read gate configuration"));
    }
}
