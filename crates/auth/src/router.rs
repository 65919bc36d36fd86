use crate::config::DashboardPaths;
use crate::Role;

/// Legacy role string that lands on the branch dashboard.
///
/// Routing only: `branch` is not an alias of `branch_admin` for access checks.
const LEGACY_BRANCH_ROLE: &str = "branch";

/// Maps a role to its landing page.
///
/// - No IO
/// - Total: unknown roles land on the student dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardRouter {
    paths: DashboardPaths,
}

impl DashboardRouter {
    pub fn new(paths: DashboardPaths) -> Self {
        Self { paths }
    }

    pub fn resolve(&self, role: &Role) -> &str {
        match role {
            Role::SuperAdmin => self.paths.super_admin.as_str(),
            Role::Admin => self.paths.admin.as_str(),
            Role::Instructor => self.paths.instructor.as_str(),
            Role::BranchAdmin => self.paths.branch.as_str(),
            Role::Other(raw) if raw == LEGACY_BRANCH_ROLE => self.paths.branch.as_str(),
            Role::Student | Role::Other(_) => self.paths.student.as_str(),
        }
    }

    /// Normalize `raw` and resolve it.
    pub fn resolve_str(&self, raw: &str) -> &str {
        self.resolve(&Role::parse(raw))
    }

    pub fn paths(&self) -> &DashboardPaths {
        &self.paths
    }
}
