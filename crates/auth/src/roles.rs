use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Role of an authenticated visitor.
///
/// External role strings are normalized exactly once, when they enter the
/// system (profile JSON, route declarations). Everything downstream compares
/// `Role` values, never raw strings.
///
/// Normalization is case-sensitive. The single alias pair is
/// `super_admin` / `superadmin`; any other unrecognized string is kept
/// verbatim as [`Role::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    SuperAdmin,
    Admin,
    BranchAdmin,
    Instructor,
    Student,
    Other(String),
}

impl Role {
    /// Normalize an external role string.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "super_admin" | "superadmin" => Role::SuperAdmin,
            "admin" => Role::Admin,
            "branch_admin" => Role::BranchAdmin,
            "instructor" => Role::Instructor,
            "student" => Role::Student,
            other => Role::Other(other.to_string()),
        }
    }

    /// Canonical spelling of the role.
    pub fn as_str(&self) -> &str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Admin => "admin",
            Role::BranchAdmin => "branch_admin",
            Role::Instructor => "instructor",
            Role::Student => "student",
            Role::Other(raw) => raw,
        }
    }

    pub fn is_super_admin(&self) -> bool {
        matches!(self, Role::SuperAdmin)
    }
}

impl FromStr for Role {
    type Err = core::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Role::parse(s))
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        Role::parse(value)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Role::parse(&raw))
    }
}
