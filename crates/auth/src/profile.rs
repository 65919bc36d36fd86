use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Role;

/// Cached user profile, stored as JSON under the `user` key.
///
/// Only `role` is required. Fields this crate does not know about are kept
/// in `extra` so a round trip through storage does not drop them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub role: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Why a cached profile could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileDefect {
    /// Not JSON, or not a JSON object.
    Malformed(String),
    /// Valid JSON object without a non-blank string `role`.
    MissingRole,
}

impl Profile {
    pub fn new(role: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            email: None,
            name: None,
            permissions: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Parse the stored JSON, distinguishing bad JSON from a missing role.
    pub fn parse(raw: &str) -> Result<Self, ProfileDefect> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| ProfileDefect::Malformed(e.to_string()))?;
        let Value::Object(object) = value else {
            return Err(ProfileDefect::Malformed("profile is not a JSON object".to_string()));
        };
        if !matches!(object.get("role"), Some(Value::String(role)) if !role.trim().is_empty()) {
            return Err(ProfileDefect::MissingRole);
        }
        serde_json::from_value(Value::Object(object))
            .map_err(|e| ProfileDefect::Malformed(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Normalized role.
    pub fn role(&self) -> Role {
        Role::parse(&self.role)
    }

    /// A string (or numeric) extra field, rendered as text.
    pub fn scratch_value(&self, field: &str) -> Option<String> {
        match self.extra.get(field)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}
