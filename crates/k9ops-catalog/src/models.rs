//! Catalog data models

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Action component of a capability triple
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PermissionAction {
    /// Read a record or listing
    View,
    /// Create a new record
    Create,
    /// Modify an existing record
    Edit,
    /// Remove a record
    Delete,
    /// Export data out of the system
    Export,
    /// Sign off on a record or report
    Approve,
}

impl PermissionAction {
    /// Parse an action from its key segment
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "view" => Some(PermissionAction::View),
            "create" => Some(PermissionAction::Create),
            "edit" => Some(PermissionAction::Edit),
            "delete" => Some(PermissionAction::Delete),
            "export" => Some(PermissionAction::Export),
            "approve" => Some(PermissionAction::Approve),
            _ => None,
        }
    }

    /// All declared actions
    pub fn all() -> &'static [PermissionAction] {
        &[
            PermissionAction::View,
            PermissionAction::Create,
            PermissionAction::Edit,
            PermissionAction::Delete,
            PermissionAction::Export,
            PermissionAction::Approve,
        ]
    }

    /// Key segment for this action
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionAction::View => "view",
            PermissionAction::Create => "create",
            PermissionAction::Edit => "edit",
            PermissionAction::Delete => "delete",
            PermissionAction::Export => "export",
            PermissionAction::Approve => "approve",
        }
    }
}

impl std::fmt::Display for PermissionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Dotted permission key ("section.subsection.action")
///
/// Keys have at least two segments; the subsection segments are optional.
/// Identity of a catalog row is the key string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionKey(String);

impl PermissionKey {
    /// Parse and validate a dotted key
    pub fn parse(key: &str) -> Result<Self> {
        let segments: Vec<&str> = key.split('.').collect();
        if segments.len() < 2 {
            return Err(Error::InvalidKey {
                key: key.to_string(),
            });
        }
        if segments
            .iter()
            .any(|s| s.is_empty() || s.chars().any(char::is_whitespace))
        {
            return Err(Error::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(Self(key.to_string()))
    }

    /// The raw key string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key segments, split on '.'
    pub fn segments(&self) -> Vec<&str> {
        self.0.split('.').collect()
    }

    /// First segment (category)
    pub fn category(&self) -> &str {
        self.0.split('.').next().unwrap_or(&self.0)
    }

    /// Last segment (action token)
    pub fn action_token(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }

    /// Interior segments joined with '.', empty for two-segment keys
    pub fn subsection_token(&self) -> String {
        let segments = self.segments();
        if segments.len() <= 2 {
            return String::new();
        }
        segments[1..segments.len() - 1].join(".")
    }
}

impl std::fmt::Display for PermissionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of the permission catalog
///
/// Created once per key at seed time; never deleted, only deactivated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermissionDefinition {
    /// Unique dotted key identifying this permission
    pub key: String,
    /// Human-facing display name (Arabic)
    pub display_name: String,
    /// Category token, the first key segment
    pub category: String,
    /// Position in catalog listings
    pub sort_order: u32,
    /// Inactive definitions are hidden from listings but stay valid
    pub active: bool,
}

impl PermissionDefinition {
    /// Create a new active definition
    pub fn new(key: String, display_name: String, sort_order: u32) -> Self {
        let category = key.split('.').next().unwrap_or_default().to_string();
        Self {
            key,
            display_name,
            category,
            sort_order,
            active: true,
        }
    }

    /// Set a custom display name
    pub fn with_display_name(mut self, display_name: String) -> Self {
        self.display_name = display_name;
        self
    }
}
