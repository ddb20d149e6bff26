//! Permission engine data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use k9ops_catalog::PermissionAction;

/// Identifier of a subject (the actor whose access is evaluated)
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SubjectId(String);

impl SubjectId {
    /// Wrap a raw subject identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The reserved actor recorded for engine-initiated writes
    pub fn system() -> Self {
        Self("system".to_string())
    }

    /// The raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a project
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    /// Wrap a raw project identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Coarse role supplied by the subject directory
///
/// FULL_ACCESS bypasses fine-grained evaluation entirely; SCOPED subjects
/// are evaluated against their grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    FullAccess,
    Scoped,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::FullAccess => write!(f, "FULL_ACCESS"),
            Role::Scoped => write!(f, "SCOPED"),
        }
    }
}

/// Scope of a grant: one project, or all of them
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum GrantScope {
    Global,
    Project(ProjectId),
}

impl GrantScope {
    /// Build a scope from an optional project id
    pub fn from_project(project: Option<&ProjectId>) -> Self {
        match project {
            Some(id) => GrantScope::Project(id.clone()),
            None => GrantScope::Global,
        }
    }

    /// The project id, if this scope names one
    pub fn project_id(&self) -> Option<&ProjectId> {
        match self {
            GrantScope::Global => None,
            GrantScope::Project(id) => Some(id),
        }
    }

    /// Whether this is the global scope
    pub fn is_global(&self) -> bool {
        matches!(self, GrantScope::Global)
    }
}

impl std::fmt::Display for GrantScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GrantScope::Global => write!(f, "global"),
            GrantScope::Project(id) => write!(f, "project:{}", id),
        }
    }
}

/// The five-part key identifying one grant row
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GrantKey {
    pub subject: SubjectId,
    pub section: String,
    pub subsection: String,
    pub action: PermissionAction,
    pub scope: GrantScope,
}

impl GrantKey {
    /// Key for a grant at global scope
    pub fn global(
        subject: SubjectId,
        section: impl Into<String>,
        subsection: impl Into<String>,
        action: PermissionAction,
    ) -> Self {
        Self {
            subject,
            section: section.into(),
            subsection: subsection.into(),
            action,
            scope: GrantScope::Global,
        }
    }

    /// Key for a grant scoped to one project
    pub fn project(
        subject: SubjectId,
        section: impl Into<String>,
        subsection: impl Into<String>,
        action: PermissionAction,
        project: ProjectId,
    ) -> Self {
        Self {
            subject,
            section: section.into(),
            subsection: subsection.into(),
            action,
            scope: GrantScope::Project(project),
        }
    }

    /// Dotted rendering of the capability part of the key
    pub fn capability(&self) -> String {
        format!("{}.{}.{}", self.section, self.subsection, self.action)
    }
}

/// One stored allow/deny decision for a single capability
///
/// At most one row exists per key; absence of a row is a distinct state
/// from granted=false, but both resolve to deny.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grant {
    pub subject: SubjectId,
    pub section: String,
    pub subsection: String,
    pub action: PermissionAction,
    pub scope: GrantScope,
    pub granted: bool,
    pub updated_at: DateTime<Utc>,
}

impl Grant {
    /// Create a grant at global scope
    pub fn new(
        subject: SubjectId,
        section: impl Into<String>,
        subsection: impl Into<String>,
        action: PermissionAction,
        granted: bool,
    ) -> Self {
        Self {
            subject,
            section: section.into(),
            subsection: subsection.into(),
            action,
            scope: GrantScope::Global,
            granted,
            updated_at: Utc::now(),
        }
    }

    /// Create a grant scoped to one project
    pub fn with_project(
        subject: SubjectId,
        section: impl Into<String>,
        subsection: impl Into<String>,
        action: PermissionAction,
        project: ProjectId,
        granted: bool,
    ) -> Self {
        Self {
            subject,
            section: section.into(),
            subsection: subsection.into(),
            action,
            scope: GrantScope::Project(project),
            granted,
            updated_at: Utc::now(),
        }
    }

    /// The five-part key of this grant
    pub fn key(&self) -> GrantKey {
        GrantKey {
            subject: self.subject.clone(),
            section: self.section.clone(),
            subsection: self.subsection.clone(),
            action: self.action,
            scope: self.scope.clone(),
        }
    }
}

/// Old and new effective values of one grant mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantChange {
    pub old: bool,
    pub new: bool,
}

impl GrantChange {
    /// Whether the mutation changed the effective value
    pub fn changed(&self) -> bool {
        self.old != self.new
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        assert_eq!(
            serde_json::to_string(&Role::FullAccess).unwrap(),
            "\"FULL_ACCESS\""
        );
        assert_eq!(serde_json::to_string(&Role::Scoped).unwrap(), "\"SCOPED\"");

        let role: Role = serde_json::from_str("\"FULL_ACCESS\"").unwrap();
        assert_eq!(role, Role::FullAccess);
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::FullAccess.to_string(), "FULL_ACCESS");
        assert_eq!(Role::Scoped.to_string(), "SCOPED");
    }

    #[test]
    fn test_subject_id_transparent_serialization() {
        let id = SubjectId::new("u-17");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"u-17\"");
    }

    #[test]
    fn test_scope_from_project() {
        let project = ProjectId::new("p1");
        assert_eq!(
            GrantScope::from_project(Some(&project)),
            GrantScope::Project(project.clone())
        );
        assert_eq!(GrantScope::from_project(None), GrantScope::Global);
    }

    #[test]
    fn test_scope_display() {
        assert_eq!(GrantScope::Global.to_string(), "global");
        assert_eq!(
            GrantScope::Project(ProjectId::new("p1")).to_string(),
            "project:p1"
        );
    }

    #[test]
    fn test_grant_key_distinguishes_scopes() {
        let global = GrantKey::global(
            SubjectId::new("u1"),
            "Dogs",
            "عرض قائمة الكلاب",
            PermissionAction::View,
        );
        let scoped = GrantKey::project(
            SubjectId::new("u1"),
            "Dogs",
            "عرض قائمة الكلاب",
            PermissionAction::View,
            ProjectId::new("p1"),
        );

        assert_ne!(global, scoped);
        assert!(global.scope.is_global());
        assert_eq!(
            scoped.scope.project_id().map(|p| p.as_str()),
            Some("p1")
        );
    }

    #[test]
    fn test_grant_key_capability() {
        let key = GrantKey::global(
            SubjectId::new("u1"),
            "Dogs",
            "حذف كلب",
            PermissionAction::Delete,
        );
        assert_eq!(key.capability(), "Dogs.حذف كلب.delete");
    }

    #[test]
    fn test_grant_constructors() {
        let global = Grant::new(
            SubjectId::new("u1"),
            "Dogs",
            "عرض قائمة الكلاب",
            PermissionAction::View,
            true,
        );
        assert!(global.scope.is_global());
        assert!(global.granted);

        let scoped = Grant::with_project(
            SubjectId::new("u1"),
            "Dogs",
            "حذف كلب",
            PermissionAction::Delete,
            ProjectId::new("p1"),
            false,
        );
        assert!(!scoped.scope.is_global());
        assert!(!scoped.granted);
        assert_eq!(scoped.key().scope, scoped.scope);
    }

    #[test]
    fn test_grant_serialization_round_trip() {
        let grant = Grant::with_project(
            SubjectId::new("u1"),
            "Dogs",
            "ملف الكلب",
            PermissionAction::Edit,
            ProjectId::new("p1"),
            true,
        );
        let json = serde_json::to_string(&grant).unwrap();
        let back: Grant = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grant);
    }

    #[test]
    fn test_grant_change() {
        assert!(GrantChange { old: false, new: true }.changed());
        assert!(!GrantChange { old: true, new: true }.changed());
    }
}
