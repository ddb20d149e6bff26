//! Subject directory abstraction
//!
//! The engine does not own identity data. Host applications supply role,
//! membership, and project-existence lookups through this trait.

use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;

use crate::models::{ProjectId, Role, SubjectId};

/// Read-only identity lookups the engine depends on
///
/// Implementations must answer for unknown subjects and projects without
/// failing: an unknown subject is `Role::Scoped`, an unknown pairing is
/// not a member, an unknown project does not exist.
pub trait SubjectDirectory: Send + Sync {
    /// Role of a subject
    fn role(&self, subject: &SubjectId) -> Role;

    /// Whether a subject belongs to a project
    fn is_member(&self, subject: &SubjectId, project: &ProjectId) -> bool;

    /// Whether a project exists at all
    fn project_exists(&self, project: &ProjectId) -> bool;
}

#[derive(Default)]
struct DirectoryInner {
    roles: HashMap<SubjectId, Role>,
    members: HashMap<ProjectId, HashSet<SubjectId>>,
    projects: HashSet<ProjectId>,
}

/// In-memory directory for tests and embedded setups
pub struct InMemoryDirectory {
    inner: RwLock<DirectoryInner>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(DirectoryInner::default()),
        }
    }

    /// Register a subject with a role
    pub fn insert_subject(&self, subject: SubjectId, role: Role) {
        self.inner.write().roles.insert(subject, role);
    }

    /// Register a project
    pub fn insert_project(&self, project: ProjectId) {
        self.inner.write().projects.insert(project);
    }

    /// Register a subject as a member of a project
    ///
    /// The project is registered as existing if it was not already.
    pub fn add_member(&self, subject: SubjectId, project: ProjectId) {
        let mut inner = self.inner.write();
        inner.projects.insert(project.clone());
        inner.members.entry(project).or_default().insert(subject);
    }
}

impl Default for InMemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl SubjectDirectory for InMemoryDirectory {
    fn role(&self, subject: &SubjectId) -> Role {
        self.inner
            .read()
            .roles
            .get(subject)
            .copied()
            .unwrap_or(Role::Scoped)
    }

    fn is_member(&self, subject: &SubjectId, project: &ProjectId) -> bool {
        self.inner
            .read()
            .members
            .get(project)
            .map(|set| set.contains(subject))
            .unwrap_or(false)
    }

    fn project_exists(&self, project: &ProjectId) -> bool {
        self.inner.read().projects.contains(project)
    }
}
