//! Permission resolution
//!
//! Decisions are computed from current store state on every call; nothing
//! is cached between calls, so a committed mutation is visible to the next
//! check. Deny is the normal return value of a failed check, never an
//! error.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use k9ops_catalog::structure;

use crate::directory::SubjectDirectory;
use crate::error::Result;
use crate::models::{GrantKey, PermissionAction, ProjectId, Role, SubjectId};
use crate::store::GrantStore;

/// Computes allow/deny decisions over the grant store
pub struct ResolutionEngine {
    store: Arc<dyn GrantStore>,
    directory: Arc<dyn SubjectDirectory>,
}

impl ResolutionEngine {
    pub fn new(store: Arc<dyn GrantStore>, directory: Arc<dyn SubjectDirectory>) -> Self {
        Self { store, directory }
    }

    /// Decide whether a subject may perform an action
    ///
    /// Evaluation order, first match wins:
    /// 1. A FULL_ACCESS subject is allowed everything.
    /// 2. The exact project-scoped row, when a project is given.
    /// 3. The global row.
    /// 4. No row at any scope resolves to deny.
    ///
    /// A project-scoped row therefore overrides a conflicting global row.
    /// A store failure resolves to deny, never to allow.
    pub fn can(
        &self,
        subject: &SubjectId,
        section: &str,
        subsection: &str,
        action: PermissionAction,
        project: Option<&ProjectId>,
    ) -> bool {
        if self.directory.role(subject) == Role::FullAccess {
            return true;
        }

        if let Some(project) = project {
            let key = GrantKey::project(
                subject.clone(),
                section,
                subsection,
                action,
                project.clone(),
            );
            match self.store.find(&key) {
                Ok(Some(grant)) => return grant.granted,
                Ok(None) => {}
                Err(e) => {
                    warn!(
                        subject = %subject,
                        section,
                        subsection,
                        action = %action,
                        error = %e,
                        "grant lookup failed, denying"
                    );
                    return false;
                }
            }
        }

        let key = GrantKey::global(subject.clone(), section, subsection, action);
        match self.store.find(&key) {
            Ok(Some(grant)) => grant.granted,
            Ok(None) => false,
            Err(e) => {
                warn!(
                    subject = %subject,
                    section,
                    subsection,
                    action = %action,
                    error = %e,
                    "grant lookup failed, denying"
                );
                false
            }
        }
    }

    /// Build the full decision matrix for one subject
    ///
    /// Evaluates `can` over every triple in the declared structure. Used
    /// for permission-editor rendering and point-in-time export.
    pub fn matrix(&self, subject: &SubjectId, project: Option<&ProjectId>) -> PermissionMatrix {
        let mut sections = BTreeMap::new();

        for section in structure::sections() {
            let mut subsections = BTreeMap::new();
            for subsection in &section.subsections {
                let mut actions = BTreeMap::new();
                for &action in subsection.actions {
                    let allowed =
                        self.can(subject, section.name, subsection.label, action, project);
                    actions.insert(action, allowed);
                }
                subsections.insert(subsection.label.to_string(), actions);
            }
            sections.insert(section.name.to_string(), subsections);
        }

        PermissionMatrix { sections }
    }
}

/// Point-in-time decision matrix for one subject
///
/// Total over arbitrary input: triples outside the declared structure
/// resolve to deny rather than failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermissionMatrix {
    sections: BTreeMap<String, BTreeMap<String, BTreeMap<PermissionAction, bool>>>,
}

impl PermissionMatrix {
    /// Decision for one capability triple, deny when not present
    pub fn is_allowed(&self, section: &str, subsection: &str, action: PermissionAction) -> bool {
        self.sections
            .get(section)
            .and_then(|subsections| subsections.get(subsection))
            .and_then(|actions| actions.get(&action))
            .copied()
            .unwrap_or(false)
    }

    /// The underlying section map
    pub fn sections(
        &self,
    ) -> &BTreeMap<String, BTreeMap<String, BTreeMap<PermissionAction, bool>>> {
        &self.sections
    }

    /// Serialize the matrix for export
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
