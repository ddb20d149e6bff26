//! Grant mutation
//!
//! The only writer of grant rows. The actor precondition runs before any
//! row is read or written, so a SCOPED subject cannot escalate its own
//! grants. Every write commits with exactly one audit record.

use std::sync::Arc;

use tracing::{info, warn};

use k9ops_catalog::structure;

use crate::audit::{AuditRecord, RequestOrigin};
use crate::directory::SubjectDirectory;
use crate::error::{Error, Result};
use crate::models::{
    Grant, GrantChange, GrantKey, PermissionAction, ProjectId, Role, SubjectId,
};
use crate::store::GrantStore;

/// The administrative mutation surface over the grant store
pub struct MutationService {
    store: Arc<dyn GrantStore>,
    directory: Arc<dyn SubjectDirectory>,
}

impl MutationService {
    pub fn new(store: Arc<dyn GrantStore>, directory: Arc<dyn SubjectDirectory>) -> Self {
        Self { store, directory }
    }

    /// Set one grant for a subject
    ///
    /// Only a FULL_ACCESS actor may mutate. The capability triple must be
    /// declared in the capability structure. The write is an upsert: an
    /// existing row keeps its identity and gets a fresh timestamp, a
    /// missing row is created with `old` treated as false.
    #[allow(clippy::too_many_arguments)]
    pub fn set_grant(
        &self,
        actor: &SubjectId,
        subject: &SubjectId,
        section: &str,
        subsection: &str,
        action: PermissionAction,
        project: Option<&ProjectId>,
        granted: bool,
        origin: &RequestOrigin,
    ) -> Result<GrantChange> {
        if self.directory.role(actor) != Role::FullAccess {
            return Err(Error::MutationDenied {
                actor: actor.to_string(),
            });
        }

        if !structure::contains(section, subsection, action) {
            return Err(Error::UnknownCapability {
                key: format!("{section}.{subsection}.{action}"),
            });
        }

        self.write_grant(
            actor, subject, section, subsection, action, project, granted, origin,
        )
    }

    /// Set every declared (subsection, action) pair of one section
    ///
    /// Each pair commits independently; a failure on one pair does not
    /// block the others. Returns the number of rows actually written,
    /// which callers must treat as the source of truth.
    pub fn set_section(
        &self,
        actor: &SubjectId,
        subject: &SubjectId,
        section: &str,
        granted: bool,
        project: Option<&ProjectId>,
        origin: &RequestOrigin,
    ) -> Result<usize> {
        if self.directory.role(actor) != Role::FullAccess {
            return Err(Error::MutationDenied {
                actor: actor.to_string(),
            });
        }

        let declared = structure::section(section).ok_or_else(|| Error::UnknownCapability {
            key: section.to_string(),
        })?;

        let mut written = 0;
        for (subsection, action) in declared.pairs() {
            match self.write_grant(
                actor, subject, section, subsection, action, project, granted, origin,
            ) {
                Ok(_) => written += 1,
                Err(e) => {
                    warn!(
                        subject = %subject,
                        section,
                        subsection,
                        action = %action,
                        error = %e,
                        "bulk section write failed for one pair"
                    );
                }
            }
        }

        info!(
            actor = %actor,
            subject = %subject,
            section,
            granted,
            written,
            "section grants updated"
        );
        Ok(written)
    }

    /// Grant the default view-only allow-list to a newly provisioned subject
    ///
    /// Writes at global scope under the reserved system actor. Keys that
    /// already hold a row are left untouched, whatever their value.
    /// Returns the number of rows written.
    pub fn initialize_defaults(
        &self,
        subject: &SubjectId,
        origin: &RequestOrigin,
    ) -> Result<usize> {
        let actor = SubjectId::system();

        let mut written = 0;
        for &(section, subsection, action) in structure::default_view_set() {
            let key = GrantKey::global(subject.clone(), section, subsection, action);
            if self.store.find(&key)?.is_some() {
                continue;
            }
            self.write_grant(&actor, subject, section, subsection, action, None, true, origin)?;
            written += 1;
        }

        info!(subject = %subject, written, "default view grants initialized");
        Ok(written)
    }

    // The shared write path. Preconditions are the caller's job: set_grant
    // validates actor and triple, set_section iterates declared pairs only,
    // initialize_defaults writes the fixed default set.
    #[allow(clippy::too_many_arguments)]
    fn write_grant(
        &self,
        actor: &SubjectId,
        subject: &SubjectId,
        section: &str,
        subsection: &str,
        action: PermissionAction,
        project: Option<&ProjectId>,
        granted: bool,
        origin: &RequestOrigin,
    ) -> Result<GrantChange> {
        let key = match project {
            Some(p) => GrantKey::project(
                subject.clone(),
                section,
                subsection,
                action,
                p.clone(),
            ),
            None => GrantKey::global(subject.clone(), section, subsection, action),
        };
        let old = self
            .store
            .find(&key)?
            .map(|g| g.granted)
            .unwrap_or(false);

        let grant = match project {
            Some(p) => Grant::with_project(
                subject.clone(),
                section,
                subsection,
                action,
                p.clone(),
                granted,
            ),
            None => Grant::new(subject.clone(), section, subsection, action, granted),
        };

        let record = AuditRecord::new(
            actor.clone(),
            subject.clone(),
            section,
            subsection,
            action,
            grant.scope.clone(),
            old,
            granted,
        )
        .with_origin(origin.clone());

        self.store.upsert_with_audit(&grant, &record)?;

        info!(
            actor = %actor,
            subject = %subject,
            section,
            subsection,
            action = %action,
            scope = %grant.scope,
            old,
            new = granted,
            "grant updated"
        );

        Ok(GrantChange { old, new: granted })
    }
}
