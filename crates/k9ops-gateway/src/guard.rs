//! Permission enforcement in front of protected operations
//!
//! The guard sits between the transport layer and the operation it
//! protects. It resolves the project scope from the request, runs the
//! membership and permission checks, and only then invokes the wrapped
//! closure. Denied requests never execute any part of the operation.

use std::sync::Arc;

use tracing::{debug, warn};

use k9ops_permissions::{
    PermissionAction, ResolutionEngine, Role, SubjectDirectory, SubjectId,
};

use crate::error::{Forbidden, Result};
use crate::scope::{ProtectedRequest, ScopeRule};

/// Why a request was refused. Logged for operators, never returned to
/// the caller, so responses stay indistinguishable across deny paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DenyReason {
    MissingProjectId,
    UnknownProject,
    NotAMember,
    NotPermitted,
}

impl DenyReason {
    fn as_str(&self) -> &'static str {
        match self {
            DenyReason::MissingProjectId => "missing_project_id",
            DenyReason::UnknownProject => "unknown_project",
            DenyReason::NotAMember => "not_a_member",
            DenyReason::NotPermitted => "not_permitted",
        }
    }
}

/// Gate in front of a protected operation
pub struct PermissionGuard {
    engine: Arc<ResolutionEngine>,
    directory: Arc<dyn SubjectDirectory>,
}

impl PermissionGuard {
    /// Create a guard over a resolution engine and subject directory
    pub fn new(engine: Arc<ResolutionEngine>, directory: Arc<dyn SubjectDirectory>) -> Self {
        Self { engine, directory }
    }

    /// Run `operation` if the subject may perform `section.subsection.action`
    /// in the project scope the rule extracts from the request.
    ///
    /// Checks run in order: full-access bypass, project extraction, project
    /// existence, membership, permission resolution. The first failing check
    /// refuses the request with the uniform [`Forbidden`] outcome and the
    /// operation is never invoked.
    #[allow(clippy::too_many_arguments)]
    pub fn protect<F, T>(
        &self,
        subject: &SubjectId,
        section: &str,
        subsection: &str,
        action: PermissionAction,
        rule: &ScopeRule,
        request: &ProtectedRequest,
        operation: F,
    ) -> Result<T>
    where
        F: FnOnce() -> T,
    {
        self.authorize(subject, section, subsection, action, rule, request)?;
        Ok(operation())
    }

    /// Decide a request without executing anything.
    ///
    /// Useful for middleware that needs the verdict before the operation
    /// is even constructed.
    pub fn authorize(
        &self,
        subject: &SubjectId,
        section: &str,
        subsection: &str,
        action: PermissionAction,
        rule: &ScopeRule,
        request: &ProtectedRequest,
    ) -> Result<()> {
        // Full-access subjects skip scope extraction entirely; their
        // requests are valid even without a project identifier.
        if self.directory.role(subject) == Role::FullAccess {
            debug!(subject = %subject, "full access subject, request authorized");
            return Ok(());
        }

        let Some(project) = rule.resolve(request) else {
            return Err(self.deny(subject, section, subsection, action, DenyReason::MissingProjectId));
        };
        if !self.directory.project_exists(&project) {
            return Err(self.deny(subject, section, subsection, action, DenyReason::UnknownProject));
        }
        if !self.directory.is_member(subject, &project) {
            return Err(self.deny(subject, section, subsection, action, DenyReason::NotAMember));
        }
        if !self
            .engine
            .can(subject, section, subsection, action, Some(&project))
        {
            return Err(self.deny(subject, section, subsection, action, DenyReason::NotPermitted));
        }

        debug!(
            subject = %subject,
            project = %project,
            section,
            subsection,
            action = %action,
            "request authorized"
        );
        Ok(())
    }

    fn deny(
        &self,
        subject: &SubjectId,
        section: &str,
        subsection: &str,
        action: PermissionAction,
        reason: DenyReason,
    ) -> Forbidden {
        warn!(
            subject = %subject,
            section,
            subsection,
            action = %action,
            reason = reason.as_str(),
            "request forbidden"
        );
        Forbidden
    }
}
