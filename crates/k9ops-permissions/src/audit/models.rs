//! Audit trail data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{GrantScope, PermissionAction, SubjectId};

/// Request provenance attached to an audit record
///
/// Both fields are best-effort; writes that do not originate from an
/// inbound request leave them empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestOrigin {
    /// Remote address of the originating request
    pub remote_addr: Option<String>,
    /// Client agent string of the originating request
    pub user_agent: Option<String>,
}

impl RequestOrigin {
    /// Create an empty origin
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the remote address
    pub fn with_remote_addr(mut self, addr: impl Into<String>) -> Self {
        self.remote_addr = Some(addr.into());
        self
    }

    /// Set the client agent string
    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }
}

/// One immutable record of a grant mutation
///
/// Exactly one record exists per successful mutation. Records are never
/// updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Unique identifier for this record
    pub id: String,
    /// Timestamp of the mutation
    pub timestamp: DateTime<Utc>,
    /// Who performed the mutation
    pub actor: SubjectId,
    /// Whose grant was mutated
    pub subject: SubjectId,
    /// Section of the mutated capability
    pub section: String,
    /// Subsection of the mutated capability
    pub subsection: String,
    /// Action of the mutated capability
    pub action: PermissionAction,
    /// Scope the grant applies to
    pub scope: GrantScope,
    /// Effective value before the mutation (false when no row existed)
    pub old_value: bool,
    /// Effective value after the mutation
    pub new_value: bool,
    /// Request provenance, if available
    pub origin: RequestOrigin,
}

impl AuditRecord {
    /// Create a new audit record with a fresh id and timestamp
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        actor: SubjectId,
        subject: SubjectId,
        section: impl Into<String>,
        subsection: impl Into<String>,
        action: PermissionAction,
        scope: GrantScope,
        old_value: bool,
        new_value: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            actor,
            subject,
            section: section.into(),
            subsection: subsection.into(),
            action,
            scope,
            old_value,
            new_value,
            origin: RequestOrigin::new(),
        }
    }

    /// Attach request provenance
    pub fn with_origin(mut self, origin: RequestOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Whether the mutation changed the effective value
    pub fn changed(&self) -> bool {
        self.old_value != self.new_value
    }
}
