//! Permission engine for K9Ops
//!
//! Granular, project-scoped permission resolution and mutation: per-subject
//! allow/deny grants at global or project scope, a coarse full-access
//! bypass, deterministic scope precedence, and an append-only audit trail
//! paired atomically with every grant change.

pub mod audit;
pub mod directory;
pub mod error;
pub mod models;
pub mod mutation;
pub mod resolver;
pub mod store;

pub use audit::{AuditFilter, AuditLog, AuditQuery, AuditRecord, Pagination, RequestOrigin};
pub use directory::{InMemoryDirectory, SubjectDirectory};
pub use error::{Error, Result};
pub use models::{
    Grant, GrantChange, GrantKey, GrantScope, PermissionAction, ProjectId, Role, SubjectId,
};
pub use mutation::MutationService;
pub use resolver::{PermissionMatrix, ResolutionEngine};
pub use store::{GrantStore, InMemoryGrantStore, SqliteGrantStore};
