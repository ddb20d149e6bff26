//! Grant persistence
//!
//! Two backends: SQLite for durable deployments and an in-memory store for
//! tests and embedded setups. Both commit a grant write and its audit
//! record as one unit.

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryGrantStore;
pub use sqlite::SqliteGrantStore;

use crate::audit::AuditRecord;
use crate::error::Result;
use crate::models::{Grant, GrantKey, SubjectId};

/// Repository trait for grant rows
///
/// At most one row exists per key; writes are upserts. The paired audit
/// write is part of this trait because atomicity can only be provided by
/// the backend itself.
pub trait GrantStore: Send + Sync {
    /// Find the grant stored under a key, if any
    fn find(&self, key: &GrantKey) -> Result<Option<Grant>>;

    /// All grants stored for a subject, in stable key order
    fn grants_for_subject(&self, subject: &SubjectId) -> Result<Vec<Grant>>;

    /// Upsert a grant and append its audit record as one unit
    ///
    /// Either both persist or neither does.
    fn upsert_with_audit(&self, grant: &Grant, record: &AuditRecord) -> Result<()>;

    /// Number of grant rows stored
    fn grant_count(&self) -> Result<usize>;
}
