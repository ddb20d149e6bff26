//! Append-only audit log contract

use crate::error::Result;

use super::models::AuditRecord;

/// Read and append access to the audit trail
///
/// The contract is append-only by construction: no update or delete
/// operation exists, so immutability does not rest on caller discipline.
/// Engine-driven writes go through the grant store's atomic pairing and
/// not through `append` directly; `append` exists for hosts that record
/// events of their own in the same trail.
pub trait AuditLog: Send + Sync {
    /// Append one record to the trail
    fn append(&self, record: AuditRecord) -> Result<()>;

    /// All records in insertion order
    fn records(&self) -> Result<Vec<AuditRecord>>;

    /// Number of records in the trail
    fn len(&self) -> Result<usize>;

    /// Whether the trail is empty
    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}
