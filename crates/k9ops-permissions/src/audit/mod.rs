//! Audit trail for grant mutations
//!
//! Every grant write is paired with exactly one immutable record. The
//! contract is append-only: records are never updated or deleted.

pub mod log;
pub mod models;
pub mod query;

pub use log::AuditLog;
pub use models::{AuditRecord, RequestOrigin};
pub use query::{AuditFilter, AuditQuery, Pagination};
