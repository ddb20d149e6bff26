//! In-memory grant store (for testing and embedded setups)

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::audit::{AuditLog, AuditRecord};
use crate::error::Result;
use crate::models::{Grant, GrantKey, SubjectId};

use super::GrantStore;

#[derive(Default)]
struct StoreInner {
    grants: HashMap<GrantKey, Grant>,
    audit: Vec<AuditRecord>,
}

/// In-memory grant store
///
/// A single lock guards grants and audit records together, so the paired
/// write is atomic with respect to every reader.
pub struct InMemoryGrantStore {
    inner: RwLock<StoreInner>,
}

impl InMemoryGrantStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreInner::default()),
        }
    }
}

impl Default for InMemoryGrantStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GrantStore for InMemoryGrantStore {
    fn find(&self, key: &GrantKey) -> Result<Option<Grant>> {
        Ok(self.inner.read().grants.get(key).cloned())
    }

    fn grants_for_subject(&self, subject: &SubjectId) -> Result<Vec<Grant>> {
        let inner = self.inner.read();
        let mut grants: Vec<Grant> = inner
            .grants
            .values()
            .filter(|g| g.subject == *subject)
            .cloned()
            .collect();
        grants.sort_by(|a, b| {
            (&a.section, &a.subsection, a.action, &a.scope).cmp(&(
                &b.section,
                &b.subsection,
                b.action,
                &b.scope,
            ))
        });
        Ok(grants)
    }

    fn upsert_with_audit(&self, grant: &Grant, record: &AuditRecord) -> Result<()> {
        let mut inner = self.inner.write();
        inner.grants.insert(grant.key(), grant.clone());
        inner.audit.push(record.clone());
        Ok(())
    }

    fn grant_count(&self) -> Result<usize> {
        Ok(self.inner.read().grants.len())
    }
}

impl AuditLog for InMemoryGrantStore {
    fn append(&self, record: AuditRecord) -> Result<()> {
        self.inner.write().audit.push(record);
        Ok(())
    }

    fn records(&self) -> Result<Vec<AuditRecord>> {
        Ok(self.inner.read().audit.clone())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.inner.read().audit.len())
    }
}
