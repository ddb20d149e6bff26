//! Audit trail querying and filtering

use chrono::{DateTime, Utc};

use crate::models::{PermissionAction, ProjectId, SubjectId};

use super::models::AuditRecord;

/// Filter criteria for audit trail queries
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    /// Filter by acting subject (optional)
    pub actor: Option<SubjectId>,
    /// Filter by target subject (optional)
    pub subject: Option<SubjectId>,
    /// Filter by section (optional)
    pub section: Option<String>,
    /// Filter by action (optional)
    pub action: Option<PermissionAction>,
    /// Filter by project scope (optional)
    pub project: Option<ProjectId>,
    /// Filter by start date (optional)
    pub start_date: Option<DateTime<Utc>>,
    /// Filter by end date (optional)
    pub end_date: Option<DateTime<Utc>>,
}

impl AuditFilter {
    /// Create a new empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by acting subject
    pub fn with_actor(mut self, actor: SubjectId) -> Self {
        self.actor = Some(actor);
        self
    }

    /// Filter by target subject
    pub fn with_subject(mut self, subject: SubjectId) -> Self {
        self.subject = Some(subject);
        self
    }

    /// Filter by section
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    /// Filter by action
    pub fn with_action(mut self, action: PermissionAction) -> Self {
        self.action = Some(action);
        self
    }

    /// Filter by project scope
    pub fn with_project(mut self, project: ProjectId) -> Self {
        self.project = Some(project);
        self
    }

    /// Filter by start date
    pub fn with_start_date(mut self, date: DateTime<Utc>) -> Self {
        self.start_date = Some(date);
        self
    }

    /// Filter by end date
    pub fn with_end_date(mut self, date: DateTime<Utc>) -> Self {
        self.end_date = Some(date);
        self
    }

    /// Check if a record matches this filter
    fn matches(&self, record: &AuditRecord) -> bool {
        if let Some(ref actor) = self.actor {
            if record.actor != *actor {
                return false;
            }
        }

        if let Some(ref subject) = self.subject {
            if record.subject != *subject {
                return false;
            }
        }

        if let Some(ref section) = self.section {
            if record.section != *section {
                return false;
            }
        }

        if let Some(action) = self.action {
            if record.action != action {
                return false;
            }
        }

        if let Some(ref project) = self.project {
            if record.scope.project_id() != Some(project) {
                return false;
            }
        }

        if let Some(start_date) = self.start_date {
            if record.timestamp < start_date {
                return false;
            }
        }

        if let Some(end_date) = self.end_date {
            if record.timestamp > end_date {
                return false;
            }
        }

        true
    }
}

/// Pagination parameters
#[derive(Debug, Clone)]
pub struct Pagination {
    /// Number of results per page
    pub limit: usize,
    /// Number of results to skip
    pub offset: usize,
}

impl Pagination {
    /// Create a new pagination with limit and offset
    pub fn new(limit: usize, offset: usize) -> Self {
        Self { limit, offset }
    }

    /// Create pagination for the first page
    pub fn first_page(limit: usize) -> Self {
        Self { limit, offset: 0 }
    }

    /// Get the next page pagination
    pub fn next_page(&self) -> Self {
        Self {
            limit: self.limit,
            offset: self.offset + self.limit,
        }
    }

    /// Get the previous page pagination
    pub fn prev_page(&self) -> Option<Self> {
        if self.offset >= self.limit {
            Some(Self {
                limit: self.limit,
                offset: self.offset - self.limit,
            })
        } else {
            None
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(20, 0)
    }
}

/// Query result with pagination metadata
#[derive(Debug, Clone)]
pub struct AuditQuery {
    /// Filtered and paginated records
    pub records: Vec<AuditRecord>,
    /// Total number of records matching the filter
    pub total: usize,
    /// Current pagination
    pub pagination: Pagination,
}

impl AuditQuery {
    /// Execute a query on the given records
    pub fn execute(
        records: &[AuditRecord],
        filter: &AuditFilter,
        pagination: &Pagination,
    ) -> Self {
        let filtered: Vec<_> = records
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();

        let total = filtered.len();

        let start = pagination.offset;
        let end = std::cmp::min(start + pagination.limit, total);

        let paginated: Vec<_> = if start < total {
            filtered[start..end].to_vec()
        } else {
            Vec::new()
        };

        Self {
            records: paginated,
            total,
            pagination: pagination.clone(),
        }
    }

    /// Get the total number of pages
    pub fn total_pages(&self) -> usize {
        if self.pagination.limit == 0 {
            return 0;
        }
        self.total.div_ceil(self.pagination.limit)
    }

    /// Get the current page number (1-indexed)
    pub fn current_page(&self) -> usize {
        if self.pagination.limit == 0 {
            return 0;
        }
        (self.pagination.offset / self.pagination.limit) + 1
    }

    /// Check if there is a next page
    pub fn has_next_page(&self) -> bool {
        if self.pagination.limit == 0 {
            return false;
        }
        self.pagination.offset + self.pagination.limit < self.total
    }

    /// Check if there is a previous page
    pub fn has_prev_page(&self) -> bool {
        self.pagination.offset > 0
    }
}
