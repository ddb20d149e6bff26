//! Project scope extraction from inbound requests
//!
//! Protected operations are scoped to a project, but different endpoints
//! carry the project identifier in different places. A [`ScopeRule`] names
//! the locations to read and [`ProtectedRequest`] is the transport-neutral
//! view of the request the rule reads from.

use std::collections::HashMap;

use k9ops_permissions::{ProjectId, RequestOrigin};

/// Transport-neutral view of an inbound request.
///
/// Carries only the parts the gateway is allowed to inspect: route
/// parameters, query values, an optional JSON body, and the origin
/// metadata recorded on grant mutations.
#[derive(Debug, Clone, Default)]
pub struct ProtectedRequest {
    params: HashMap<String, String>,
    query: HashMap<String, String>,
    body: Option<serde_json::Value>,
    origin: RequestOrigin,
}

impl ProtectedRequest {
    /// Create an empty request
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route parameter
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Add a query value
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    /// Attach a JSON body
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach origin metadata
    pub fn with_origin(mut self, origin: RequestOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Look up a route parameter
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Look up a query value
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// Look up a top-level body field, rendering strings and numbers
    pub fn body_field(&self, name: &str) -> Option<String> {
        match self.body.as_ref()?.get(name)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Origin metadata for audit records
    pub fn origin(&self) -> &RequestOrigin {
        &self.origin
    }
}

/// Where to find the project identifier on a request.
///
/// Locations are checked in fixed priority: route parameter first, then
/// query value, then body field. The first location that yields a
/// non-blank value wins; blank values count as absent.
#[derive(Debug, Clone, Default)]
pub struct ScopeRule {
    param: Option<String>,
    query: Option<String>,
    body_field: Option<String>,
}

impl ScopeRule {
    /// Create a rule with no locations (every request resolves to none)
    pub fn new() -> Self {
        Self::default()
    }

    /// The conventional rule: `project_id` in all three locations
    pub fn standard() -> Self {
        Self::new()
            .with_param("project_id")
            .with_query("project_id")
            .with_body_field("project_id")
    }

    /// Read the identifier from a route parameter
    pub fn with_param(mut self, name: impl Into<String>) -> Self {
        self.param = Some(name.into());
        self
    }

    /// Read the identifier from a query value
    pub fn with_query(mut self, name: impl Into<String>) -> Self {
        self.query = Some(name.into());
        self
    }

    /// Read the identifier from a top-level body field
    pub fn with_body_field(mut self, name: impl Into<String>) -> Self {
        self.body_field = Some(name.into());
        self
    }

    /// Resolve the project identifier for a request, if present
    pub fn resolve(&self, request: &ProtectedRequest) -> Option<ProjectId> {
        if let Some(name) = &self.param {
            if let Some(value) = request.param(name) {
                if !value.is_empty() {
                    return Some(ProjectId::new(value));
                }
            }
        }
        if let Some(name) = &self.query {
            if let Some(value) = request.query_value(name) {
                if !value.is_empty() {
                    return Some(ProjectId::new(value));
                }
            }
        }
        if let Some(name) = &self.body_field {
            if let Some(value) = request.body_field(name) {
                if !value.is_empty() {
                    return Some(ProjectId::new(value));
                }
            }
        }
        None
    }
}
