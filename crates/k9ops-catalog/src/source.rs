//! Catalog sources
//!
//! A catalog source is an ordered collection of candidate keys fed to the
//! seeder. Candidates come from two origins: a machine-generated list
//! (route scanner output) and a hand-curated supplemental list. Duplicate
//! keys across origins resolve by first-writer-wins.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::PermissionKey;

/// One candidate entry from a catalog source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Dotted permission key
    pub permission_key: String,
    /// Display name supplied by the generator; the seeder derives its own
    pub display_name: Option<String>,
    /// Route the generator scanned this key from, if any
    pub route_path: Option<String>,
}

impl CatalogEntry {
    /// Create an entry with only a key
    pub fn new(permission_key: impl Into<String>) -> Self {
        Self {
            permission_key: permission_key.into(),
            display_name: None,
            route_path: None,
        }
    }

    /// Attach the generator's display name
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Attach the scanned route path
    pub fn with_route_path(mut self, route_path: impl Into<String>) -> Self {
        self.route_path = Some(route_path.into());
        self
    }
}

/// Versioned wire format for machine-generated sources
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SourceManifest {
    version: u32,
    entries: Vec<CatalogEntry>,
}

/// Ordered, deduplicated collection of candidate catalog keys
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSource {
    candidates: Vec<CatalogEntry>,
}

impl CatalogSource {
    /// Combine a generated and a curated origin into one source
    ///
    /// Every key is validated; duplicates resolve by first-writer-wins,
    /// so a curated entry never displaces a generated one for the same
    /// key.
    pub fn new(generated: Vec<CatalogEntry>, curated: Vec<CatalogEntry>) -> Result<Self> {
        for entry in generated.iter().chain(curated.iter()) {
            PermissionKey::parse(&entry.permission_key)?;
        }
        Ok(Self::merge(generated, curated))
    }

    /// Parse a versioned generated manifest and merge the curated list
    pub fn from_json(json: &str, curated: Vec<CatalogEntry>) -> Result<Self> {
        let manifest: SourceManifest = serde_json::from_str(json)?;
        Self::new(manifest.entries, curated)
    }

    /// Load a versioned generated manifest from disk
    pub fn from_file<P: AsRef<Path>>(path: P, curated: Vec<CatalogEntry>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content, curated)
    }

    /// The built-in source: the embedded generated list plus the curated
    /// supplements
    pub fn builtin() -> Self {
        Self::merge(generated_entries(), curated_entries())
    }

    fn merge(generated: Vec<CatalogEntry>, curated: Vec<CatalogEntry>) -> Self {
        let mut candidates: Vec<CatalogEntry> = Vec::new();
        for entry in generated.into_iter().chain(curated.into_iter()) {
            if candidates
                .iter()
                .any(|c| c.permission_key == entry.permission_key)
            {
                continue;
            }
            candidates.push(entry);
        }
        Self { candidates }
    }

    /// Deduplicated candidates in source order
    pub fn candidates(&self) -> &[CatalogEntry] {
        &self.candidates
    }

    /// Number of candidates
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Whether the source has no candidates
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Entries the route scanner emitted for the current build
fn generated_entries() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry::new("dogs.list.view").with_route_path("/dogs"),
        CatalogEntry::new("dogs.list.export").with_route_path("/dogs/export"),
        CatalogEntry::new("dogs.profile.view").with_route_path("/dogs/{id}"),
        CatalogEntry::new("dogs.profile.edit").with_route_path("/dogs/{id}/edit"),
        CatalogEntry::new("dogs.create").with_route_path("/dogs/new"),
        CatalogEntry::new("dogs.delete").with_route_path("/dogs/{id}/delete"),
        CatalogEntry::new("handlers.list.view").with_route_path("/handlers"),
        CatalogEntry::new("handlers.list.export").with_route_path("/handlers/export"),
        CatalogEntry::new("handlers.profile.view").with_route_path("/handlers/{id}"),
        CatalogEntry::new("handlers.profile.edit").with_route_path("/handlers/{id}/edit"),
        CatalogEntry::new("handlers.create").with_route_path("/handlers/new"),
        CatalogEntry::new("handlers.delete").with_route_path("/handlers/{id}/delete"),
        CatalogEntry::new("training.schedule.view").with_route_path("/training"),
        CatalogEntry::new("training.schedule.edit").with_route_path("/training/schedule"),
        CatalogEntry::new("training.session.create").with_route_path("/training/sessions/new"),
        CatalogEntry::new("veterinary.records.view").with_route_path("/veterinary"),
        CatalogEntry::new("veterinary.records.edit").with_route_path("/veterinary/{id}"),
        CatalogEntry::new("veterinary.vaccinations.view")
            .with_route_path("/veterinary/vaccinations"),
        CatalogEntry::new("veterinary.vaccinations.create")
            .with_route_path("/veterinary/vaccinations/new"),
        CatalogEntry::new("attendance.daily.view").with_route_path("/attendance"),
        CatalogEntry::new("attendance.daily.create").with_route_path("/attendance/check-in"),
        CatalogEntry::new("attendance.monthly.export")
            .with_route_path("/attendance/monthly/export"),
    ]
}

/// Hand-curated keys the route scanner does not cover
fn curated_entries() -> Vec<CatalogEntry> {
    vec![
        // Overlaps the generated list on purpose; the generated entry wins
        CatalogEntry::new("dogs.list.view"),
        CatalogEntry::new("training.assessment.view"),
        CatalogEntry::new("training.assessment.approve"),
        CatalogEntry::new("reports.operations.view"),
        CatalogEntry::new("reports.operations.export"),
        CatalogEntry::new("reports.performance.view"),
        CatalogEntry::new("reports.performance.approve"),
    ]
}
