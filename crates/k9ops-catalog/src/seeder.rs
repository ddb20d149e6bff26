//! Catalog seeder
//!
//! Idempotent, additive bootstrap of the permission catalog. Runs once
//! at process start as a synchronous barrier; no permission check may be
//! served before it completes.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::PermissionCatalog;
use crate::error::{Error, Result};
use crate::models::PermissionKey;
use crate::naming::derive_display_name;
use crate::source::CatalogSource;

/// Outcome of one seeding pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedReport {
    /// Candidates inserted this pass
    pub added: usize,
    /// Candidates whose key already existed in the live catalog
    pub skipped: usize,
    /// Catalog rows after the pass, active and inactive
    pub total: usize,
}

impl std::fmt::Display for SeedReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "added={} skipped={} total={}",
            self.added, self.skipped, self.total
        )
    }
}

/// Seeds the permission catalog from a catalog source
pub struct CatalogSeeder;

impl CatalogSeeder {
    /// Apply every candidate in the source to the catalog
    ///
    /// Existing rows are skipped untouched; absent keys are inserted with
    /// a derived display name and the next sort order. A second pass with
    /// the same source adds nothing. Leaving the catalog empty after the
    /// pass is a fatal startup condition.
    pub fn seed(catalog: &PermissionCatalog, source: &CatalogSource) -> Result<SeedReport> {
        let mut added = 0;
        let mut skipped = 0;

        for entry in source.candidates() {
            let key = PermissionKey::parse(&entry.permission_key)?;
            let display_name = derive_display_name(&key);
            if catalog.insert_if_absent(key.as_str(), &display_name) {
                added += 1;
            } else {
                skipped += 1;
            }
        }

        if catalog.is_empty() {
            return Err(Error::EmptyCatalog);
        }

        let report = SeedReport {
            added,
            skipped,
            total: catalog.len(),
        };
        info!(
            added = report.added,
            skipped = report.skipped,
            total = report.total,
            "seeded permission catalog"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PermissionDefinition;
    use crate::source::CatalogEntry;

    fn source_of(keys: &[&str]) -> CatalogSource {
        let entries = keys.iter().map(|k| CatalogEntry::new(*k)).collect();
        CatalogSource::new(entries, Vec::new()).unwrap()
    }

    #[test]
    fn test_seed_into_empty_catalog() {
        let catalog = PermissionCatalog::new();
        let source = source_of(&["dogs.list.view", "dogs.create", "reports.export"]);

        let report = CatalogSeeder::seed(&catalog, &source).unwrap();

        assert_eq!(report.added, 3);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.total, 3);
    }

    #[test]
    fn test_seed_is_idempotent() {
        let catalog = PermissionCatalog::new();
        let source = source_of(&["dogs.list.view", "dogs.create"]);

        let first = CatalogSeeder::seed(&catalog, &source).unwrap();
        let second = CatalogSeeder::seed(&catalog, &source).unwrap();

        assert_eq!(first.added, 2);
        assert_eq!(second.added, 0);
        assert_eq!(second.skipped, 2);
        assert_eq!(second.total, first.total);
    }

    #[test]
    fn test_seed_counts_with_partially_populated_catalog() {
        // Live catalog already holds 3 of the 5 supplied keys
        let catalog = PermissionCatalog::with_definitions(vec![
            PermissionDefinition::new("dogs.list.view".to_string(), "a".to_string(), 1),
            PermissionDefinition::new("dogs.create".to_string(), "b".to_string(), 2),
            PermissionDefinition::new("dogs.delete".to_string(), "c".to_string(), 3),
        ]);
        let source = source_of(&[
            "dogs.list.view",
            "dogs.create",
            "dogs.delete",
            "handlers.list.view",
            "reports.export",
        ]);

        let report = CatalogSeeder::seed(&catalog, &source).unwrap();

        assert_eq!(report.added, 2);
        assert_eq!(report.skipped, 3);
        assert_eq!(report.total, 5);
    }

    #[test]
    fn test_seed_derives_display_names() {
        let catalog = PermissionCatalog::new();
        let source = source_of(&["dogs.list.view", "reports.export"]);

        CatalogSeeder::seed(&catalog, &source).unwrap();

        assert_eq!(
            catalog.get("dogs.list.view").unwrap().display_name,
            "الكلاب - القائمة - عرض"
        );
        assert_eq!(
            catalog.get("reports.export").unwrap().display_name,
            "التقارير - تصدير"
        );
    }

    #[test]
    fn test_seed_never_overwrites_curated_metadata() {
        let curated = PermissionDefinition::new(
            "dogs.list.view".to_string(),
            "اسم يدوي".to_string(),
            42,
        );
        let catalog = PermissionCatalog::with_definitions(vec![curated]);
        let source = source_of(&["dogs.list.view"]);

        CatalogSeeder::seed(&catalog, &source).unwrap();

        let def = catalog.get("dogs.list.view").unwrap();
        assert_eq!(def.display_name, "اسم يدوي");
        assert_eq!(def.sort_order, 42);
    }

    #[test]
    fn test_seed_empty_catalog_is_fatal() {
        let catalog = PermissionCatalog::new();
        let source = CatalogSource::new(Vec::new(), Vec::new()).unwrap();

        let result = CatalogSeeder::seed(&catalog, &source);

        assert!(matches!(result, Err(Error::EmptyCatalog)));
    }

    #[test]
    fn test_seed_empty_source_over_populated_catalog_is_fine() {
        let catalog = PermissionCatalog::with_definitions(vec![PermissionDefinition::new(
            "dogs.create".to_string(),
            "x".to_string(),
            1,
        )]);
        let source = CatalogSource::new(Vec::new(), Vec::new()).unwrap();

        let report = CatalogSeeder::seed(&catalog, &source).unwrap();

        assert_eq!(report.added, 0);
        assert_eq!(report.total, 1);
    }

    #[test]
    fn test_seed_builtin_source() {
        let catalog = PermissionCatalog::new();
        let report = CatalogSeeder::seed(&catalog, &CatalogSource::builtin()).unwrap();

        assert!(report.added > 0);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.total, report.added);
    }

    #[test]
    fn test_seed_report_display() {
        let report = SeedReport {
            added: 2,
            skipped: 3,
            total: 5,
        };
        assert_eq!(report.to_string(), "added=2 skipped=3 total=5");
    }

    #[test]
    fn test_seed_report_serialization() {
        let report = SeedReport {
            added: 1,
            skipped: 0,
            total: 1,
        };
        let json = serde_json::to_string(&report).unwrap();
        let back: SeedReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
