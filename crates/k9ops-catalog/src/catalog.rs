//! Live permission catalog
//!
//! Keyed registry of permission definitions. Rows are created once at
//! seed time and never deleted; deactivation hides a row from listings
//! while keeping it resolvable.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::models::PermissionDefinition;

struct CatalogInner {
    definitions: HashMap<String, PermissionDefinition>,
    next_sort: u32,
}

/// The live catalog of permission definitions
pub struct PermissionCatalog {
    inner: RwLock<CatalogInner>,
}

impl PermissionCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(CatalogInner {
                definitions: HashMap::new(),
                next_sort: 1,
            }),
        }
    }

    /// Create a catalog pre-populated with existing definitions
    pub fn with_definitions(definitions: Vec<PermissionDefinition>) -> Self {
        let next_sort = definitions
            .iter()
            .map(|d| d.sort_order)
            .max()
            .map(|max| max + 1)
            .unwrap_or(1);
        let definitions = definitions
            .into_iter()
            .map(|d| (d.key.clone(), d))
            .collect();
        Self {
            inner: RwLock::new(CatalogInner {
                definitions,
                next_sort,
            }),
        }
    }

    /// Insert a definition unless the key already exists
    ///
    /// Existing rows are never touched, so curated metadata survives
    /// re-seeding. Returns true if a row was inserted.
    pub fn insert_if_absent(&self, key: &str, display_name: &str) -> bool {
        let mut inner = self.inner.write();
        if inner.definitions.contains_key(key) {
            return false;
        }
        let sort_order = inner.next_sort;
        inner.next_sort += 1;
        inner.definitions.insert(
            key.to_string(),
            PermissionDefinition::new(key.to_string(), display_name.to_string(), sort_order),
        );
        true
    }

    /// Look up a definition by key, active or not
    pub fn get(&self, key: &str) -> Option<PermissionDefinition> {
        self.inner.read().definitions.get(key).cloned()
    }

    /// Whether a key exists, active or not
    pub fn contains(&self, key: &str) -> bool {
        self.inner.read().definitions.contains_key(key)
    }

    /// Active definitions sorted by sort order
    pub fn definitions(&self) -> Vec<PermissionDefinition> {
        let inner = self.inner.read();
        let mut defs: Vec<PermissionDefinition> = inner
            .definitions
            .values()
            .filter(|d| d.active)
            .cloned()
            .collect();
        defs.sort_by_key(|d| d.sort_order);
        defs
    }

    /// Deactivate a definition; returns false if the key is unknown
    ///
    /// Definitions are never deleted, so grants referencing a
    /// deactivated key keep resolving.
    pub fn deactivate(&self, key: &str) -> bool {
        let mut inner = self.inner.write();
        match inner.definitions.get_mut(key) {
            Some(def) => {
                def.active = false;
                true
            }
            None => false,
        }
    }

    /// Total number of rows, active and inactive
    pub fn len(&self) -> usize {
        self.inner.read().definitions.len()
    }

    /// Whether the catalog holds no rows
    pub fn is_empty(&self) -> bool {
        self.inner.read().definitions.is_empty()
    }
}

impl Default for PermissionCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_if_absent() {
        let catalog = PermissionCatalog::new();

        assert!(catalog.insert_if_absent("dogs.list.view", "الكلاب - القائمة - عرض"));
        assert!(!catalog.insert_if_absent("dogs.list.view", "مكرر"));

        assert_eq!(catalog.len(), 1);
        let def = catalog.get("dogs.list.view").unwrap();
        assert_eq!(def.display_name, "الكلاب - القائمة - عرض");
    }

    #[test]
    fn test_existing_row_is_never_overwritten() {
        let existing = PermissionDefinition::new(
            "dogs.list.view".to_string(),
            "اسم مخصص".to_string(),
            7,
        );
        let catalog = PermissionCatalog::with_definitions(vec![existing]);

        assert!(!catalog.insert_if_absent("dogs.list.view", "اسم مشتق"));

        let def = catalog.get("dogs.list.view").unwrap();
        assert_eq!(def.display_name, "اسم مخصص");
        assert_eq!(def.sort_order, 7);
    }

    #[test]
    fn test_sort_order_continues_after_existing_rows() {
        let existing = PermissionDefinition::new("dogs.create".to_string(), "x".to_string(), 5);
        let catalog = PermissionCatalog::with_definitions(vec![existing]);

        catalog.insert_if_absent("dogs.delete", "y");

        assert_eq!(catalog.get("dogs.delete").unwrap().sort_order, 6);
    }

    #[test]
    fn test_definitions_sorted_by_sort_order() {
        let catalog = PermissionCatalog::new();
        catalog.insert_if_absent("a.view", "1");
        catalog.insert_if_absent("b.view", "2");
        catalog.insert_if_absent("c.view", "3");

        let defs = catalog.definitions();
        let orders: Vec<u32> = defs.iter().map(|d| d.sort_order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
    }

    #[test]
    fn test_deactivate_hides_from_listing_but_stays_resolvable() {
        let catalog = PermissionCatalog::new();
        catalog.insert_if_absent("dogs.list.view", "x");
        catalog.insert_if_absent("dogs.create", "y");

        assert!(catalog.deactivate("dogs.list.view"));

        assert_eq!(catalog.definitions().len(), 1);
        assert!(catalog.contains("dogs.list.view"));
        assert_eq!(catalog.len(), 2);
        assert!(!catalog.get("dogs.list.view").unwrap().active);
    }

    #[test]
    fn test_deactivate_unknown_key() {
        let catalog = PermissionCatalog::new();
        assert!(!catalog.deactivate("missing.view"));
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = PermissionCatalog::new();
        assert!(catalog.is_empty());
        assert_eq!(catalog.len(), 0);
        assert!(catalog.get("dogs.list.view").is_none());
    }
}
