//! Declared capability structure
//!
//! The immutable section -> subsection -> action registry. Mutation
//! validates capability triples against it and matrix building iterates
//! it. Loaded once, never mutated at runtime.

use once_cell::sync::Lazy;

use crate::models::PermissionAction;

/// One subsection and the actions declared on it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredSubsection {
    /// Arabic display label identifying the subsection in grants
    pub label: &'static str,
    /// Actions declared for this subsection
    pub actions: &'static [PermissionAction],
}

/// One section and its declared subsections
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredSection {
    /// Section name identifying the section in grants
    pub name: &'static str,
    /// Declared subsections in display order
    pub subsections: Vec<DeclaredSubsection>,
}

impl DeclaredSection {
    /// Iterate every (subsection, action) pair declared for this section
    pub fn pairs(&self) -> impl Iterator<Item = (&'static str, PermissionAction)> + '_ {
        self.subsections.iter().flat_map(|sub| {
            sub.actions
                .iter()
                .map(move |action| (sub.label, *action))
        })
    }

    /// Number of declared (subsection, action) pairs
    pub fn pair_count(&self) -> usize {
        self.subsections.iter().map(|sub| sub.actions.len()).sum()
    }
}

use PermissionAction::{Approve, Create, Delete, Edit, Export, View};

static DECLARED_STRUCTURE: Lazy<Vec<DeclaredSection>> = Lazy::new(|| {
    vec![
        DeclaredSection {
            name: "Dogs",
            subsections: vec![
                DeclaredSubsection {
                    label: "عرض قائمة الكلاب",
                    actions: &[View, Export],
                },
                DeclaredSubsection {
                    label: "ملف الكلب",
                    actions: &[View, Edit],
                },
                DeclaredSubsection {
                    label: "إضافة كلب",
                    actions: &[Create],
                },
                DeclaredSubsection {
                    label: "حذف كلب",
                    actions: &[Delete],
                },
            ],
        },
        DeclaredSection {
            name: "Handlers",
            subsections: vec![
                DeclaredSubsection {
                    label: "عرض قائمة المدربين",
                    actions: &[View, Export],
                },
                DeclaredSubsection {
                    label: "ملف المدرب",
                    actions: &[View, Edit],
                },
                DeclaredSubsection {
                    label: "إضافة مدرب",
                    actions: &[Create],
                },
                DeclaredSubsection {
                    label: "حذف مدرب",
                    actions: &[Delete],
                },
            ],
        },
        DeclaredSection {
            name: "Training",
            subsections: vec![
                DeclaredSubsection {
                    label: "جدول التدريب",
                    actions: &[View, Edit],
                },
                DeclaredSubsection {
                    label: "تسجيل جلسة تدريب",
                    actions: &[Create],
                },
                DeclaredSubsection {
                    label: "تقييم الأداء",
                    actions: &[View, Approve],
                },
            ],
        },
        DeclaredSection {
            name: "Veterinary",
            subsections: vec![
                DeclaredSubsection {
                    label: "السجل الطبي",
                    actions: &[View, Edit],
                },
                DeclaredSubsection {
                    label: "التطعيمات",
                    actions: &[View, Create],
                },
                DeclaredSubsection {
                    label: "تقرير الحالة",
                    actions: &[Create, Approve],
                },
            ],
        },
        DeclaredSection {
            name: "Attendance",
            subsections: vec![
                DeclaredSubsection {
                    label: "التحضير اليومي",
                    actions: &[View, Create, Edit],
                },
                DeclaredSubsection {
                    label: "تقرير الحضور الشهري",
                    actions: &[View, Export],
                },
            ],
        },
        DeclaredSection {
            name: "Reports",
            subsections: vec![
                DeclaredSubsection {
                    label: "التقارير التشغيلية",
                    actions: &[View, Export],
                },
                DeclaredSubsection {
                    label: "تقارير الأداء",
                    actions: &[View, Export, Approve],
                },
            ],
        },
    ]
});

/// View-only capabilities granted globally to newly provisioned subjects
const DEFAULT_VIEW_SET: &[(&str, &str, PermissionAction)] = &[
    ("Dogs", "عرض قائمة الكلاب", View),
    ("Handlers", "عرض قائمة المدربين", View),
    ("Training", "جدول التدريب", View),
    ("Attendance", "التحضير اليومي", View),
];

/// All declared sections, in display order
pub fn sections() -> &'static [DeclaredSection] {
    &DECLARED_STRUCTURE
}

/// Look up a section by name
pub fn section(name: &str) -> Option<&'static DeclaredSection> {
    DECLARED_STRUCTURE.iter().find(|s| s.name == name)
}

/// Whether a capability triple is declared
pub fn contains(section_name: &str, subsection: &str, action: PermissionAction) -> bool {
    section(section_name)
        .map(|s| {
            s.subsections
                .iter()
                .any(|sub| sub.label == subsection && sub.actions.contains(&action))
        })
        .unwrap_or(false)
}

/// The default view-only allow-list for newly provisioned subjects
pub fn default_view_set() -> &'static [(&'static str, &'static str, PermissionAction)] {
    DEFAULT_VIEW_SET
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structure_is_not_empty() {
        assert!(!sections().is_empty());
        for section in sections() {
            assert!(!section.subsections.is_empty());
            for sub in &section.subsections {
                assert!(!sub.actions.is_empty());
            }
        }
    }

    #[test]
    fn test_contains_declared_triple() {
        assert!(contains("Dogs", "عرض قائمة الكلاب", PermissionAction::View));
        assert!(contains("Dogs", "حذف كلب", PermissionAction::Delete));
        assert!(contains("Reports", "تقارير الأداء", PermissionAction::Approve));
    }

    #[test]
    fn test_contains_rejects_undeclared_triple() {
        // Declared subsection, undeclared action
        assert!(!contains("Dogs", "حذف كلب", PermissionAction::View));
        // Unknown subsection
        assert!(!contains("Dogs", "nonexistent", PermissionAction::View));
        // Unknown section
        assert!(!contains("Armory", "عرض قائمة الكلاب", PermissionAction::View));
    }

    #[test]
    fn test_section_lookup() {
        assert!(section("Dogs").is_some());
        assert!(section("dogs").is_none());
        assert!(section("").is_none());
    }

    #[test]
    fn test_section_pairs_match_pair_count() {
        for section in sections() {
            assert_eq!(section.pairs().count(), section.pair_count());
        }
    }

    #[test]
    fn test_default_view_set_is_declared_and_view_only() {
        for (section_name, subsection, action) in default_view_set() {
            assert_eq!(*action, PermissionAction::View);
            assert!(contains(section_name, subsection, *action));
        }
    }

    #[test]
    fn test_default_view_set_excludes_destructive_capabilities() {
        let has_delete = default_view_set()
            .iter()
            .any(|(_, _, action)| *action == PermissionAction::Delete);
        assert!(!has_delete);
    }
}
