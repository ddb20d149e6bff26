//! Display-name derivation for catalog keys
//!
//! Derived names are composed from three lookup tables keyed by the
//! segments of a dotted permission key: category (first segment),
//! subsection (interior segments, joined), and action (last segment).
//! Unknown tokens fall back to the raw segment text.

use crate::models::PermissionKey;

/// Arabic label for a category token
pub fn category_name(token: &str) -> &str {
    match token {
        "dogs" => "الكلاب",
        "handlers" => "المدربون",
        "training" => "التدريب",
        "veterinary" => "الرعاية البيطرية",
        "attendance" => "الحضور والانصراف",
        "reports" => "التقارير",
        "projects" => "المشاريع",
        "users" => "المستخدمون",
        other => other,
    }
}

/// Arabic label for an action token
pub fn action_name(token: &str) -> &str {
    match token {
        "view" => "عرض",
        "create" => "إضافة",
        "edit" => "تعديل",
        "delete" => "حذف",
        "export" => "تصدير",
        "approve" => "اعتماد",
        other => other,
    }
}

/// Arabic label for a subsection token, falling back to the raw token
pub fn subsection_name(token: &str) -> &str {
    match token {
        "list" => "القائمة",
        "profile" => "الملف",
        "details" => "التفاصيل",
        "schedule" => "الجدول",
        "session" => "الجلسات",
        "assessment" => "التقييم",
        "records" => "السجلات",
        "vaccinations" => "التطعيمات",
        "daily" => "اليومي",
        "monthly" => "الشهري",
        "operations" => "العمليات",
        "performance" => "الأداء",
        other => other,
    }
}

/// Derive the display name for a key
///
/// Composes "{category} - {subsection} - {action}"; the subsection clause
/// is omitted for two-segment keys.
pub fn derive_display_name(key: &PermissionKey) -> String {
    let category = category_name(key.category());
    let action = action_name(key.action_token());
    let subsection_token = key.subsection_token();
    if subsection_token.is_empty() {
        format!("{} - {}", category, action)
    } else {
        format!(
            "{} - {} - {}",
            category,
            subsection_name(&subsection_token),
            action
        )
    }
}
