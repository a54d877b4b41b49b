//! Pattern config model: tenant- and type-scoped code templates.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Placeholder key → spec string (`"date('yyyyMM')"`, `"running(5,'0')"`, …).
pub type PlaceholderMap = BTreeMap<String, String>;

/// A stored pattern config. `updated_at` doubles as the config version for
/// the parse cache; `deleted_at` implements soft delete.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PatternConfig {
    pub id: Uuid,
    pub tenant_id: String,
    pub document_type: String,
    pub format: String,
    pub placeholders: Json<PlaceholderMap>,
    pub note: Option<String>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Request body for creating a pattern config.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePatternConfig {
    #[validate(length(min = 1, max = 32))]
    pub document_type: String,
    #[validate(length(min = 1))]
    pub format: String,
    pub placeholders: PlaceholderMap,
    pub note: Option<String>,
}

/// Request body for updating a pattern config. Absent fields are kept.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePatternConfig {
    #[validate(length(min = 1))]
    pub format: Option<String>,
    pub placeholders: Option<PlaceholderMap>,
    pub note: Option<String>,
}

/// Note stamped on configs the system bootstraps itself.
pub const SYSTEM_DEFAULT_NOTE: &str = "initialized by system default.";

/// System default pattern applied when a tenant has no config for a
/// document type: `<TYPE>-<yyyyMM>-<5-digit running number>`, e.g.
/// `PR-202403-00042`.
pub fn default_preset(document_type: &str) -> (String, PlaceholderMap) {
    let mut placeholders = PlaceholderMap::new();
    placeholders.insert("A".to_string(), document_type.to_string());
    placeholders.insert("B".to_string(), "date('yyyyMM')".to_string());
    placeholders.insert("C".to_string(), "running(5,'0')".to_string());
    ("{A}-{B}-{C}".to_string(), placeholders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{parser, render};
    use chrono::NaiveDate;

    #[test]
    fn default_preset_parses_and_renders() {
        let (format, placeholders) = default_preset("PR");
        let pattern = parser::parse(&format, &placeholders).unwrap();
        let issue = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let code = render::render_code(&pattern, issue, issue, 41).unwrap();
        assert_eq!(code, "PR-202403-00042");
    }

    #[test]
    fn default_preset_running_width() {
        let (format, placeholders) = default_preset("GRN");
        let pattern = parser::parse(&format, &placeholders).unwrap();
        assert_eq!(pattern.running().unwrap(), (5, '0'));
    }
}
