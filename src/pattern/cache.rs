//! Parsed-pattern cache keyed by config version.
//!
//! Token lists are derived data: parsing is deterministic, so a parse is
//! valid as long as the config row it came from is unchanged. The config's
//! `updated_at` timestamp serves as the version; a cached entry is discarded
//! the moment the stored version differs.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use crate::errors::AppError;
use crate::models::pattern_config::PatternConfig;
use crate::pattern::parser;
use crate::pattern::token::ParsedPattern;

#[derive(Debug)]
struct CachedPattern {
    version: DateTime<Utc>,
    pattern: Arc<ParsedPattern>,
}

/// Process-wide cache of parsed patterns, keyed by (tenant, document type).
///
/// Only derived data lives here, never counters or other authoritative
/// state. A stale entry can at worst cause one redundant parse, never a
/// wrong code.
#[derive(Debug, Clone, Default)]
pub struct PatternCache {
    inner: Arc<RwLock<HashMap<(String, String), CachedPattern>>>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the parsed pattern for a config, parsing on miss or version
    /// change.
    pub fn get_or_parse(&self, config: &PatternConfig) -> Result<Arc<ParsedPattern>, AppError> {
        let key = (config.tenant_id.clone(), config.document_type.clone());

        {
            let map = self.inner.read().unwrap_or_else(|e| e.into_inner());
            if let Some(hit) = map.get(&key) {
                if hit.version == config.updated_at {
                    return Ok(Arc::clone(&hit.pattern));
                }
            }
        }

        let pattern = Arc::new(parser::parse(&config.format, &config.placeholders.0)?);
        let mut map = self.inner.write().unwrap_or_else(|e| e.into_inner());
        map.insert(
            key,
            CachedPattern {
                version: config.updated_at,
                pattern: Arc::clone(&pattern),
            },
        );
        Ok(pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::pattern_config::default_preset;
    use sqlx::types::Json;
    use uuid::Uuid;

    fn config_at(version: DateTime<Utc>, format: &str) -> PatternConfig {
        let (_, placeholders) = default_preset("PR");
        PatternConfig {
            id: Uuid::new_v4(),
            tenant_id: "A01".to_string(),
            document_type: "PR".to_string(),
            format: format.to_string(),
            placeholders: Json(placeholders),
            note: None,
            created_by: None,
            updated_by: None,
            created_at: version,
            updated_at: version,
            deleted_at: None,
        }
    }

    #[test]
    fn same_version_hits_cache() {
        let cache = PatternCache::new();
        let config = config_at(Utc::now(), "{A}-{B}-{C}");

        let first = cache.get_or_parse(&config).unwrap();
        let second = cache.get_or_parse(&config).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn version_change_reparses() {
        let cache = PatternCache::new();
        let old = config_at(Utc::now(), "{A}-{B}-{C}");
        let first = cache.get_or_parse(&old).unwrap();

        let mut updated = config_at(Utc::now() + chrono::Duration::seconds(1), "{A}{B}{C}");
        updated.tenant_id = old.tenant_id.clone();
        let second = cache.get_or_parse(&updated).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_ne!(*first, *second);
    }

    #[test]
    fn bad_config_propagates_parse_error() {
        let cache = PatternCache::new();
        let config = config_at(Utc::now(), "{MISSING}");
        assert!(matches!(
            cache.get_or_parse(&config),
            Err(AppError::InvalidPattern(_))
        ));
    }
}
