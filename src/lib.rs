pub mod config;
pub mod db;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod pattern;
pub mod routes;
pub mod services;

use sqlx::PgPool;

use pattern::cache::PatternCache;

/// Shared application state passed to all Axum handlers.
///
/// Holds only tenant-agnostic resources. Per-request identity lives in
/// [`middleware::tenant::TenantContext`] and is passed explicitly.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: config::AppConfig,
    pub pattern_cache: PatternCache,
}
