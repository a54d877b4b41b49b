//! Pattern config service: CRUD plus the lazy system-default bootstrap.

use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::middleware::tenant::TenantContext;
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::pattern_config::{
    default_preset, CreatePatternConfig, PatternConfig, PlaceholderMap, UpdatePatternConfig,
    SYSTEM_DEFAULT_NOTE,
};
use crate::pattern::parser;

/// List a tenant's live configs, ordered by document type. An optional
/// search term filters on the document type.
pub async fn list(
    pool: &PgPool,
    ctx: &TenantContext,
    pagination: &Pagination,
) -> Result<PagedResult<PatternConfig>, AppError> {
    let (total, items) = match pagination.search_pattern() {
        Some(search) => {
            let total = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM pattern_configs \
                 WHERE tenant_id = $1 AND deleted_at IS NULL AND document_type ILIKE $2",
            )
            .bind(&ctx.tenant_id)
            .bind(&search)
            .fetch_one(pool)
            .await?;

            let items = sqlx::query_as::<_, PatternConfig>(
                "SELECT * FROM pattern_configs \
                 WHERE tenant_id = $1 AND deleted_at IS NULL AND document_type ILIKE $2 \
                 ORDER BY document_type ASC LIMIT $3 OFFSET $4",
            )
            .bind(&ctx.tenant_id)
            .bind(&search)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(pool)
            .await?;
            (total, items)
        }
        None => {
            let total = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM pattern_configs WHERE tenant_id = $1 AND deleted_at IS NULL",
            )
            .bind(&ctx.tenant_id)
            .fetch_one(pool)
            .await?;

            let items = sqlx::query_as::<_, PatternConfig>(
                "SELECT * FROM pattern_configs WHERE tenant_id = $1 AND deleted_at IS NULL \
                 ORDER BY document_type ASC LIMIT $2 OFFSET $3",
            )
            .bind(&ctx.tenant_id)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(pool)
            .await?;
            (total, items)
        }
    };

    Ok(PagedResult::new(items, total, pagination))
}

/// Find a live config by ID within the tenant.
pub async fn find_by_id(
    pool: &PgPool,
    ctx: &TenantContext,
    id: Uuid,
) -> Result<PatternConfig, AppError> {
    sqlx::query_as::<_, PatternConfig>(
        "SELECT * FROM pattern_configs WHERE id = $1 AND tenant_id = $2 AND deleted_at IS NULL",
    )
    .bind(id)
    .bind(&ctx.tenant_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Pattern config not found".to_string()))
}

/// Find a tenant's live config for a document type.
pub async fn find_by_type(
    pool: &PgPool,
    ctx: &TenantContext,
    document_type: &str,
) -> Result<Option<PatternConfig>, AppError> {
    let config = sqlx::query_as::<_, PatternConfig>(
        "SELECT * FROM pattern_configs \
         WHERE tenant_id = $1 AND document_type = $2 AND deleted_at IS NULL",
    )
    .bind(&ctx.tenant_id)
    .bind(document_type)
    .fetch_optional(pool)
    .await?;
    Ok(config)
}

/// Create a config for the tenant.
///
/// The pattern is parsed up front so a malformed format or placeholder spec
/// is rejected at admin-write time instead of at the first generation.
pub async fn create(
    pool: &PgPool,
    ctx: &TenantContext,
    input: &CreatePatternConfig,
) -> Result<PatternConfig, AppError> {
    parser::parse(&input.format, &input.placeholders)?;

    let config = sqlx::query_as::<_, PatternConfig>(
        r#"
        INSERT INTO pattern_configs (tenant_id, document_type, format, placeholders, note, created_by)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(&ctx.tenant_id)
    .bind(&input.document_type)
    .bind(&input.format)
    .bind(Json(&input.placeholders))
    .bind(&input.note)
    .bind(&ctx.user_id)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => AppError::Conflict(
            format!(
                "Pattern config for document type '{}' already exists",
                input.document_type
            ),
        ),
        _ => AppError::Database(e),
    })?;

    Ok(config)
}

/// Update a config by ID. Absent fields keep their stored value; a changed
/// row gets a fresh `updated_at`, which invalidates cached parses.
pub async fn update(
    pool: &PgPool,
    ctx: &TenantContext,
    id: Uuid,
    input: &UpdatePatternConfig,
) -> Result<PatternConfig, AppError> {
    let existing = find_by_id(pool, ctx, id).await?;

    let format = input.format.as_deref().unwrap_or(&existing.format);
    let placeholders: &PlaceholderMap = input
        .placeholders
        .as_ref()
        .unwrap_or(&existing.placeholders.0);
    parser::parse(format, placeholders)?;

    let config = sqlx::query_as::<_, PatternConfig>(
        r#"
        UPDATE pattern_configs SET
            format = $3,
            placeholders = $4,
            note = COALESCE($5, note),
            updated_by = $6,
            updated_at = NOW()
        WHERE id = $1 AND tenant_id = $2
        RETURNING *
        "#,
    )
    .bind(existing.id)
    .bind(&ctx.tenant_id)
    .bind(format)
    .bind(Json(placeholders))
    .bind(&input.note)
    .bind(&ctx.user_id)
    .fetch_one(pool)
    .await?;

    Ok(config)
}

/// Soft-delete a config by ID.
pub async fn delete(pool: &PgPool, ctx: &TenantContext, id: Uuid) -> Result<(), AppError> {
    let existing = find_by_id(pool, ctx, id).await?;

    sqlx::query(
        "UPDATE pattern_configs SET deleted_at = NOW(), updated_by = $3 \
         WHERE id = $1 AND tenant_id = $2",
    )
    .bind(existing.id)
    .bind(&ctx.tenant_id)
    .bind(&ctx.user_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Return the tenant's config for a document type, creating it from the
/// system default preset on first use.
///
/// The insert is idempotent (`ON CONFLICT DO NOTHING` against the live
/// unique index), so two racing bootstraps converge on a single stored
/// config: the loser of the race re-reads the winner's row.
pub async fn get_or_create(
    pool: &PgPool,
    ctx: &TenantContext,
    document_type: &str,
) -> Result<PatternConfig, AppError> {
    if let Some(config) = find_by_type(pool, ctx, document_type).await? {
        return Ok(config);
    }

    let (format, placeholders) = default_preset(document_type);
    tracing::debug!(
        tenant_id = %ctx.tenant_id,
        document_type,
        "bootstrapping pattern config from system default"
    );

    let inserted = sqlx::query_as::<_, PatternConfig>(
        r#"
        INSERT INTO pattern_configs (tenant_id, document_type, format, placeholders, note, created_by)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (tenant_id, document_type) WHERE deleted_at IS NULL DO NOTHING
        RETURNING *
        "#,
    )
    .bind(&ctx.tenant_id)
    .bind(document_type)
    .bind(&format)
    .bind(Json(&placeholders))
    .bind(SYSTEM_DEFAULT_NOTE)
    .bind(&ctx.user_id)
    .fetch_optional(pool)
    .await?;

    match inserted {
        Some(config) => Ok(config),
        // Lost the bootstrap race; the winner's row is authoritative.
        None => find_by_type(pool, ctx, document_type)
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "pattern config bootstrap failed for document type '{document_type}'"
                ))
            }),
    }
}
