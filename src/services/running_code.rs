//! Running-code orchestrator: config bootstrap → parse → allocate → render.

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;

use crate::errors::AppError;
use crate::middleware::tenant::TenantContext;
use crate::pattern::cache::PatternCache;
use crate::pattern::render;
use crate::services::{pattern_config, sequence};

/// Generate the next code for a document of `document_type` issued on
/// `issue_date`.
///
/// The caller persists the owning document with the returned code. If that
/// insert still hits a uniqueness conflict (legacy rows predating the
/// counter), the caller maps it to `AppError::DuplicateCode` and retries the
/// whole generate+insert cycle once; the allocation consumed here is not
/// reused.
pub async fn generate_code(
    pool: &PgPool,
    cache: &PatternCache,
    ctx: &TenantContext,
    document_type: &str,
    issue_date: NaiveDate,
) -> Result<String, AppError> {
    tracing::debug!(
        tenant_id = %ctx.tenant_id,
        user_id = %ctx.user_id,
        document_type,
        %issue_date,
        "generating running code"
    );

    let config = pattern_config::get_or_create(pool, ctx, document_type).await?;
    let pattern = cache.get_or_parse(&config)?;

    let today = Utc::now().date_naive();
    let (width, _) = pattern.running()?;
    let period_prefix = render::period_prefix(&pattern, issue_date, today);

    let allocation = sequence::allocate(
        pool,
        &ctx.tenant_id,
        document_type,
        &period_prefix,
        width,
    )
    .await?;

    // Random segments are drawn in this one render; the code is returned
    // as-is and never re-derived for the same allocation.
    let code = render::render_code(&pattern, issue_date, today, allocation.last_no)?;

    tracing::debug!(
        tenant_id = %ctx.tenant_id,
        document_type,
        period_prefix,
        no = allocation.no,
        code,
        "issued running code"
    );

    Ok(code)
}
