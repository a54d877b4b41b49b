//! Pattern config routes: CRUD over a tenant's code templates.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::tenant::TenantContext;
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::pattern_config::{CreatePatternConfig, PatternConfig, UpdatePatternConfig};
use crate::services::pattern_config as config_service;
use crate::AppState;

/// GET /api/v1/pattern-configs — list the tenant's configs, paginated.
pub async fn list(
    State(state): State<AppState>,
    ctx: TenantContext,
    Query(pagination): Query<Pagination>,
) -> Result<Json<ApiResponse<PagedResult<PatternConfig>>>, AppError> {
    let result = config_service::list(&state.db, &ctx, &pagination).await?;
    Ok(ApiResponse::success(result))
}

/// POST /api/v1/pattern-configs — create a config for the tenant.
pub async fn create(
    State(state): State<AppState>,
    ctx: TenantContext,
    Json(body): Json<CreatePatternConfig>,
) -> Result<Json<ApiResponse<PatternConfig>>, AppError> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let config = config_service::create(&state.db, &ctx, &body).await?;
    Ok(ApiResponse::success(config))
}

/// GET /api/v1/pattern-configs/{id} — get a config by ID.
pub async fn get_by_id(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PatternConfig>>, AppError> {
    let config = config_service::find_by_id(&state.db, &ctx, id).await?;
    Ok(ApiResponse::success(config))
}

/// PUT /api/v1/pattern-configs/{id} — update a config.
pub async fn update(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdatePatternConfig>,
) -> Result<Json<ApiResponse<PatternConfig>>, AppError> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let config = config_service::update(&state.db, &ctx, id, &body).await?;
    Ok(ApiResponse::success(config))
}

/// DELETE /api/v1/pattern-configs/{id} — soft-delete a config.
pub async fn delete(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    config_service::delete(&state.db, &ctx, id).await?;
    Ok(ApiResponse::success(()))
}

/// GET /api/v1/pattern-configs/type/{document_type} — get by document type.
pub async fn get_by_type(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(document_type): Path<String>,
) -> Result<Json<ApiResponse<PatternConfig>>, AppError> {
    let config = config_service::find_by_type(&state.db, &ctx, &document_type)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "No pattern config for document type '{document_type}'"
            ))
        })?;
    Ok(ApiResponse::success(config))
}
