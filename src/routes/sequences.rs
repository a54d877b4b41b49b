//! Sequence allocation route.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::tenant::TenantContext;
use crate::services::sequence;
use crate::AppState;

/// Request body for a direct allocation.
#[derive(Debug, Deserialize, Validate)]
pub struct AllocateRequest {
    #[validate(length(min = 1, max = 32))]
    pub document_type: String,
    #[validate(length(min = 1))]
    pub period_prefix: String,
    #[validate(range(min = 1, max = 18))]
    pub width: u32,
}

/// Response body: the issued running number.
#[derive(Debug, Serialize)]
pub struct AllocateResponse {
    pub allocated_no: i64,
}

/// POST /api/v1/sequences/allocate — issue the next running number for a
/// (tenant, document type, period) key.
pub async fn allocate(
    State(state): State<AppState>,
    ctx: TenantContext,
    Json(body): Json<AllocateRequest>,
) -> Result<Json<ApiResponse<AllocateResponse>>, AppError> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let allocation = sequence::allocate(
        &state.db,
        &ctx.tenant_id,
        &body.document_type,
        &body.period_prefix,
        body.width,
    )
    .await?;

    Ok(ApiResponse::success(AllocateResponse {
        allocated_no: allocation.no,
    }))
}
