//! Running-code generation route.

use axum::{extract::State, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::tenant::TenantContext;
use crate::services::running_code;
use crate::AppState;

/// Request body for code generation.
#[derive(Debug, Deserialize, Validate)]
pub struct GenerateRequest {
    #[validate(length(min = 1, max = 32))]
    pub document_type: String,
    /// Date the owning document is issued on; feeds `date('...')` segments.
    pub issue_date: NaiveDate,
}

/// Response body: the generated code.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub code: String,
}

/// POST /api/v1/running-codes/generate — generate the next document code.
pub async fn generate(
    State(state): State<AppState>,
    ctx: TenantContext,
    Json(body): Json<GenerateRequest>,
) -> Result<Json<ApiResponse<GenerateResponse>>, AppError> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let code = running_code::generate_code(
        &state.db,
        &state.pattern_cache,
        &ctx,
        &body.document_type,
        body.issue_date,
    )
    .await?;

    Ok(ApiResponse::success(GenerateResponse { code }))
}
