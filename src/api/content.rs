//! Content section API endpoints

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};

use crate::api::middleware::{ApiError, AppState};
use crate::models::UpsertContentSectionInput;

/// GET /api/content/{section_key} (public)
pub async fn get(
    State(state): State<AppState>,
    Path(section_key): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let section = state
        .content_service
        .get(&section_key)
        .await
        .map_err(ApiError::internal_error)?
        .ok_or_else(|| ApiError::not_found("Section not found"))?;
    Ok(Json(section))
}

/// PUT /api/content/{section_key}
pub async fn upsert(
    State(state): State<AppState>,
    Path(section_key): Path<String>,
    Json(input): Json<UpsertContentSectionInput>,
) -> Result<impl IntoResponse, ApiError> {
    let section = state
        .content_service
        .upsert(&section_key, input)
        .await
        .map_err(ApiError::internal_error)?;
    Ok(Json(section))
}
