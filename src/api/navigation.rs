//! Navigation API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::api::middleware::{ApiError, AppState};
use crate::models::{CreateNavigationItemInput, UpdateNavigationItemInput};

/// GET /api/navigation (public)
pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let items = state
        .navigation_service
        .list()
        .await
        .map_err(ApiError::internal_error)?;
    Ok(Json(items))
}

/// POST /api/navigation
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateNavigationItemInput>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state
        .navigation_service
        .create(input)
        .await
        .map_err(|e| ApiError::validation_error(e.to_string()))?;
    Ok(Json(item))
}

/// PUT /api/navigation/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateNavigationItemInput>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state
        .navigation_service
        .update(id, input)
        .await
        .map_err(ApiError::internal_error)?
        .ok_or_else(|| ApiError::not_found("Navigation item not found"))?;
    Ok(Json(item))
}

/// DELETE /api/navigation/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .navigation_service
        .delete(id)
        .await
        .map_err(ApiError::internal_error)?;
    Ok(StatusCode::NO_CONTENT)
}
