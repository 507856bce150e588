//! Profile API endpoints

use axum::{extract::State, response::IntoResponse, Json};

use crate::api::middleware::{ApiError, AppState};
use crate::models::UpsertProfileInput;

/// GET /api/profile (public)
pub async fn get(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let profile = state
        .profile_service
        .get()
        .await
        .map_err(ApiError::internal_error)?
        .ok_or_else(|| ApiError::not_found("Profile not found"))?;
    Ok(Json(profile))
}

/// PUT /api/profile
pub async fn upsert(
    State(state): State<AppState>,
    Json(input): Json<UpsertProfileInput>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state
        .profile_service
        .upsert(input)
        .await
        .map_err(|e| ApiError::validation_error(e.to_string()))?;
    Ok(Json(profile))
}
