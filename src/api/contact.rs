//! Contact API endpoints
//!
//! The submit endpoint is public; the inbox endpoints sit behind the auth
//! middleware.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::api::middleware::{ApiError, AppState};
use crate::models::CreateContactMessageInput;

/// POST /api/contact (public)
pub async fn submit(
    State(state): State<AppState>,
    Json(input): Json<CreateContactMessageInput>,
) -> Result<impl IntoResponse, ApiError> {
    let message = state
        .contact_service
        .submit(input)
        .await
        .map_err(|e| ApiError::validation_error(e.to_string()))?;
    Ok(Json(message))
}

/// GET /api/contact/messages
pub async fn list_messages(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let messages = state
        .contact_service
        .list()
        .await
        .map_err(ApiError::internal_error)?;
    Ok(Json(messages))
}

/// PUT /api/contact/messages/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let message = state
        .contact_service
        .mark_read(id)
        .await
        .map_err(ApiError::internal_error)?
        .ok_or_else(|| ApiError::not_found("Message not found"))?;
    Ok(Json(message))
}

/// DELETE /api/contact/messages/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .contact_service
        .delete(id)
        .await
        .map_err(ApiError::internal_error)?;
    Ok(StatusCode::NO_CONTENT)
}
