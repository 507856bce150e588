//! Project API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::api::middleware::{ApiError, AppState};
use crate::models::{CreateProjectInput, UpdateProjectInput};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub featured: Option<bool>,
}

/// GET /api/projects (public)
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let projects = state
        .project_service
        .list(query.featured)
        .await
        .map_err(ApiError::internal_error)?;
    Ok(Json(projects))
}

/// POST /api/projects
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProjectInput>,
) -> Result<impl IntoResponse, ApiError> {
    let project = state
        .project_service
        .create(input)
        .await
        .map_err(|e| ApiError::validation_error(e.to_string()))?;
    Ok(Json(project))
}

/// PUT /api/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateProjectInput>,
) -> Result<impl IntoResponse, ApiError> {
    let project = state
        .project_service
        .update(id, input)
        .await
        .map_err(ApiError::internal_error)?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;
    Ok(Json(project))
}

/// DELETE /api/projects/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .project_service
        .delete(id)
        .await
        .map_err(ApiError::internal_error)?;
    Ok(StatusCode::NO_CONTENT)
}
