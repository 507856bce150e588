//! Blog API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::api::middleware::{ApiError, AppState};
use crate::models::{CreateBlogPostInput, UpdateBlogPostInput};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub published: Option<bool>,
}

/// GET /api/blog (public)
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let posts = state
        .blog_service
        .list(query.published)
        .await
        .map_err(ApiError::internal_error)?;
    Ok(Json(posts))
}

/// GET /api/blog/{id} (public)
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state
        .blog_service
        .get(id)
        .await
        .map_err(ApiError::internal_error)?
        .ok_or_else(|| ApiError::not_found("Blog post not found"))?;
    Ok(Json(post))
}

/// POST /api/blog
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateBlogPostInput>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state
        .blog_service
        .create(input)
        .await
        .map_err(|e| ApiError::validation_error(e.to_string()))?;
    Ok(Json(post))
}

/// PUT /api/blog/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateBlogPostInput>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state
        .blog_service
        .update(id, input)
        .await
        .map_err(ApiError::internal_error)?
        .ok_or_else(|| ApiError::not_found("Blog post not found"))?;
    Ok(Json(post))
}

/// DELETE /api/blog/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .blog_service
        .delete(id)
        .await
        .map_err(ApiError::internal_error)?;
    Ok(StatusCode::NO_CONTENT)
}
