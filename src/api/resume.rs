//! Resume API endpoints: experiences, education, skills

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::api::middleware::{ApiError, AppState};
use crate::models::{
    CreateEducationInput, CreateExperienceInput, CreateSkillCategoryInput, CreateSkillInput,
    UpdateEducationInput, UpdateExperienceInput, UpdateSkillCategoryInput, UpdateSkillInput,
};

// ------------------------------------------------------------------
// Experiences
// ------------------------------------------------------------------

/// GET /api/experience (public)
pub async fn list_experiences(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let experiences = state
        .resume_service
        .list_experiences()
        .await
        .map_err(ApiError::internal_error)?;
    Ok(Json(experiences))
}

/// POST /api/experience
pub async fn create_experience(
    State(state): State<AppState>,
    Json(input): Json<CreateExperienceInput>,
) -> Result<impl IntoResponse, ApiError> {
    let experience = state
        .resume_service
        .create_experience(input)
        .await
        .map_err(|e| ApiError::validation_error(e.to_string()))?;
    Ok(Json(experience))
}

/// PUT /api/experience/{id}
pub async fn update_experience(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateExperienceInput>,
) -> Result<impl IntoResponse, ApiError> {
    let experience = state
        .resume_service
        .update_experience(id, input)
        .await
        .map_err(ApiError::internal_error)?
        .ok_or_else(|| ApiError::not_found("Experience not found"))?;
    Ok(Json(experience))
}

/// DELETE /api/experience/{id}
pub async fn delete_experience(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .resume_service
        .delete_experience(id)
        .await
        .map_err(ApiError::internal_error)?;
    Ok(StatusCode::NO_CONTENT)
}

// ------------------------------------------------------------------
// Education
// ------------------------------------------------------------------

/// GET /api/education (public)
pub async fn list_education(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let education = state
        .resume_service
        .list_education()
        .await
        .map_err(ApiError::internal_error)?;
    Ok(Json(education))
}

/// POST /api/education
pub async fn create_education(
    State(state): State<AppState>,
    Json(input): Json<CreateEducationInput>,
) -> Result<impl IntoResponse, ApiError> {
    let education = state
        .resume_service
        .create_education(input)
        .await
        .map_err(|e| ApiError::validation_error(e.to_string()))?;
    Ok(Json(education))
}

/// PUT /api/education/{id}
pub async fn update_education(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateEducationInput>,
) -> Result<impl IntoResponse, ApiError> {
    let education = state
        .resume_service
        .update_education(id, input)
        .await
        .map_err(ApiError::internal_error)?
        .ok_or_else(|| ApiError::not_found("Education entry not found"))?;
    Ok(Json(education))
}

/// DELETE /api/education/{id}
pub async fn delete_education(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .resume_service
        .delete_education(id)
        .await
        .map_err(ApiError::internal_error)?;
    Ok(StatusCode::NO_CONTENT)
}

// ------------------------------------------------------------------
// Skills
// ------------------------------------------------------------------

/// GET /api/skills (public) - categories with nested skills
pub async fn list_skills(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let skills = state
        .resume_service
        .list_skills()
        .await
        .map_err(ApiError::internal_error)?;
    Ok(Json(skills))
}

/// POST /api/skills/categories
pub async fn create_skill_category(
    State(state): State<AppState>,
    Json(input): Json<CreateSkillCategoryInput>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state
        .resume_service
        .create_skill_category(input)
        .await
        .map_err(|e| ApiError::validation_error(e.to_string()))?;
    Ok(Json(category))
}

/// PUT /api/skills/categories/{id}
pub async fn update_skill_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateSkillCategoryInput>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state
        .resume_service
        .update_skill_category(id, input)
        .await
        .map_err(ApiError::internal_error)?
        .ok_or_else(|| ApiError::not_found("Skill category not found"))?;
    Ok(Json(category))
}

/// DELETE /api/skills/categories/{id}
pub async fn delete_skill_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .resume_service
        .delete_skill_category(id)
        .await
        .map_err(ApiError::internal_error)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/skills
pub async fn create_skill(
    State(state): State<AppState>,
    Json(input): Json<CreateSkillInput>,
) -> Result<impl IntoResponse, ApiError> {
    let skill = state
        .resume_service
        .create_skill(input)
        .await
        .map_err(|e| ApiError::validation_error(e.to_string()))?;
    Ok(Json(skill))
}

/// PUT /api/skills/{id}
pub async fn update_skill(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateSkillInput>,
) -> Result<impl IntoResponse, ApiError> {
    let skill = state
        .resume_service
        .update_skill(id, input)
        .await
        .map_err(|e| ApiError::validation_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Skill not found"))?;
    Ok(Json(skill))
}

/// DELETE /api/skills/{id}
pub async fn delete_skill(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .resume_service
        .delete_skill(id)
        .await
        .map_err(ApiError::internal_error)?;
    Ok(StatusCode::NO_CONTENT)
}
