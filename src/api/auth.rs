//! Authentication API endpoints
//!
//! - POST /api/auth/login - open a session, set the session cookie
//! - POST /api/auth/logout - delete the session, clear the cookie
//! - GET /api/auth/me - current user descriptor
//! - PUT /api/auth/password - change the admin password

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{extract_session_cookie, ApiError, AppState, SESSION_COOKIE};
use crate::models::AdminUserSummary;
use crate::services::{AuthContext, AuthError};

/// Session cookie lifetime in seconds (matches the session TTL).
const COOKIE_MAX_AGE_SECS: i64 = 24 * 60 * 60;

/// Request body for login. Fields are optional so a missing field yields a
/// 400 instead of a body-rejection error.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Response for successful login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: AdminUserSummary,
}

/// Response for /api/auth/me
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: AdminUserSummary,
}

/// Request body for changing the password
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

fn session_cookie(value: &str, max_age: i64, secure: bool) -> HeaderValue {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Strict; Max-Age={}",
        SESSION_COOKIE, value, max_age
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).expect("cookie is always valid ASCII")
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (username, password) = match (body.username, body.password) {
        (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => (u, p),
        _ => return Err(ApiError::validation_error("Username and password required")),
    };

    if state.login_throttle.is_limited(&username).await {
        return Err(ApiError::rate_limited(
            "Too many failed login attempts, try again later",
        ));
    }

    let outcome = match state.auth_service.login(&username, &password).await {
        Ok(outcome) => outcome,
        Err(err) => {
            if matches!(err, AuthError::InvalidCredentials) {
                state.login_throttle.record_failure(&username).await;
            }
            return Err(err.into());
        }
    };

    state.login_throttle.clear(&username).await;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        session_cookie(&outcome.session.id, COOKIE_MAX_AGE_SECS, state.secure_cookies),
    );

    Ok((
        headers,
        Json(LoginResponse {
            success: true,
            user: outcome.user,
        }),
    ))
}

/// POST /api/auth/logout
///
/// Deletes the session if a cookie is present and clears the cookie either
/// way; the caller always gets a 200.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(session_id) = extract_session_cookie(&headers) {
        state.auth_service.logout(&session_id).await?;
    }

    let mut response_headers = HeaderMap::new();
    response_headers.insert(
        header::SET_COOKIE,
        session_cookie("", 0, state.secure_cookies),
    );

    Ok((
        response_headers,
        Json(serde_json::json!({ "message": "Logged out successfully" })),
    ))
}

/// GET /api/auth/me
pub async fn me(Extension(ctx): Extension<AuthContext>) -> Json<MeResponse> {
    Json(MeResponse { user: ctx.user })
}

/// PUT /api/auth/password
pub async fn change_password(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if body.new_password.len() < 8 {
        return Err(ApiError::validation_error(
            "Password must be at least 8 characters",
        ));
    }

    state
        .auth_service
        .change_password(ctx.user.id, &body.current_password, &body.new_password)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
