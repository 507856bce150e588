//! API middleware
//!
//! Contains the shared application state, the API error envelope, and the
//! authentication middleware that gates every mutating route.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::services::{
    AuthError, AuthService, BlogService, ContactService, ContentService, LoginThrottle,
    NavigationService, ProfileService, ProjectService, ResumeService,
};

/// Name of the session cookie carrying the opaque session identifier.
pub const SESSION_COOKIE: &str = "adminSessionId";

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub navigation_service: Arc<NavigationService>,
    pub content_service: Arc<ContentService>,
    pub blog_service: Arc<BlogService>,
    pub resume_service: Arc<ResumeService>,
    pub project_service: Arc<ProjectService>,
    pub profile_service: Arc<ProfileService>,
    pub contact_service: Arc<ContactService>,
    pub login_throttle: Arc<LoginThrottle>,
    /// Mark session cookies `Secure` (enabled behind HTTPS)
    pub secure_cookies: bool,
}

/// Error response envelope for API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
                details: Some(details),
            },
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("UNAUTHORIZED", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new("RATE_LIMITED", message)
    }

    /// Log the underlying failure server-side, return a generic message to
    /// the client. Internal detail never reaches the response body.
    pub fn internal_error(err: impl std::fmt::Display) -> Self {
        tracing::error!("Internal error: {}", err);
        Self::new("INTERNAL_ERROR", "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.error.code.as_str() {
            "UNAUTHORIZED" => StatusCode::UNAUTHORIZED,
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            "RATE_LIMITED" => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(self)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ApiError::unauthorized("Invalid credentials"),
            AuthError::Unauthenticated => ApiError::unauthorized("Invalid or expired session"),
            AuthError::Internal(e) => ApiError::internal_error(e),
        }
    }
}

/// Pull the session identifier out of the request's cookie header.
pub fn extract_session_cookie(headers: &axum::http::HeaderMap) -> Option<String> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    for cookie in cookie_header.split(';') {
        let cookie = cookie.trim();
        if let Some(value) = cookie.strip_prefix(&format!("{}=", SESSION_COOKIE)) {
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Authentication middleware for mutating/administrative routes.
///
/// Validates the session against the store on every request; a request
/// carrying an expired session deletes it as a side effect of the check.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let session_id = extract_session_cookie(request.headers())
        .ok_or_else(|| ApiError::unauthorized("No authentication token provided"))?;

    let ctx = state.auth_service.validate_session(&session_id).await?;

    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue};

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_session_cookie() {
        let headers = headers_with_cookie("adminSessionId=abc-123");
        assert_eq!(extract_session_cookie(&headers), Some("abc-123".to_string()));
    }

    #[test]
    fn test_extract_session_cookie_among_others() {
        let headers = headers_with_cookie("theme=dark; adminSessionId=tok; lang=en");
        assert_eq!(extract_session_cookie(&headers), Some("tok".to_string()));
    }

    #[test]
    fn test_extract_session_cookie_absent() {
        let headers = headers_with_cookie("theme=dark");
        assert!(extract_session_cookie(&headers).is_none());
        assert!(extract_session_cookie(&HeaderMap::new()).is_none());
    }

    #[test]
    fn test_extract_session_cookie_empty_value() {
        let headers = headers_with_cookie("adminSessionId=");
        assert!(extract_session_cookie(&headers).is_none());
    }

    #[test]
    fn test_api_error_codes() {
        assert_eq!(ApiError::unauthorized("x").error.code, "UNAUTHORIZED");
        assert_eq!(ApiError::not_found("x").error.code, "NOT_FOUND");
        assert_eq!(ApiError::validation_error("x").error.code, "VALIDATION_ERROR");
        assert_eq!(ApiError::rate_limited("x").error.code, "RATE_LIMITED");
    }

    #[test]
    fn test_internal_error_hides_detail() {
        let error = ApiError::internal_error("connection refused to db at 10.0.0.3");
        assert_eq!(error.error.message, "Internal server error");
    }

    #[test]
    fn test_auth_error_mapping() {
        let invalid: ApiError = AuthError::InvalidCredentials.into();
        assert_eq!(invalid.error.code, "UNAUTHORIZED");

        let unauthenticated: ApiError = AuthError::Unauthenticated.into();
        assert_eq!(unauthenticated.error.code, "UNAUTHORIZED");
    }
}
