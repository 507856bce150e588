//! API layer - HTTP handlers and routing
//!
//! Public `GET` endpoints serve the portfolio site; every mutating or
//! administrative endpoint sits behind the auth middleware. Each route is
//! registered exactly once at its documented path.

pub mod auth;
pub mod blog;
pub mod contact;
pub mod content;
pub mod middleware;
pub mod navigation;
pub mod profile;
pub mod projects;
pub mod resume;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use middleware::{extract_session_cookie, ApiError, AppState, SESSION_COOKIE};

/// Build the API router: public routes plus auth-gated admin routes.
pub fn api_router(state: AppState) -> Router<AppState> {
    // Admin routes - every request round-trips to the session store
    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/auth/password", put(auth::change_password))
        .route("/navigation", post(navigation::create))
        .route("/navigation/{id}", put(navigation::update))
        .route("/navigation/{id}", delete(navigation::delete))
        .route("/content/{section_key}", put(content::upsert))
        .route("/blog", post(blog::create))
        .route("/blog/{id}", put(blog::update))
        .route("/blog/{id}", delete(blog::delete))
        .route("/experience", post(resume::create_experience))
        .route("/experience/{id}", put(resume::update_experience))
        .route("/experience/{id}", delete(resume::delete_experience))
        .route("/education", post(resume::create_education))
        .route("/education/{id}", put(resume::update_education))
        .route("/education/{id}", delete(resume::delete_education))
        .route("/skills/categories", post(resume::create_skill_category))
        .route("/skills/categories/{id}", put(resume::update_skill_category))
        .route("/skills/categories/{id}", delete(resume::delete_skill_category))
        .route("/skills", post(resume::create_skill))
        .route("/skills/{id}", put(resume::update_skill))
        .route("/skills/{id}", delete(resume::delete_skill))
        .route("/projects", post(projects::create))
        .route("/projects/{id}", put(projects::update))
        .route("/projects/{id}", delete(projects::delete))
        .route("/profile", put(profile::upsert))
        .route("/contact/messages", get(contact::list_messages))
        .route("/contact/messages/{id}/read", put(contact::mark_read))
        .route("/contact/messages/{id}", delete(contact::delete))
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            middleware::require_auth,
        ));

    // Public routes
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/navigation", get(navigation::list))
        .route("/content/{section_key}", get(content::get))
        .route("/blog", get(blog::list))
        .route("/blog/{id}", get(blog::get))
        .route("/experience", get(resume::list_experiences))
        .route("/education", get(resume::list_education))
        .route("/skills", get(resume::list_skills))
        .route("/projects", get(projects::list))
        .route("/profile", get(profile::get))
        .route("/contact", post(contact::submit))
        .merge(protected_routes)
}

/// Build the complete router with CORS and tracing middleware.
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    // Cookie auth needs credentials and an exact origin
    let cors = CorsLayer::new()
        .allow_origin(cors_origin.parse::<HeaderValue>().expect("invalid CORS origin"))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    Router::new()
        .nest("/api", api_router(state.clone()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::db::repositories::{
        SqlxAdminUserRepository, SqlxBlogPostRepository, SqlxContactMessageRepository,
        SqlxContentSectionRepository, SqlxEducationRepository, SqlxExperienceRepository,
        SqlxNavigationRepository, SqlxProfileRepository, SqlxProjectRepository,
        SqlxSessionRepository, SqlxSkillRepository,
    };
    use crate::db::{create_test_pool, migrations};
    use crate::services::{
        AuthService, BlogService, ContactService, ContentService, LoginThrottle,
        NavigationService, ProfileService, ProjectService, ResumeService,
    };
    use axum::http::{HeaderName, HeaderValue, StatusCode};
    use axum_test::TestServer;
    use std::sync::Arc;
    use std::time::Duration;

    async fn test_server() -> TestServer {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let cache = Arc::new(MemoryCache::new(Duration::from_secs(60)));
        let auth_service = Arc::new(AuthService::new(
            SqlxAdminUserRepository::boxed(pool.clone()),
            SqlxSessionRepository::boxed(pool.clone()),
        ));
        auth_service
            .ensure_default_admin("admin", "admin123")
            .await
            .expect("Failed to bootstrap admin");

        let state = AppState {
            auth_service,
            navigation_service: Arc::new(NavigationService::new(
                SqlxNavigationRepository::boxed(pool.clone()),
                cache.clone(),
            )),
            content_service: Arc::new(ContentService::new(
                SqlxContentSectionRepository::boxed(pool.clone()),
                cache.clone(),
            )),
            blog_service: Arc::new(BlogService::new(SqlxBlogPostRepository::boxed(pool.clone()))),
            resume_service: Arc::new(ResumeService::new(
                SqlxExperienceRepository::boxed(pool.clone()),
                SqlxEducationRepository::boxed(pool.clone()),
                SqlxSkillRepository::boxed(pool.clone()),
            )),
            project_service: Arc::new(ProjectService::new(SqlxProjectRepository::boxed(
                pool.clone(),
            ))),
            profile_service: Arc::new(ProfileService::new(
                SqlxProfileRepository::boxed(pool.clone()),
                cache,
            )),
            contact_service: Arc::new(ContactService::new(SqlxContactMessageRepository::boxed(
                pool,
            ))),
            login_throttle: Arc::new(LoginThrottle::new()),
            secure_cookies: false,
        };

        TestServer::new(build_router(state, "http://localhost:3000"))
            .expect("Failed to start test server")
    }

    /// Log in and return the session cookie value.
    async fn login(server: &TestServer) -> String {
        let response = server
            .post("/api/auth/login")
            .json(&serde_json::json!({"username": "admin", "password": "admin123"}))
            .await;
        response.assert_status_ok();

        let set_cookie = response.header(header::SET_COOKIE);
        let set_cookie = set_cookie.to_str().unwrap();
        let token = set_cookie
            .split(';')
            .next()
            .and_then(|kv| kv.strip_prefix("adminSessionId="))
            .expect("login must set the session cookie");
        token.to_string()
    }

    fn cookie_header(token: &str) -> (HeaderName, HeaderValue) {
        (
            header::COOKIE,
            HeaderValue::from_str(&format!("adminSessionId={}", token)).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_login_sets_cookie_and_returns_user() {
        let server = test_server().await;

        let response = server
            .post("/api/auth/login")
            .json(&serde_json::json!({"username": "admin", "password": "admin123"}))
            .await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["user"]["username"], "admin");
        assert!(body["user"].get("password_hash").is_none());

        let set_cookie = response.header(header::SET_COOKIE);
        let set_cookie = set_cookie.to_str().unwrap();
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("SameSite=Strict"));
        assert!(set_cookie.contains("Max-Age=86400"));
    }

    #[tokio::test]
    async fn test_login_bad_credentials_is_generic_401() {
        let server = test_server().await;

        let wrong_password = server
            .post("/api/auth/login")
            .json(&serde_json::json!({"username": "admin", "password": "wrong"}))
            .await;
        wrong_password.assert_status(StatusCode::UNAUTHORIZED);

        let unknown_user = server
            .post("/api/auth/login")
            .json(&serde_json::json!({"username": "ghost", "password": "admin123"}))
            .await;
        unknown_user.assert_status(StatusCode::UNAUTHORIZED);

        // Identical body for both failure modes - no username enumeration
        let a: serde_json::Value = wrong_password.json();
        let b: serde_json::Value = unknown_user.json();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_login_missing_fields_is_400() {
        let server = test_server().await;

        let response = server
            .post("/api/auth/login")
            .json(&serde_json::json!({"username": "admin"}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_me_requires_session() {
        let server = test_server().await;

        server
            .get("/api/auth/me")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        let token = login(&server).await;
        let (name, value) = cookie_header(&token);
        let response = server.get("/api/auth/me").add_header(name, value).await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        assert_eq!(body["user"]["username"], "admin");
    }

    #[tokio::test]
    async fn test_protected_create_without_cookie_creates_nothing() {
        let server = test_server().await;

        let response = server
            .post("/api/navigation")
            .json(&serde_json::json!({"label": "Home", "href": "#home", "icon": "house"}))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        // No row was created
        let list = server.get("/api/navigation").await;
        list.assert_status_ok();
        let items: serde_json::Value = list.json();
        assert_eq!(items.as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_protected_create_with_cookie_is_publicly_readable() {
        let server = test_server().await;
        let token = login(&server).await;

        let (name, value) = cookie_header(&token);
        let response = server
            .post("/api/navigation")
            .add_header(name, value)
            .json(&serde_json::json!({"label": "Home", "href": "#home", "icon": "house"}))
            .await;
        response.assert_status_ok();
        let created: serde_json::Value = response.json();
        assert_eq!(created["label"], "Home");

        // Visible through the public read endpoint
        let list = server.get("/api/navigation").await;
        let items: serde_json::Value = list.json();
        assert_eq!(items.as_array().unwrap().len(), 1);
        assert_eq!(items[0]["label"], "Home");
    }

    #[tokio::test]
    async fn test_logout_invalidates_cookie() {
        let server = test_server().await;
        let token = login(&server).await;

        let (name, value) = cookie_header(&token);
        let response = server.post("/api/auth/logout").add_header(name, value).await;
        response.assert_status_ok();

        // The cleared cookie has Max-Age=0
        let set_cookie = response.header(header::SET_COOKIE);
        assert!(set_cookie.to_str().unwrap().contains("Max-Age=0"));

        let (name, value) = cookie_header(&token);
        server
            .get("/api/auth/me")
            .add_header(name, value)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_logout_without_cookie_still_succeeds() {
        let server = test_server().await;
        server.post("/api/auth/logout").await.assert_status_ok();
    }

    #[tokio::test]
    async fn test_content_section_roundtrip() {
        let server = test_server().await;
        let token = login(&server).await;

        server
            .get("/api/content/hero")
            .await
            .assert_status(StatusCode::NOT_FOUND);

        let (name, value) = cookie_header(&token);
        let response = server
            .put("/api/content/hero")
            .add_header(name, value)
            .json(&serde_json::json!({"title": "Hello", "subtitle": "World"}))
            .await;
        response.assert_status_ok();

        let get = server.get("/api/content/hero").await;
        get.assert_status_ok();
        let body: serde_json::Value = get.json();
        assert_eq!(body["title"], "Hello");
        assert_eq!(body["section_key"], "hero");
    }

    #[tokio::test]
    async fn test_contact_submit_is_public_but_inbox_is_not() {
        let server = test_server().await;

        let response = server
            .post("/api/contact")
            .json(&serde_json::json!({
                "name": "Visitor",
                "email": "visitor@example.com",
                "message": "Hello!"
            }))
            .await;
        response.assert_status_ok();

        server
            .get("/api/contact/messages")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        let token = login(&server).await;
        let (name, value) = cookie_header(&token);
        let inbox = server
            .get("/api/contact/messages")
            .add_header(name, value)
            .await;
        inbox.assert_status_ok();
        let messages: serde_json::Value = inbox.json();
        assert_eq!(messages.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_change_password_flow() {
        let server = test_server().await;
        let token = login(&server).await;

        // Wrong current password leaves everything unchanged
        let (name, value) = cookie_header(&token);
        server
            .put("/api/auth/password")
            .add_header(name, value)
            .json(&serde_json::json!({
                "current_password": "wrong",
                "new_password": "brand-new-pass"
            }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        let (name, value) = cookie_header(&token);
        server
            .put("/api/auth/password")
            .add_header(name, value)
            .json(&serde_json::json!({
                "current_password": "admin123",
                "new_password": "brand-new-pass"
            }))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        // Old password no longer works, new one does
        server
            .post("/api/auth/login")
            .json(&serde_json::json!({"username": "admin", "password": "admin123"}))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
        server
            .post("/api/auth/login")
            .json(&serde_json::json!({"username": "admin", "password": "brand-new-pass"}))
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn test_blog_draft_visibility() {
        let server = test_server().await;
        let token = login(&server).await;

        let (name, value) = cookie_header(&token);
        server
            .post("/api/blog")
            .add_header(name, value)
            .json(&serde_json::json!({
                "title": "Draft post",
                "slug": "draft-post",
                "content": "...",
                "category": "general",
                "is_published": false
            }))
            .await
            .assert_status_ok();

        let published = server.get("/api/blog?published=true").await;
        let posts: serde_json::Value = published.json();
        assert_eq!(posts.as_array().unwrap().len(), 0);

        let all = server.get("/api/blog").await;
        let posts: serde_json::Value = all.json();
        assert_eq!(posts.as_array().unwrap().len(), 1);
    }
}
