//! Folio - A lightweight personal portfolio CMS

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio::{
    api::{self, AppState},
    cache::MemoryCache,
    config::Config,
    db::{
        self,
        repositories::{
            SqlxAdminUserRepository, SqlxBlogPostRepository, SqlxContactMessageRepository,
            SqlxContentSectionRepository, SqlxEducationRepository, SqlxExperienceRepository,
            SqlxNavigationRepository, SqlxProfileRepository, SqlxProjectRepository,
            SqlxSessionRepository, SqlxSkillRepository,
        },
    },
    services::{
        AuthService, BlogService, ContactService, ContentService, LoginThrottle,
        NavigationService, ProfileService, ProjectService, ResumeService,
    },
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Folio portfolio system...");

    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected: {:?}", config.database.driver);

    // Run migrations
    db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    // Initialize cache
    let cache = MemoryCache::from_config(&config.cache);

    // Create repositories
    let user_repo = SqlxAdminUserRepository::boxed(pool.clone());
    let session_repo = SqlxSessionRepository::boxed(pool.clone());
    let navigation_repo = SqlxNavigationRepository::boxed(pool.clone());
    let content_repo = SqlxContentSectionRepository::boxed(pool.clone());
    let blog_repo = SqlxBlogPostRepository::boxed(pool.clone());
    let experience_repo = SqlxExperienceRepository::boxed(pool.clone());
    let education_repo = SqlxEducationRepository::boxed(pool.clone());
    let skill_repo = SqlxSkillRepository::boxed(pool.clone());
    let project_repo = SqlxProjectRepository::boxed(pool.clone());
    let profile_repo = SqlxProfileRepository::boxed(pool.clone());
    let contact_repo = SqlxContactMessageRepository::boxed(pool.clone());

    // Initialize services
    let auth_service = Arc::new(AuthService::with_session_ttl(
        user_repo,
        session_repo,
        config.auth.session_ttl_hours,
    ));
    let navigation_service = Arc::new(NavigationService::new(navigation_repo, cache.clone()));
    let content_service = Arc::new(ContentService::new(content_repo, cache.clone()));
    let blog_service = Arc::new(BlogService::new(blog_repo));
    let resume_service = Arc::new(ResumeService::new(
        experience_repo,
        education_repo,
        skill_repo,
    ));
    let project_service = Arc::new(ProjectService::new(project_repo));
    let profile_service = Arc::new(ProfileService::new(profile_repo, cache));
    let contact_service = Arc::new(ContactService::new(contact_repo));
    let login_throttle = Arc::new(LoginThrottle::new());

    // Bootstrap the admin account on an empty database
    auth_service
        .ensure_default_admin(
            &config.auth.default_admin_username,
            &config.auth.default_admin_password,
        )
        .await?;

    // Maintenance task: reap expired sessions (lazy expiration only removes
    // sessions that are revisited) and drain the login throttle window
    {
        let auth = auth_service.clone();
        let throttle = login_throttle.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(3600));
            loop {
                interval.tick().await;
                match auth.purge_expired_sessions().await {
                    Ok(0) => {}
                    Ok(count) => tracing::info!("Purged {} expired session(s)", count),
                    Err(e) => tracing::warn!("Session purge failed: {}", e),
                }
                throttle.cleanup().await;
            }
        });
    }

    // Build application state
    let state = AppState {
        auth_service,
        navigation_service,
        content_service,
        blog_service,
        resume_service,
        project_service,
        profile_service,
        contact_service,
        login_throttle,
        secure_cookies: config.server.secure_cookies,
    };

    // Build router
    let app = api::build_router(state, &config.server.cors_origin);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
