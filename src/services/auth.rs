//! Authentication service
//!
//! Orchestrates login, logout, session validation and password changes over
//! the credential and session repositories. Sessions move through exactly
//! three states: anonymous, authenticated, and gone (expired or logged out).
//!
//! The service holds no session state of its own. Every validation re-reads
//! the store, so multiple server processes can share one database with no
//! in-memory affinity.

use crate::db::repositories::{AdminUserRepository, SessionRepository};
use crate::models::{AdminSession, AdminUser, AdminUserSummary};
use crate::services::password::{generate_salt, hash_password, verify_password};
use anyhow::Context;
use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Default session lifetime in hours
const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

/// Error types for authentication operations
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Wrong username, wrong password, or inactive account. The three cases
    /// are deliberately indistinguishable to the caller.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing, unknown, or expired session
    #[error("Unauthenticated")]
    Unauthenticated,

    /// Unexpected store failure
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// A validated session together with the minimal user descriptor, attached
/// to the request by the auth middleware.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub session: AdminSession,
    pub user: AdminUserSummary,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub session: AdminSession,
    pub user: AdminUserSummary,
}

/// Authentication service
pub struct AuthService {
    users: Arc<dyn AdminUserRepository>,
    sessions: Arc<dyn SessionRepository>,
    session_ttl_hours: i64,
}

impl AuthService {
    pub fn new(users: Arc<dyn AdminUserRepository>, sessions: Arc<dyn SessionRepository>) -> Self {
        Self {
            users,
            sessions,
            session_ttl_hours: DEFAULT_SESSION_TTL_HOURS,
        }
    }

    /// Create a service with a custom session TTL (tests use a negative TTL
    /// to mint already-expired sessions).
    pub fn with_session_ttl(
        users: Arc<dyn AdminUserRepository>,
        sessions: Arc<dyn SessionRepository>,
        session_ttl_hours: i64,
    ) -> Self {
        Self {
            users,
            sessions,
            session_ttl_hours,
        }
    }

    /// Create the bootstrap account if no credentials exist yet.
    pub async fn ensure_default_admin(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let count = self
            .users
            .count()
            .await
            .context("Failed to count admin users")?;
        if count > 0 {
            return Ok(());
        }

        let salt = generate_salt();
        let password_hash = hash_password(password, &salt);
        let user = AdminUser::new(username.to_string(), password_hash, salt);
        self.users
            .create(&user)
            .await
            .context("Failed to create default admin user")?;

        tracing::warn!(
            "Created default admin account '{}'. Change its password after first login.",
            username
        );
        Ok(())
    }

    /// Authenticate and open a new session.
    ///
    /// Unknown usernames, inactive accounts, and wrong passwords all fail
    /// with the same `InvalidCredentials` error, so the response never
    /// confirms whether an account exists. For unknown usernames a dummy
    /// hash is computed to keep the timing profile flat too.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let user = match self
            .users
            .get_by_username(username)
            .await
            .context("Failed to look up admin user")?
        {
            Some(user) if user.is_active => user,
            _ => {
                let _ = hash_password(password, "0000000000000000");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !verify_password(password, &user.password_hash, &user.salt) {
            return Err(AuthError::InvalidCredentials);
        }

        let session = self.issue_session(user.id).await?;

        self.users
            .update_last_login(user.id)
            .await
            .context("Failed to update last login")?;

        Ok(LoginOutcome {
            session,
            user: user.summary(),
        })
    }

    /// Invalidate a session. Always succeeds from the caller's perspective,
    /// whether or not the session existed.
    pub async fn logout(&self, session_id: &str) -> Result<(), AuthError> {
        self.sessions
            .delete(session_id)
            .await
            .context("Failed to delete session")?;
        Ok(())
    }

    /// Validate a session token and load its user descriptor.
    ///
    /// An expired session is deleted as a side effect of being checked
    /// (lazy expiration), then reported as `Unauthenticated`.
    pub async fn validate_session(&self, session_id: &str) -> Result<AuthContext, AuthError> {
        let session = self
            .sessions
            .get_by_id(session_id)
            .await
            .context("Failed to load session")?
            .ok_or(AuthError::Unauthenticated)?;

        if session.is_expired() {
            let _ = self.sessions.delete(session_id).await;
            return Err(AuthError::Unauthenticated);
        }

        let user = self
            .users
            .get_by_id(session.user_id)
            .await
            .context("Failed to load session user")?
            .ok_or(AuthError::Unauthenticated)?;

        Ok(AuthContext {
            session,
            user: user.summary(),
        })
    }

    /// Change an account's password after re-verifying the current one.
    ///
    /// A fresh salt is generated — the old one is never reused — and hash
    /// plus salt are replaced in a single statement. Outstanding sessions
    /// stay valid; call `revoke_sessions` if stricter behavior is wanted.
    pub async fn change_password(
        &self,
        user_id: i64,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let user = self
            .users
            .get_by_id(user_id)
            .await
            .context("Failed to load admin user")?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(current_password, &user.password_hash, &user.salt) {
            return Err(AuthError::InvalidCredentials);
        }

        let new_salt = generate_salt();
        let new_hash = hash_password(new_password, &new_salt);
        self.users
            .update_password(user.id, &new_hash, &new_salt)
            .await
            .context("Failed to update password")?;

        Ok(())
    }

    /// Delete every session belonging to an account.
    pub async fn revoke_sessions(&self, user_id: i64) -> Result<(), AuthError> {
        self.sessions
            .delete_by_user(user_id)
            .await
            .context("Failed to revoke sessions")?;
        Ok(())
    }

    /// Reap sessions past their expiry. Called periodically so expired but
    /// never-revisited sessions don't accumulate in storage.
    pub async fn purge_expired_sessions(&self) -> Result<i64, AuthError> {
        let count = self
            .sessions
            .delete_expired()
            .await
            .context("Failed to purge expired sessions")?;
        Ok(count)
    }

    /// Mint and persist a new session for an account.
    async fn issue_session(&self, user_id: i64) -> Result<AdminSession, AuthError> {
        let now = Utc::now();
        let session = AdminSession {
            id: Uuid::new_v4().to_string(),
            user_id,
            expires_at: now + Duration::hours(self.session_ttl_hours),
            created_at: now,
        };

        let created = self
            .sessions
            .create(&session)
            .await
            .context("Failed to create session")?;

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxAdminUserRepository, SqlxSessionRepository};
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_service() -> AuthService {
        setup_with_ttl(DEFAULT_SESSION_TTL_HOURS).await
    }

    async fn setup_with_ttl(ttl_hours: i64) -> AuthService {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let users = SqlxAdminUserRepository::boxed(pool.clone());
        let sessions = SqlxSessionRepository::boxed(pool.clone());
        let service = AuthService::with_session_ttl(users, sessions, ttl_hours);
        service
            .ensure_default_admin("admin", "admin123")
            .await
            .expect("Failed to bootstrap admin");
        service
    }

    // ========================================================================
    // Login tests
    // ========================================================================

    #[tokio::test]
    async fn test_login_success_returns_day_long_session() {
        let service = setup_test_service().await;

        let outcome = service.login("admin", "admin123").await.expect("Login failed");
        assert_eq!(outcome.user.username, "admin");
        assert!(!outcome.session.id.is_empty());

        // Expiry is approximately now + 24h
        let expected = Utc::now() + Duration::hours(24);
        let delta = (outcome.session.expires_at - expected).num_seconds().abs();
        assert!(delta < 5, "expiry off by {}s", delta);
    }

    #[tokio::test]
    async fn test_login_wrong_password_and_unknown_user_are_indistinguishable() {
        let service = setup_test_service().await;

        let wrong_password = service.login("admin", "nope").await.unwrap_err();
        let unknown_user = service.login("nobody", "admin123").await.unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_user, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[tokio::test]
    async fn test_login_updates_last_login() {
        let pool = create_test_pool().await.unwrap();
        migrations::run_migrations(&pool).await.unwrap();
        let users = SqlxAdminUserRepository::boxed(pool.clone());
        let sessions = SqlxSessionRepository::boxed(pool.clone());
        let service = AuthService::new(users.clone(), sessions);
        service.ensure_default_admin("admin", "admin123").await.unwrap();

        service.login("admin", "admin123").await.expect("Login failed");

        let user = users.get_by_username("admin").await.unwrap().unwrap();
        assert!(user.last_login_at.is_some());
    }

    #[tokio::test]
    async fn test_repeated_logins_create_distinct_sessions() {
        let service = setup_test_service().await;

        let first = service.login("admin", "admin123").await.unwrap();
        let second = service.login("admin", "admin123").await.unwrap();
        assert_ne!(first.session.id, second.session.id);

        // Both remain valid
        assert!(service.validate_session(&first.session.id).await.is_ok());
        assert!(service.validate_session(&second.session.id).await.is_ok());
    }

    // ========================================================================
    // Session validation tests
    // ========================================================================

    #[tokio::test]
    async fn test_validate_fresh_session() {
        let service = setup_test_service().await;

        let outcome = service.login("admin", "admin123").await.unwrap();
        let ctx = service
            .validate_session(&outcome.session.id)
            .await
            .expect("Validation failed");
        assert_eq!(ctx.user.username, "admin");
        assert_eq!(ctx.session.id, outcome.session.id);
    }

    #[tokio::test]
    async fn test_validate_unknown_session_fails() {
        let service = setup_test_service().await;

        let err = service.validate_session("not-a-session").await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated));
    }

    #[tokio::test]
    async fn test_expired_session_fails_and_is_deleted() {
        // Negative TTL mints sessions that are expired on arrival
        let pool = create_test_pool().await.unwrap();
        migrations::run_migrations(&pool).await.unwrap();
        let users = SqlxAdminUserRepository::boxed(pool.clone());
        let sessions = SqlxSessionRepository::boxed(pool.clone());
        let service = AuthService::with_session_ttl(users, sessions.clone(), -1);
        service.ensure_default_admin("admin", "admin123").await.unwrap();

        let outcome = service.login("admin", "admin123").await.unwrap();
        assert!(outcome.session.is_expired());

        let err = service.validate_session(&outcome.session.id).await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated));

        // Checking the session deleted it (lazy expiration)
        assert!(sessions.get_by_id(&outcome.session.id).await.unwrap().is_none());
    }

    // ========================================================================
    // Logout tests
    // ========================================================================

    #[tokio::test]
    async fn test_logout_invalidates_session() {
        let service = setup_test_service().await;

        let outcome = service.login("admin", "admin123").await.unwrap();
        service.logout(&outcome.session.id).await.expect("Logout failed");

        let err = service.validate_session(&outcome.session.id).await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated));
    }

    #[tokio::test]
    async fn test_logout_unknown_session_succeeds() {
        let service = setup_test_service().await;
        service
            .logout("never-existed")
            .await
            .expect("Logout of an unknown session should not error");
    }

    // ========================================================================
    // Password change tests
    // ========================================================================

    #[tokio::test]
    async fn test_change_password_with_wrong_current_is_rejected() {
        let service = setup_test_service().await;
        let outcome = service.login("admin", "admin123").await.unwrap();

        let err = service
            .change_password(outcome.user.id, "wrong", "new-password")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));

        // Old password still valid, new one is not
        assert!(service.login("admin", "admin123").await.is_ok());
        assert!(service.login("admin", "new-password").await.is_err());
    }

    #[tokio::test]
    async fn test_change_password_rotates_salt() {
        let pool = create_test_pool().await.unwrap();
        migrations::run_migrations(&pool).await.unwrap();
        let users = SqlxAdminUserRepository::boxed(pool.clone());
        let sessions = SqlxSessionRepository::boxed(pool.clone());
        let service = AuthService::new(users.clone(), sessions);
        service.ensure_default_admin("admin", "admin123").await.unwrap();

        let before = users.get_by_username("admin").await.unwrap().unwrap();
        service
            .change_password(before.id, "admin123", "s3cure-new-pass")
            .await
            .expect("Password change failed");
        let after = users.get_by_username("admin").await.unwrap().unwrap();

        assert_ne!(before.salt, after.salt);
        assert_ne!(before.password_hash, after.password_hash);

        assert!(service.login("admin", "admin123").await.is_err());
        assert!(service.login("admin", "s3cure-new-pass").await.is_ok());
    }

    #[tokio::test]
    async fn test_change_password_keeps_existing_sessions() {
        let service = setup_test_service().await;
        let outcome = service.login("admin", "admin123").await.unwrap();

        service
            .change_password(outcome.user.id, "admin123", "brand-new")
            .await
            .unwrap();

        // Reference behavior: the open session survives the change
        assert!(service.validate_session(&outcome.session.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_revoke_sessions_deletes_all() {
        let service = setup_test_service().await;

        let first = service.login("admin", "admin123").await.unwrap();
        let second = service.login("admin", "admin123").await.unwrap();

        service.revoke_sessions(first.user.id).await.unwrap();

        assert!(service.validate_session(&first.session.id).await.is_err());
        assert!(service.validate_session(&second.session.id).await.is_err());
    }

    // ========================================================================
    // Maintenance tests
    // ========================================================================

    #[tokio::test]
    async fn test_purge_expired_sessions() {
        let service = setup_with_ttl(-1).await;
        service.login("admin", "admin123").await.unwrap();
        service.login("admin", "admin123").await.unwrap();

        let purged = service.purge_expired_sessions().await.unwrap();
        assert_eq!(purged, 2);
        assert_eq!(service.purge_expired_sessions().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_ensure_default_admin_is_idempotent() {
        let service = setup_test_service().await;

        // Bootstrap already ran in setup; a second call must not clobber
        service.ensure_default_admin("admin", "different").await.unwrap();
        assert!(service.login("admin", "admin123").await.is_ok());
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::db::repositories::{SqlxAdminUserRepository, SqlxSessionRepository};
    use crate::db::{create_test_pool, migrations};
    use proptest::prelude::*;

    async fn fresh_service() -> AuthService {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        AuthService::new(
            SqlxAdminUserRepository::boxed(pool.clone()),
            SqlxSessionRepository::boxed(pool),
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(10))]

        /// For any valid credentials, login yields a token that validates
        /// back to the same account.
        #[test]
        fn property_auth_roundtrip(
            username in "[a-z]{3,12}",
            password in "[a-zA-Z0-9!@#$%^&*]{8,24}"
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let result: Result<(), TestCaseError> = rt.block_on(async {
                let service = fresh_service().await;
                service.ensure_default_admin(&username, &password).await
                    .expect("Bootstrap failed");

                let outcome = service.login(&username, &password).await
                    .expect("Login should succeed with valid credentials");
                let ctx = service.validate_session(&outcome.session.id).await
                    .expect("Fresh session should validate");

                prop_assert_eq!(&ctx.user.username, &username);
                prop_assert_eq!(ctx.user.id, outcome.user.id);
                Ok(())
            });
            result?;
        }

        /// For any wrong password, login fails with InvalidCredentials.
        #[test]
        fn property_wrong_password_rejected(
            username in "[a-z]{3,12}",
            password in "[a-zA-Z0-9]{8,20}",
            wrong in "[a-zA-Z0-9]{8,20}"
        ) {
            prop_assume!(password != wrong);
            let rt = tokio::runtime::Runtime::new().unwrap();
            let result: Result<(), TestCaseError> = rt.block_on(async {
                let service = fresh_service().await;
                service.ensure_default_admin(&username, &password).await
                    .expect("Bootstrap failed");

                let err = service.login(&username, &wrong).await.unwrap_err();
                prop_assert!(matches!(err, AuthError::InvalidCredentials));
                Ok(())
            });
            result?;
        }
    }
}
