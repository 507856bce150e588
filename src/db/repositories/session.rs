//! Session repository
//!
//! Database operations for admin login sessions. This module exclusively
//! owns the `admin_sessions` table; the auth service goes through this trait
//! for every validation so sessions are safely shared across processes with
//! no in-memory affinity.
//!
//! Deletes are single statements, so a concurrent logout and validation of
//! the same session never interleave a read-then-write.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::AdminSession;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Session repository trait
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persist a new session
    async fn create(&self, session: &AdminSession) -> Result<AdminSession>;

    /// Get a session by its identifier. Does not check expiry; that is the
    /// caller's responsibility.
    async fn get_by_id(&self, id: &str) -> Result<Option<AdminSession>>;

    /// Delete a session. Idempotent: deleting an unknown id is not an error.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Delete all sessions belonging to an account
    async fn delete_by_user(&self, user_id: i64) -> Result<()>;

    /// Delete all sessions past their expiry, returning the count
    async fn delete_expired(&self) -> Result<i64>;
}

/// SQLx-based session repository supporting SQLite and MySQL.
pub struct SqlxSessionRepository {
    pool: DynDatabasePool,
}

impl SqlxSessionRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn SessionRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl SessionRepository for SqlxSessionRepository {
    async fn create(&self, session: &AdminSession) -> Result<AdminSession> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_session_sqlite(self.pool.as_sqlite().unwrap(), session).await
            }
            DatabaseDriver::Mysql => {
                create_session_mysql(self.pool.as_mysql().unwrap(), session).await
            }
        }
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<AdminSession>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_session_by_id_sqlite(self.pool.as_sqlite().unwrap(), id).await
            }
            DatabaseDriver::Mysql => {
                get_session_by_id_mysql(self.pool.as_mysql().unwrap(), id).await
            }
        }
    }

    async fn delete(&self, id: &str) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                delete_session_sqlite(self.pool.as_sqlite().unwrap(), id).await
            }
            DatabaseDriver::Mysql => delete_session_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }

    async fn delete_by_user(&self, user_id: i64) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                delete_sessions_by_user_sqlite(self.pool.as_sqlite().unwrap(), user_id).await
            }
            DatabaseDriver::Mysql => {
                delete_sessions_by_user_mysql(self.pool.as_mysql().unwrap(), user_id).await
            }
        }
    }

    async fn delete_expired(&self) -> Result<i64> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                delete_expired_sessions_sqlite(self.pool.as_sqlite().unwrap()).await
            }
            DatabaseDriver::Mysql => {
                delete_expired_sessions_mysql(self.pool.as_mysql().unwrap()).await
            }
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_session_sqlite(pool: &SqlitePool, session: &AdminSession) -> Result<AdminSession> {
    sqlx::query(
        r#"
        INSERT INTO admin_sessions (id, user_id, expires_at, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&session.id)
    .bind(session.user_id)
    .bind(session.expires_at)
    .bind(session.created_at)
    .execute(pool)
    .await
    .context("Failed to create session")?;

    Ok(session.clone())
}

async fn get_session_by_id_sqlite(pool: &SqlitePool, id: &str) -> Result<Option<AdminSession>> {
    let row = sqlx::query(
        r#"
        SELECT id, user_id, expires_at, created_at
        FROM admin_sessions
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get session by id")?;

    row.map(|r| row_to_session_sqlite(&r)).transpose()
}

async fn delete_session_sqlite(pool: &SqlitePool, id: &str) -> Result<()> {
    sqlx::query("DELETE FROM admin_sessions WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete session")?;

    Ok(())
}

async fn delete_sessions_by_user_sqlite(pool: &SqlitePool, user_id: i64) -> Result<()> {
    sqlx::query("DELETE FROM admin_sessions WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await
        .context("Failed to delete sessions by user")?;

    Ok(())
}

async fn delete_expired_sessions_sqlite(pool: &SqlitePool) -> Result<i64> {
    let now = Utc::now();
    let result = sqlx::query("DELETE FROM admin_sessions WHERE expires_at < ?")
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to delete expired sessions")?;

    Ok(result.rows_affected() as i64)
}

fn row_to_session_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<AdminSession> {
    Ok(AdminSession {
        id: row.get("id"),
        user_id: row.get("user_id"),
        expires_at: row.get("expires_at"),
        created_at: row.get("created_at"),
    })
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_session_mysql(pool: &MySqlPool, session: &AdminSession) -> Result<AdminSession> {
    sqlx::query(
        r#"
        INSERT INTO admin_sessions (id, user_id, expires_at, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&session.id)
    .bind(session.user_id)
    .bind(session.expires_at)
    .bind(session.created_at)
    .execute(pool)
    .await
    .context("Failed to create session")?;

    Ok(session.clone())
}

async fn get_session_by_id_mysql(pool: &MySqlPool, id: &str) -> Result<Option<AdminSession>> {
    let row = sqlx::query(
        r#"
        SELECT id, user_id, expires_at, created_at
        FROM admin_sessions
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get session by id")?;

    row.map(|r| row_to_session_mysql(&r)).transpose()
}

async fn delete_session_mysql(pool: &MySqlPool, id: &str) -> Result<()> {
    sqlx::query("DELETE FROM admin_sessions WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete session")?;

    Ok(())
}

async fn delete_sessions_by_user_mysql(pool: &MySqlPool, user_id: i64) -> Result<()> {
    sqlx::query("DELETE FROM admin_sessions WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await
        .context("Failed to delete sessions by user")?;

    Ok(())
}

async fn delete_expired_sessions_mysql(pool: &MySqlPool) -> Result<i64> {
    let now = Utc::now();
    let result = sqlx::query("DELETE FROM admin_sessions WHERE expires_at < ?")
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to delete expired sessions")?;

    Ok(result.rows_affected() as i64)
}

fn row_to_session_mysql(row: &sqlx::mysql::MySqlRow) -> Result<AdminSession> {
    Ok(AdminSession {
        id: row.get("id"),
        user_id: row.get("user_id"),
        expires_at: row.get("expires_at"),
        created_at: row.get("created_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations, DynDatabasePool};
    use crate::models::AdminUser;
    use crate::db::repositories::{AdminUserRepository, SqlxAdminUserRepository};
    use chrono::Duration;
    use uuid::Uuid;

    async fn setup_test_repo() -> (DynDatabasePool, SqlxSessionRepository) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        let repo = SqlxSessionRepository::new(pool.clone());
        (pool, repo)
    }

    // Sessions have a FK to admin_users
    async fn create_test_user(pool: &DynDatabasePool, username: &str) -> i64 {
        let users = SqlxAdminUserRepository::new(pool.clone());
        let user = AdminUser::new(username.into(), "hash".into(), "salt".into());
        users.create(&user).await.expect("Failed to create user").id
    }

    fn test_session(user_id: i64, expires_in_hours: i64) -> AdminSession {
        let now = Utc::now();
        AdminSession {
            id: Uuid::new_v4().to_string(),
            user_id,
            expires_at: now + Duration::hours(expires_in_hours),
            created_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_session() {
        let (pool, repo) = setup_test_repo().await;
        let user_id = create_test_user(&pool, "admin").await;

        let session = test_session(user_id, 24);
        repo.create(&session).await.expect("Failed to create");

        let found = repo
            .get_by_id(&session.id)
            .await
            .expect("Failed to get")
            .expect("Session not found");
        assert_eq!(found.id, session.id);
        assert_eq!(found.user_id, user_id);
    }

    #[tokio::test]
    async fn test_get_unknown_session_returns_none() {
        let (_pool, repo) = setup_test_repo().await;
        let found = repo
            .get_by_id("unknown-session-id")
            .await
            .expect("Failed to get");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_get_does_not_check_expiry() {
        let (pool, repo) = setup_test_repo().await;
        let user_id = create_test_user(&pool, "admin").await;

        // Expired an hour ago; the repository still returns it verbatim
        let session = test_session(user_id, -1);
        repo.create(&session).await.expect("Failed to create");

        let found = repo
            .get_by_id(&session.id)
            .await
            .expect("Failed to get")
            .expect("Session not found");
        assert!(found.is_expired());
    }

    #[tokio::test]
    async fn test_delete_session() {
        let (pool, repo) = setup_test_repo().await;
        let user_id = create_test_user(&pool, "admin").await;

        let session = test_session(user_id, 24);
        repo.create(&session).await.expect("Failed to create");

        repo.delete(&session.id).await.expect("Failed to delete");
        assert!(repo.get_by_id(&session.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_unknown_session_is_ok() {
        let (_pool, repo) = setup_test_repo().await;
        repo.delete("never-existed")
            .await
            .expect("Deleting an unknown session should not error");
    }

    #[tokio::test]
    async fn test_delete_by_user() {
        let (pool, repo) = setup_test_repo().await;
        let first = create_test_user(&pool, "admin").await;
        let second = create_test_user(&pool, "editor").await;

        let session1 = test_session(first, 24);
        let session2 = test_session(first, 24);
        let session3 = test_session(second, 24);
        repo.create(&session1).await.unwrap();
        repo.create(&session2).await.unwrap();
        repo.create(&session3).await.unwrap();

        repo.delete_by_user(first).await.expect("Failed to delete");

        assert!(repo.get_by_id(&session1.id).await.unwrap().is_none());
        assert!(repo.get_by_id(&session2.id).await.unwrap().is_none());
        assert!(repo.get_by_id(&session3.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_expired() {
        let (pool, repo) = setup_test_repo().await;
        let user_id = create_test_user(&pool, "admin").await;

        let expired = test_session(user_id, -1);
        let valid = test_session(user_id, 24);
        repo.create(&expired).await.unwrap();
        repo.create(&valid).await.unwrap();

        let deleted = repo.delete_expired().await.expect("Failed to delete");
        assert_eq!(deleted, 1);

        assert!(repo.get_by_id(&expired.id).await.unwrap().is_none());
        assert!(repo.get_by_id(&valid.id).await.unwrap().is_some());
    }
}
