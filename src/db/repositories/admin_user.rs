//! Admin account repository
//!
//! Database operations for administrative credentials. The hash and salt
//! columns only ever travel between here and the auth service; nothing else
//! reads them.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::AdminUser;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Admin account repository trait
#[async_trait]
pub trait AdminUserRepository: Send + Sync {
    /// Create a new account
    async fn create(&self, user: &AdminUser) -> Result<AdminUser>;

    /// Look up an account by username
    async fn get_by_username(&self, username: &str) -> Result<Option<AdminUser>>;

    /// Look up an account by id
    async fn get_by_id(&self, id: i64) -> Result<Option<AdminUser>>;

    /// Replace hash and salt in a single statement
    async fn update_password(&self, id: i64, password_hash: &str, salt: &str) -> Result<()>;

    /// Stamp the last successful login
    async fn update_last_login(&self, id: i64) -> Result<()>;

    /// Number of accounts (used for first-run bootstrap)
    async fn count(&self) -> Result<i64>;
}

/// SQLx-based admin account repository supporting SQLite and MySQL.
pub struct SqlxAdminUserRepository {
    pool: DynDatabasePool,
}

impl SqlxAdminUserRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn AdminUserRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl AdminUserRepository for SqlxAdminUserRepository {
    async fn create(&self, user: &AdminUser) -> Result<AdminUser> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_sqlite(self.pool.as_sqlite().unwrap(), user).await,
            DatabaseDriver::Mysql => create_mysql(self.pool.as_mysql().unwrap(), user).await,
        }
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<AdminUser>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_by_username_sqlite(self.pool.as_sqlite().unwrap(), username).await
            }
            DatabaseDriver::Mysql => {
                get_by_username_mysql(self.pool.as_mysql().unwrap(), username).await
            }
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<AdminUser>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_by_id_sqlite(self.pool.as_sqlite().unwrap(), id).await,
            DatabaseDriver::Mysql => get_by_id_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }

    async fn update_password(&self, id: i64, password_hash: &str, salt: &str) -> Result<()> {
        let query = "UPDATE admin_users SET password_hash = ?, salt = ? WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(query)
                    .bind(password_hash)
                    .bind(salt)
                    .bind(id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to update password")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(query)
                    .bind(password_hash)
                    .bind(salt)
                    .bind(id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to update password")?;
            }
        }
        Ok(())
    }

    async fn update_last_login(&self, id: i64) -> Result<()> {
        let now = chrono::Utc::now();
        let query = "UPDATE admin_users SET last_login_at = ? WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(query)
                    .bind(now)
                    .bind(id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to update last login")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(query)
                    .bind(now)
                    .bind(id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to update last login")?;
            }
        }
        Ok(())
    }

    async fn count(&self) -> Result<i64> {
        let query = "SELECT COUNT(*) FROM admin_users";
        let count: i64 = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query_scalar(query)
                .fetch_one(self.pool.as_sqlite().unwrap())
                .await
                .context("Failed to count admin users")?,
            DatabaseDriver::Mysql => sqlx::query_scalar(query)
                .fetch_one(self.pool.as_mysql().unwrap())
                .await
                .context("Failed to count admin users")?,
        };
        Ok(count)
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

const COLUMNS: &str = "id, username, password_hash, salt, is_active, last_login_at, created_at";

async fn create_sqlite(pool: &SqlitePool, user: &AdminUser) -> Result<AdminUser> {
    let result = sqlx::query(
        r#"
        INSERT INTO admin_users (username, password_hash, salt, is_active, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&user.username)
    .bind(&user.password_hash)
    .bind(&user.salt)
    .bind(user.is_active)
    .bind(user.created_at)
    .execute(pool)
    .await
    .context("Failed to create admin user")?;

    let mut created = user.clone();
    created.id = result.last_insert_rowid();
    Ok(created)
}

async fn get_by_username_sqlite(pool: &SqlitePool, username: &str) -> Result<Option<AdminUser>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM admin_users WHERE username = ?",
        COLUMNS
    ))
    .bind(username)
    .fetch_optional(pool)
    .await
    .context("Failed to get admin user by username")?;

    row.map(|r| row_to_user_sqlite(&r)).transpose()
}

async fn get_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<AdminUser>> {
    let row = sqlx::query(&format!("SELECT {} FROM admin_users WHERE id = ?", COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get admin user by id")?;

    row.map(|r| row_to_user_sqlite(&r)).transpose()
}

fn row_to_user_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<AdminUser> {
    Ok(AdminUser {
        id: row.get("id"),
        username: row.get("username"),
        password_hash: row.get("password_hash"),
        salt: row.get("salt"),
        is_active: row.get("is_active"),
        last_login_at: row.get("last_login_at"),
        created_at: row.get("created_at"),
    })
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_mysql(pool: &MySqlPool, user: &AdminUser) -> Result<AdminUser> {
    let result = sqlx::query(
        r#"
        INSERT INTO admin_users (username, password_hash, salt, is_active, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&user.username)
    .bind(&user.password_hash)
    .bind(&user.salt)
    .bind(user.is_active)
    .bind(user.created_at)
    .execute(pool)
    .await
    .context("Failed to create admin user")?;

    let mut created = user.clone();
    created.id = result.last_insert_id() as i64;
    Ok(created)
}

async fn get_by_username_mysql(pool: &MySqlPool, username: &str) -> Result<Option<AdminUser>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM admin_users WHERE username = ?",
        COLUMNS
    ))
    .bind(username)
    .fetch_optional(pool)
    .await
    .context("Failed to get admin user by username")?;

    row.map(|r| row_to_user_mysql(&r)).transpose()
}

async fn get_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<AdminUser>> {
    let row = sqlx::query(&format!("SELECT {} FROM admin_users WHERE id = ?", COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get admin user by id")?;

    row.map(|r| row_to_user_mysql(&r)).transpose()
}

fn row_to_user_mysql(row: &sqlx::mysql::MySqlRow) -> Result<AdminUser> {
    Ok(AdminUser {
        id: row.get("id"),
        username: row.get("username"),
        password_hash: row.get("password_hash"),
        salt: row.get("salt"),
        is_active: row.get("is_active"),
        last_login_at: row.get("last_login_at"),
        created_at: row.get("created_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_repo() -> SqlxAdminUserRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxAdminUserRepository::new(pool)
    }

    #[tokio::test]
    async fn test_create_and_get_by_username() {
        let repo = setup_test_repo().await;

        let user = AdminUser::new("admin".into(), "hash".into(), "salt".into());
        let created = repo.create(&user).await.expect("Failed to create");
        assert!(created.id > 0);

        let found = repo
            .get_by_username("admin")
            .await
            .expect("Failed to get")
            .expect("User not found");
        assert_eq!(found.id, created.id);
        assert_eq!(found.password_hash, "hash");
        assert_eq!(found.salt, "salt");
        assert!(found.is_active);
        assert!(found.last_login_at.is_none());
    }

    #[tokio::test]
    async fn test_get_unknown_username_returns_none() {
        let repo = setup_test_repo().await;
        let found = repo.get_by_username("ghost").await.expect("Failed to get");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_fails() {
        let repo = setup_test_repo().await;

        let user = AdminUser::new("admin".into(), "hash".into(), "salt".into());
        repo.create(&user).await.expect("Failed to create");
        assert!(repo.create(&user).await.is_err());
    }

    #[tokio::test]
    async fn test_update_password_replaces_hash_and_salt() {
        let repo = setup_test_repo().await;

        let user = AdminUser::new("admin".into(), "old-hash".into(), "old-salt".into());
        let created = repo.create(&user).await.expect("Failed to create");

        repo.update_password(created.id, "new-hash", "new-salt")
            .await
            .expect("Failed to update password");

        let found = repo
            .get_by_id(created.id)
            .await
            .expect("Failed to get")
            .expect("User not found");
        assert_eq!(found.password_hash, "new-hash");
        assert_eq!(found.salt, "new-salt");
    }

    #[tokio::test]
    async fn test_update_last_login() {
        let repo = setup_test_repo().await;

        let user = AdminUser::new("admin".into(), "hash".into(), "salt".into());
        let created = repo.create(&user).await.expect("Failed to create");

        repo.update_last_login(created.id)
            .await
            .expect("Failed to update last login");

        let found = repo
            .get_by_id(created.id)
            .await
            .expect("Failed to get")
            .expect("User not found");
        assert!(found.last_login_at.is_some());
    }

    #[tokio::test]
    async fn test_count() {
        let repo = setup_test_repo().await;
        assert_eq!(repo.count().await.unwrap(), 0);

        let user = AdminUser::new("admin".into(), "hash".into(), "salt".into());
        repo.create(&user).await.expect("Failed to create");
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
