//! Database migrations module
//!
//! Code-based migrations for the Folio portfolio system. All migrations are
//! embedded directly in Rust code as SQL strings, supporting both SQLite and
//! MySQL databases for single-binary deployment.
//!
//! Each migration is defined as a `Migration` struct containing:
//! - `version`: Unique version number for ordering
//! - `name`: Human-readable migration name
//! - `up_sqlite`: SQL for SQLite
//! - `up_mysql`: SQL for MySQL

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row, SqlitePool};

use super::DynDatabasePool;
use crate::config::DatabaseDriver;

/// A database migration with SQL for both SQLite and MySQL
#[derive(Debug, Clone)]
pub struct Migration {
    /// Migration version number (unique and sequential)
    pub version: i32,
    /// Human-readable migration name
    pub name: &'static str,
    /// SQL statements for SQLite
    pub up_sqlite: &'static str,
    /// SQL statements for MySQL
    pub up_mysql: &'static str,
}

/// Migration record stored in the database
#[derive(Debug, Clone)]
pub struct MigrationRecord {
    pub version: i64,
    pub name: String,
    pub applied_at: DateTime<Utc>,
}

/// All migrations for the Folio portfolio system.
pub const MIGRATIONS: &[Migration] = &[
    // Migration 1: Administrative accounts.
    // Salt is unique per account and generated once at creation.
    Migration {
        version: 1,
        name: "create_admin_users",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS admin_users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username VARCHAR(50) NOT NULL UNIQUE,
                password_hash VARCHAR(128) NOT NULL,
                salt VARCHAR(32) NOT NULL,
                is_active BOOLEAN NOT NULL DEFAULT 1,
                last_login_at TIMESTAMP,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_admin_users_username ON admin_users(username);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS admin_users (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                username VARCHAR(50) NOT NULL UNIQUE,
                password_hash VARCHAR(128) NOT NULL,
                salt VARCHAR(32) NOT NULL,
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                last_login_at TIMESTAMP NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX idx_admin_users_username ON admin_users(username);
        "#,
    },
    // Migration 2: Login sessions. The id is the opaque cookie token.
    Migration {
        version: 2,
        name: "create_admin_sessions",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS admin_sessions (
                id VARCHAR(64) PRIMARY KEY,
                user_id INTEGER NOT NULL,
                expires_at TIMESTAMP NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (user_id) REFERENCES admin_users(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_admin_sessions_user_id ON admin_sessions(user_id);
            CREATE INDEX IF NOT EXISTS idx_admin_sessions_expires_at ON admin_sessions(expires_at);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS admin_sessions (
                id VARCHAR(64) PRIMARY KEY,
                user_id BIGINT NOT NULL,
                expires_at TIMESTAMP NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (user_id) REFERENCES admin_users(id) ON DELETE CASCADE
            );
            CREATE INDEX idx_admin_sessions_user_id ON admin_sessions(user_id);
            CREATE INDEX idx_admin_sessions_expires_at ON admin_sessions(expires_at);
        "#,
    },
    // Migration 3: Navigation items
    Migration {
        version: 3,
        name: "create_navigation_items",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS navigation_items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                label VARCHAR(100) NOT NULL,
                href VARCHAR(255) NOT NULL,
                icon VARCHAR(100) NOT NULL,
                sort_order INTEGER NOT NULL DEFAULT 0,
                is_visible BOOLEAN NOT NULL DEFAULT 1
            );
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS navigation_items (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                label VARCHAR(100) NOT NULL,
                href VARCHAR(255) NOT NULL,
                icon VARCHAR(100) NOT NULL,
                sort_order INT NOT NULL DEFAULT 0,
                is_visible BOOLEAN NOT NULL DEFAULT TRUE
            );
        "#,
    },
    // Migration 4: Keyed content sections (hero, about, contact, ...)
    Migration {
        version: 4,
        name: "create_content_sections",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS content_sections (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                section_key VARCHAR(100) NOT NULL UNIQUE,
                title TEXT,
                subtitle TEXT,
                content TEXT,
                metadata TEXT,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_content_sections_key ON content_sections(section_key);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS content_sections (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                section_key VARCHAR(100) NOT NULL UNIQUE,
                title TEXT,
                subtitle TEXT,
                content TEXT,
                metadata TEXT,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX idx_content_sections_key ON content_sections(section_key);
        "#,
    },
    // Migration 5: Blog posts. Tags are stored as a JSON array.
    Migration {
        version: 5,
        name: "create_blog_posts",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS blog_posts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title VARCHAR(255) NOT NULL,
                slug VARCHAR(255) NOT NULL UNIQUE,
                excerpt TEXT,
                content TEXT NOT NULL,
                category VARCHAR(100) NOT NULL,
                tags TEXT,
                published_at TIMESTAMP,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                is_published BOOLEAN NOT NULL DEFAULT 0,
                read_time INTEGER,
                views INTEGER NOT NULL DEFAULT 0
            );
            CREATE INDEX IF NOT EXISTS idx_blog_posts_slug ON blog_posts(slug);
            CREATE INDEX IF NOT EXISTS idx_blog_posts_published ON blog_posts(is_published);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS blog_posts (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                title VARCHAR(255) NOT NULL,
                slug VARCHAR(255) NOT NULL UNIQUE,
                excerpt TEXT,
                content TEXT NOT NULL,
                category VARCHAR(100) NOT NULL,
                tags TEXT,
                published_at TIMESTAMP NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                is_published BOOLEAN NOT NULL DEFAULT FALSE,
                read_time INT,
                views BIGINT NOT NULL DEFAULT 0
            );
            CREATE INDEX idx_blog_posts_slug ON blog_posts(slug);
            CREATE INDEX idx_blog_posts_published ON blog_posts(is_published);
        "#,
    },
    // Migration 6: Resume experience entries
    Migration {
        version: 6,
        name: "create_experiences",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS experiences (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title VARCHAR(255) NOT NULL,
                company VARCHAR(255) NOT NULL,
                location VARCHAR(255),
                start_date VARCHAR(7) NOT NULL,
                end_date VARCHAR(7),
                description TEXT,
                achievements TEXT,
                technologies TEXT,
                sort_order INTEGER NOT NULL DEFAULT 0
            );
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS experiences (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                title VARCHAR(255) NOT NULL,
                company VARCHAR(255) NOT NULL,
                location VARCHAR(255),
                start_date VARCHAR(7) NOT NULL,
                end_date VARCHAR(7),
                description TEXT,
                achievements TEXT,
                technologies TEXT,
                sort_order INT NOT NULL DEFAULT 0
            );
        "#,
    },
    // Migration 7: Resume education entries
    Migration {
        version: 7,
        name: "create_education",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS education (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                degree VARCHAR(255) NOT NULL,
                institution VARCHAR(255) NOT NULL,
                location VARCHAR(255),
                start_year VARCHAR(4) NOT NULL,
                end_year VARCHAR(4),
                description TEXT,
                gpa VARCHAR(20),
                sort_order INTEGER NOT NULL DEFAULT 0
            );
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS education (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                degree VARCHAR(255) NOT NULL,
                institution VARCHAR(255) NOT NULL,
                location VARCHAR(255),
                start_year VARCHAR(4) NOT NULL,
                end_year VARCHAR(4),
                description TEXT,
                gpa VARCHAR(20),
                sort_order INT NOT NULL DEFAULT 0
            );
        "#,
    },
    // Migration 8: Skill categories and skills
    Migration {
        version: 8,
        name: "create_skills",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS skill_categories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name VARCHAR(100) NOT NULL,
                sort_order INTEGER NOT NULL DEFAULT 0
            );
            CREATE TABLE IF NOT EXISTS skills (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                category_id INTEGER,
                name VARCHAR(100) NOT NULL,
                level INTEGER NOT NULL,
                sort_order INTEGER NOT NULL DEFAULT 0,
                FOREIGN KEY (category_id) REFERENCES skill_categories(id) ON DELETE SET NULL
            );
            CREATE INDEX IF NOT EXISTS idx_skills_category_id ON skills(category_id);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS skill_categories (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                name VARCHAR(100) NOT NULL,
                sort_order INT NOT NULL DEFAULT 0
            );
            CREATE TABLE IF NOT EXISTS skills (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                category_id BIGINT,
                name VARCHAR(100) NOT NULL,
                level INT NOT NULL,
                sort_order INT NOT NULL DEFAULT 0,
                FOREIGN KEY (category_id) REFERENCES skill_categories(id) ON DELETE SET NULL
            );
            CREATE INDEX idx_skills_category_id ON skills(category_id);
        "#,
    },
    // Migration 9: Projects. Technologies are stored as a JSON array.
    Migration {
        version: 9,
        name: "create_projects",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS projects (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name VARCHAR(255) NOT NULL,
                description TEXT NOT NULL,
                technologies TEXT,
                github_url VARCHAR(255),
                live_url VARCHAR(255),
                image_url VARCHAR(255),
                featured BOOLEAN NOT NULL DEFAULT 0,
                stars INTEGER NOT NULL DEFAULT 0,
                forks INTEGER NOT NULL DEFAULT 0,
                language VARCHAR(100),
                sort_order INTEGER NOT NULL DEFAULT 0,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_projects_featured ON projects(featured);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS projects (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                name VARCHAR(255) NOT NULL,
                description TEXT NOT NULL,
                technologies TEXT,
                github_url VARCHAR(255),
                live_url VARCHAR(255),
                image_url VARCHAR(255),
                featured BOOLEAN NOT NULL DEFAULT FALSE,
                stars INT NOT NULL DEFAULT 0,
                forks INT NOT NULL DEFAULT 0,
                language VARCHAR(100),
                sort_order INT NOT NULL DEFAULT 0,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX idx_projects_featured ON projects(featured);
        "#,
    },
    // Migration 10: Profile singleton
    Migration {
        version: 10,
        name: "create_profile",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS profile (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name VARCHAR(255) NOT NULL,
                title VARCHAR(255) NOT NULL,
                email VARCHAR(255) NOT NULL,
                phone VARCHAR(50),
                location VARCHAR(255),
                bio TEXT,
                avatar_url VARCHAR(255),
                resume_url VARCHAR(255),
                social_links TEXT,
                theme_preference VARCHAR(20) NOT NULL DEFAULT 'dark',
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS profile (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                name VARCHAR(255) NOT NULL,
                title VARCHAR(255) NOT NULL,
                email VARCHAR(255) NOT NULL,
                phone VARCHAR(50),
                location VARCHAR(255),
                bio TEXT,
                avatar_url VARCHAR(255),
                resume_url VARCHAR(255),
                social_links TEXT,
                theme_preference VARCHAR(20) NOT NULL DEFAULT 'dark',
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
        "#,
    },
    // Migration 11: Contact form messages
    Migration {
        version: 11,
        name: "create_contact_messages",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS contact_messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name VARCHAR(255) NOT NULL,
                email VARCHAR(255) NOT NULL,
                subject VARCHAR(255),
                message TEXT NOT NULL,
                is_read BOOLEAN NOT NULL DEFAULT 0,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_contact_messages_is_read ON contact_messages(is_read);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS contact_messages (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                name VARCHAR(255) NOT NULL,
                email VARCHAR(255) NOT NULL,
                subject VARCHAR(255),
                message TEXT NOT NULL,
                is_read BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX idx_contact_messages_is_read ON contact_messages(is_read);
        "#,
    },
];

/// Run all pending migrations, returning how many were applied.
pub async fn run_migrations(pool: &DynDatabasePool) -> Result<usize> {
    create_migrations_table(pool).await?;

    let applied = get_applied_migrations(pool).await?;
    let applied_versions: Vec<i32> = applied.iter().map(|m| m.version as i32).collect();

    let mut count = 0;

    for migration in MIGRATIONS {
        if !applied_versions.contains(&migration.version) {
            tracing::info!(
                "Applying migration {}: {}",
                migration.version,
                migration.name
            );
            apply_migration(pool, migration)
                .await
                .with_context(|| format!("Failed to apply migration: {}", migration.name))?;
            count += 1;
        }
    }

    if count > 0 {
        tracing::info!("Applied {} migration(s)", count);
    } else {
        tracing::debug!("No pending migrations");
    }

    Ok(count)
}

/// Create the migrations tracking table if it doesn't exist
async fn create_migrations_table(pool: &DynDatabasePool) -> Result<()> {
    let sql = match pool.driver() {
        DatabaseDriver::Sqlite => {
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                name VARCHAR(255) NOT NULL UNIQUE,
                applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#
        }
        DatabaseDriver::Mysql => {
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version INT PRIMARY KEY,
                name VARCHAR(255) NOT NULL UNIQUE,
                applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#
        }
    };

    pool.execute(sql).await?;
    Ok(())
}

/// Get list of already applied migrations
async fn get_applied_migrations(pool: &DynDatabasePool) -> Result<Vec<MigrationRecord>> {
    match pool.driver() {
        DatabaseDriver::Sqlite => get_applied_migrations_sqlite(pool.as_sqlite().unwrap()).await,
        DatabaseDriver::Mysql => get_applied_migrations_mysql(pool.as_mysql().unwrap()).await,
    }
}

async fn get_applied_migrations_sqlite(pool: &SqlitePool) -> Result<Vec<MigrationRecord>> {
    let rows = sqlx::query("SELECT version, name, applied_at FROM _migrations ORDER BY version")
        .fetch_all(pool)
        .await?;

    let mut records = Vec::new();
    for row in rows {
        records.push(MigrationRecord {
            version: row.get("version"),
            name: row.get("name"),
            applied_at: row.get("applied_at"),
        });
    }

    Ok(records)
}

async fn get_applied_migrations_mysql(pool: &MySqlPool) -> Result<Vec<MigrationRecord>> {
    let rows = sqlx::query("SELECT version, name, applied_at FROM _migrations ORDER BY version")
        .fetch_all(pool)
        .await?;

    let mut records = Vec::new();
    for row in rows {
        records.push(MigrationRecord {
            version: row.get("version"),
            name: row.get("name"),
            applied_at: row.get("applied_at"),
        });
    }

    Ok(records)
}

/// Apply a single migration
async fn apply_migration(pool: &DynDatabasePool, migration: &Migration) -> Result<()> {
    match pool.driver() {
        DatabaseDriver::Sqlite => {
            apply_migration_sqlite(pool.as_sqlite().unwrap(), migration).await
        }
        DatabaseDriver::Mysql => apply_migration_mysql(pool.as_mysql().unwrap(), migration).await,
    }
}

async fn apply_migration_sqlite(pool: &SqlitePool, migration: &Migration) -> Result<()> {
    for statement in split_sql_statements(migration.up_sqlite) {
        let statement = statement.trim();
        if !statement.is_empty() {
            sqlx::query(statement)
                .execute(pool)
                .await
                .with_context(|| format!("Failed to execute: {}", truncate_sql(statement)))?;
        }
    }

    sqlx::query("INSERT INTO _migrations (version, name) VALUES (?, ?)")
        .bind(migration.version)
        .bind(migration.name)
        .execute(pool)
        .await?;

    Ok(())
}

async fn apply_migration_mysql(pool: &MySqlPool, migration: &Migration) -> Result<()> {
    for statement in split_sql_statements(migration.up_mysql) {
        let statement = statement.trim();
        if !statement.is_empty() {
            sqlx::query(statement)
                .execute(pool)
                .await
                .with_context(|| format!("Failed to execute: {}", truncate_sql(statement)))?;
        }
    }

    sqlx::query("INSERT INTO _migrations (version, name) VALUES (?, ?)")
        .bind(migration.version)
        .bind(migration.name)
        .execute(pool)
        .await?;

    Ok(())
}

/// Truncate SQL for error messages
fn truncate_sql(sql: &str) -> String {
    if sql.len() > 100 {
        format!("{}...", &sql[..100])
    } else {
        sql.to_string()
    }
}

/// Split SQL into individual statements on semicolons.
fn split_sql_statements(sql: &str) -> Vec<&str> {
    sql.split(';')
        .map(str::trim)
        .filter(|stmt| !stmt.is_empty())
        .collect()
}
