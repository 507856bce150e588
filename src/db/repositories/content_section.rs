//! Content section repository
//!
//! Sections are addressed by their unique key; writes are upserts so the
//! admin editor never has to care whether a section exists yet.

use crate::config::DatabaseDriver;
use crate::db::repositories::{decode_json, encode_json};
use crate::db::DynDatabasePool;
use crate::models::{ContentSection, UpsertContentSectionInput};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

#[async_trait]
pub trait ContentSectionRepository: Send + Sync {
    async fn get_by_key(&self, section_key: &str) -> Result<Option<ContentSection>>;
    async fn upsert(
        &self,
        section_key: &str,
        input: &UpsertContentSectionInput,
    ) -> Result<ContentSection>;
}

pub struct SqlxContentSectionRepository {
    pool: DynDatabasePool,
}

impl SqlxContentSectionRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn ContentSectionRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ContentSectionRepository for SqlxContentSectionRepository {
    async fn get_by_key(&self, section_key: &str) -> Result<Option<ContentSection>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_by_key_sqlite(self.pool.as_sqlite().unwrap(), section_key).await
            }
            DatabaseDriver::Mysql => {
                get_by_key_mysql(self.pool.as_mysql().unwrap(), section_key).await
            }
        }
    }

    async fn upsert(
        &self,
        section_key: &str,
        input: &UpsertContentSectionInput,
    ) -> Result<ContentSection> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                upsert_sqlite(self.pool.as_sqlite().unwrap(), section_key, input).await
            }
            DatabaseDriver::Mysql => {
                upsert_mysql(self.pool.as_mysql().unwrap(), section_key, input).await
            }
        }
    }
}

const COLUMNS: &str = "id, section_key, title, subtitle, content, metadata, updated_at";

// SQLite implementations

async fn get_by_key_sqlite(pool: &SqlitePool, key: &str) -> Result<Option<ContentSection>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM content_sections WHERE section_key = ?",
        COLUMNS
    ))
    .bind(key)
    .fetch_optional(pool)
    .await
    .context("Failed to get content section")?;
    row.map(|r| row_to_section_sqlite(&r)).transpose()
}

async fn upsert_sqlite(
    pool: &SqlitePool,
    key: &str,
    input: &UpsertContentSectionInput,
) -> Result<ContentSection> {
    let now = Utc::now();
    sqlx::query(
        r#"
        INSERT INTO content_sections (section_key, title, subtitle, content, metadata, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(section_key) DO UPDATE SET
            title = excluded.title,
            subtitle = excluded.subtitle,
            content = excluded.content,
            metadata = excluded.metadata,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(key)
    .bind(&input.title)
    .bind(&input.subtitle)
    .bind(&input.content)
    .bind(encode_json(&input.metadata))
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to upsert content section")?;

    get_by_key_sqlite(pool, key)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Content section not found after upsert"))
}

fn row_to_section_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<ContentSection> {
    Ok(ContentSection {
        id: row.get("id"),
        section_key: row.get("section_key"),
        title: row.get("title"),
        subtitle: row.get("subtitle"),
        content: row.get("content"),
        metadata: decode_json(row.get("metadata")),
        updated_at: row.get("updated_at"),
    })
}

// MySQL implementations

async fn get_by_key_mysql(pool: &MySqlPool, key: &str) -> Result<Option<ContentSection>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM content_sections WHERE section_key = ?",
        COLUMNS
    ))
    .bind(key)
    .fetch_optional(pool)
    .await
    .context("Failed to get content section")?;
    row.map(|r| row_to_section_mysql(&r)).transpose()
}

async fn upsert_mysql(
    pool: &MySqlPool,
    key: &str,
    input: &UpsertContentSectionInput,
) -> Result<ContentSection> {
    let now = Utc::now();
    sqlx::query(
        r#"
        INSERT INTO content_sections (section_key, title, subtitle, content, metadata, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ON DUPLICATE KEY UPDATE
            title = VALUES(title),
            subtitle = VALUES(subtitle),
            content = VALUES(content),
            metadata = VALUES(metadata),
            updated_at = VALUES(updated_at)
        "#,
    )
    .bind(key)
    .bind(&input.title)
    .bind(&input.subtitle)
    .bind(&input.content)
    .bind(encode_json(&input.metadata))
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to upsert content section")?;

    get_by_key_mysql(pool, key)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Content section not found after upsert"))
}

fn row_to_section_mysql(row: &sqlx::mysql::MySqlRow) -> Result<ContentSection> {
    Ok(ContentSection {
        id: row.get("id"),
        section_key: row.get("section_key"),
        title: row.get("title"),
        subtitle: row.get("subtitle"),
        content: row.get("content"),
        metadata: decode_json(row.get("metadata")),
        updated_at: row.get("updated_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_repo() -> SqlxContentSectionRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxContentSectionRepository::new(pool)
    }

    #[tokio::test]
    async fn test_get_missing_section_returns_none() {
        let repo = setup_test_repo().await;
        assert!(repo.get_by_key("hero").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_creates_then_updates() {
        let repo = setup_test_repo().await;

        let input = UpsertContentSectionInput {
            title: Some("Hi, I'm Sam".into()),
            subtitle: Some("Software engineer".into()),
            content: None,
            metadata: serde_json::json!({"cta": "Get in touch"}),
        };
        let created = repo.upsert("hero", &input).await.unwrap();
        assert_eq!(created.section_key, "hero");
        assert_eq!(created.title.as_deref(), Some("Hi, I'm Sam"));
        assert_eq!(created.metadata["cta"], "Get in touch");

        let input = UpsertContentSectionInput {
            title: Some("Hello".into()),
            subtitle: None,
            content: Some("About me...".into()),
            metadata: serde_json::Value::Null,
        };
        let updated = repo.upsert("hero", &input).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title.as_deref(), Some("Hello"));
        assert!(updated.subtitle.is_none());
        assert!(updated.metadata.is_null());
    }
}
