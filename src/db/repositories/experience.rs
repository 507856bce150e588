//! Resume experience repository

use crate::config::DatabaseDriver;
use crate::db::repositories::{decode_string_list, encode_string_list};
use crate::db::DynDatabasePool;
use crate::models::Experience;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

#[async_trait]
pub trait ExperienceRepository: Send + Sync {
    async fn create(&self, experience: &Experience) -> Result<Experience>;
    async fn get_by_id(&self, id: i64) -> Result<Option<Experience>>;
    async fn list(&self) -> Result<Vec<Experience>>;
    async fn update(&self, experience: &Experience) -> Result<Experience>;
    async fn delete(&self, id: i64) -> Result<()>;
}

pub struct SqlxExperienceRepository {
    pool: DynDatabasePool,
}

impl SqlxExperienceRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn ExperienceRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ExperienceRepository for SqlxExperienceRepository {
    async fn create(&self, experience: &Experience) -> Result<Experience> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_sqlite(self.pool.as_sqlite().unwrap(), experience).await
            }
            DatabaseDriver::Mysql => create_mysql(self.pool.as_mysql().unwrap(), experience).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Experience>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_by_id_sqlite(self.pool.as_sqlite().unwrap(), id).await,
            DatabaseDriver::Mysql => get_by_id_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }

    async fn list(&self) -> Result<Vec<Experience>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Mysql => list_mysql(self.pool.as_mysql().unwrap()).await,
        }
    }

    async fn update(&self, experience: &Experience) -> Result<Experience> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                update_sqlite(self.pool.as_sqlite().unwrap(), experience).await
            }
            DatabaseDriver::Mysql => update_mysql(self.pool.as_mysql().unwrap(), experience).await,
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let query = "DELETE FROM experiences WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(query)
                    .bind(id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to delete experience")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(query)
                    .bind(id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to delete experience")?;
            }
        }
        Ok(())
    }
}

const COLUMNS: &str = "id, title, company, location, start_date, end_date, description, \
                       achievements, technologies, sort_order";

const INSERT: &str = "INSERT INTO experiences (title, company, location, start_date, end_date, \
                      description, achievements, technologies, sort_order) \
                      VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)";

const UPDATE: &str = "UPDATE experiences SET title = ?, company = ?, location = ?, \
                      start_date = ?, end_date = ?, description = ?, achievements = ?, \
                      technologies = ?, sort_order = ? WHERE id = ?";

// SQLite implementations

async fn create_sqlite(pool: &SqlitePool, experience: &Experience) -> Result<Experience> {
    let result = sqlx::query(INSERT)
        .bind(&experience.title)
        .bind(&experience.company)
        .bind(&experience.location)
        .bind(&experience.start_date)
        .bind(&experience.end_date)
        .bind(&experience.description)
        .bind(encode_string_list(&experience.achievements))
        .bind(encode_string_list(&experience.technologies))
        .bind(experience.sort_order)
        .execute(pool)
        .await
        .context("Failed to create experience")?;

    let mut created = experience.clone();
    created.id = result.last_insert_rowid();
    Ok(created)
}

async fn get_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Experience>> {
    let row = sqlx::query(&format!("SELECT {} FROM experiences WHERE id = ?", COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get experience")?;
    row.map(|r| row_to_experience_sqlite(&r)).transpose()
}

async fn list_sqlite(pool: &SqlitePool) -> Result<Vec<Experience>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM experiences ORDER BY sort_order",
        COLUMNS
    ))
    .fetch_all(pool)
    .await
    .context("Failed to list experiences")?;
    rows.iter().map(row_to_experience_sqlite).collect()
}

async fn update_sqlite(pool: &SqlitePool, experience: &Experience) -> Result<Experience> {
    sqlx::query(UPDATE)
        .bind(&experience.title)
        .bind(&experience.company)
        .bind(&experience.location)
        .bind(&experience.start_date)
        .bind(&experience.end_date)
        .bind(&experience.description)
        .bind(encode_string_list(&experience.achievements))
        .bind(encode_string_list(&experience.technologies))
        .bind(experience.sort_order)
        .bind(experience.id)
        .execute(pool)
        .await
        .context("Failed to update experience")?;

    get_by_id_sqlite(pool, experience.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Experience not found after update"))
}

fn row_to_experience_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Experience> {
    Ok(Experience {
        id: row.get("id"),
        title: row.get("title"),
        company: row.get("company"),
        location: row.get("location"),
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
        description: row.get("description"),
        achievements: decode_string_list(row.get("achievements")),
        technologies: decode_string_list(row.get("technologies")),
        sort_order: row.get("sort_order"),
    })
}

// MySQL implementations

async fn create_mysql(pool: &MySqlPool, experience: &Experience) -> Result<Experience> {
    let result = sqlx::query(INSERT)
        .bind(&experience.title)
        .bind(&experience.company)
        .bind(&experience.location)
        .bind(&experience.start_date)
        .bind(&experience.end_date)
        .bind(&experience.description)
        .bind(encode_string_list(&experience.achievements))
        .bind(encode_string_list(&experience.technologies))
        .bind(experience.sort_order)
        .execute(pool)
        .await
        .context("Failed to create experience")?;

    let mut created = experience.clone();
    created.id = result.last_insert_id() as i64;
    Ok(created)
}

async fn get_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Experience>> {
    let row = sqlx::query(&format!("SELECT {} FROM experiences WHERE id = ?", COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get experience")?;
    row.map(|r| row_to_experience_mysql(&r)).transpose()
}

async fn list_mysql(pool: &MySqlPool) -> Result<Vec<Experience>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM experiences ORDER BY sort_order",
        COLUMNS
    ))
    .fetch_all(pool)
    .await
    .context("Failed to list experiences")?;
    rows.iter().map(row_to_experience_mysql).collect()
}

async fn update_mysql(pool: &MySqlPool, experience: &Experience) -> Result<Experience> {
    sqlx::query(UPDATE)
        .bind(&experience.title)
        .bind(&experience.company)
        .bind(&experience.location)
        .bind(&experience.start_date)
        .bind(&experience.end_date)
        .bind(&experience.description)
        .bind(encode_string_list(&experience.achievements))
        .bind(encode_string_list(&experience.technologies))
        .bind(experience.sort_order)
        .bind(experience.id)
        .execute(pool)
        .await
        .context("Failed to update experience")?;

    get_by_id_mysql(pool, experience.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Experience not found after update"))
}

fn row_to_experience_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Experience> {
    Ok(Experience {
        id: row.get("id"),
        title: row.get("title"),
        company: row.get("company"),
        location: row.get("location"),
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
        description: row.get("description"),
        achievements: decode_string_list(row.get("achievements")),
        technologies: decode_string_list(row.get("technologies")),
        sort_order: row.get("sort_order"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_repo() -> SqlxExperienceRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxExperienceRepository::new(pool)
    }

    fn test_experience(company: &str, sort_order: i32) -> Experience {
        Experience {
            id: 0,
            title: "Backend Engineer".into(),
            company: company.into(),
            location: Some("Remote".into()),
            start_date: "2021-03".into(),
            end_date: None,
            description: Some("API and infrastructure work".into()),
            achievements: vec!["Cut p99 latency in half".into()],
            technologies: vec!["rust".into(), "postgres".into()],
            sort_order,
        }
    }

    #[tokio::test]
    async fn test_create_roundtrips_lists() {
        let repo = setup_test_repo().await;

        let created = repo.create(&test_experience("Acme", 0)).await.unwrap();
        let found = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.achievements.len(), 1);
        assert_eq!(found.technologies, vec!["rust".to_string(), "postgres".to_string()]);
        assert!(found.end_date.is_none());
    }

    #[tokio::test]
    async fn test_list_is_ordered() {
        let repo = setup_test_repo().await;

        repo.create(&test_experience("Second", 1)).await.unwrap();
        repo.create(&test_experience("First", 0)).await.unwrap();

        let list = repo.list().await.unwrap();
        assert_eq!(list[0].company, "First");
        assert_eq!(list[1].company, "Second");
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repo = setup_test_repo().await;

        let mut created = repo.create(&test_experience("Acme", 0)).await.unwrap();
        created.end_date = Some("2024-01".into());
        let updated = repo.update(&created).await.unwrap();
        assert_eq!(updated.end_date.as_deref(), Some("2024-01"));

        repo.delete(created.id).await.unwrap();
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
    }
}
