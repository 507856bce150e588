//! Project repository

use crate::config::DatabaseDriver;
use crate::db::repositories::{decode_string_list, encode_string_list};
use crate::db::DynDatabasePool;
use crate::models::Project;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create(&self, project: &Project) -> Result<Project>;
    async fn get_by_id(&self, id: i64) -> Result<Option<Project>>;
    /// List projects, optionally filtered to featured ones, in sort order.
    async fn list(&self, featured: Option<bool>) -> Result<Vec<Project>>;
    async fn update(&self, project: &Project) -> Result<Project>;
    async fn delete(&self, id: i64) -> Result<()>;
}

pub struct SqlxProjectRepository {
    pool: DynDatabasePool,
}

impl SqlxProjectRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn ProjectRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ProjectRepository for SqlxProjectRepository {
    async fn create(&self, project: &Project) -> Result<Project> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_sqlite(self.pool.as_sqlite().unwrap(), project).await,
            DatabaseDriver::Mysql => create_mysql(self.pool.as_mysql().unwrap(), project).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Project>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_by_id_sqlite(self.pool.as_sqlite().unwrap(), id).await,
            DatabaseDriver::Mysql => get_by_id_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }

    async fn list(&self, featured: Option<bool>) -> Result<Vec<Project>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_sqlite(self.pool.as_sqlite().unwrap(), featured).await,
            DatabaseDriver::Mysql => list_mysql(self.pool.as_mysql().unwrap(), featured).await,
        }
    }

    async fn update(&self, project: &Project) -> Result<Project> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => update_sqlite(self.pool.as_sqlite().unwrap(), project).await,
            DatabaseDriver::Mysql => update_mysql(self.pool.as_mysql().unwrap(), project).await,
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let query = "DELETE FROM projects WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(query)
                    .bind(id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to delete project")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(query)
                    .bind(id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to delete project")?;
            }
        }
        Ok(())
    }
}

const COLUMNS: &str = "id, name, description, technologies, github_url, live_url, image_url, \
                       featured, stars, forks, language, sort_order, created_at, updated_at";

const INSERT: &str = "INSERT INTO projects (name, description, technologies, github_url, \
                      live_url, image_url, featured, stars, forks, language, sort_order, \
                      created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";

const UPDATE: &str = "UPDATE projects SET name = ?, description = ?, technologies = ?, \
                      github_url = ?, live_url = ?, image_url = ?, featured = ?, stars = ?, \
                      forks = ?, language = ?, sort_order = ?, updated_at = ? WHERE id = ?";

// SQLite implementations

async fn create_sqlite(pool: &SqlitePool, project: &Project) -> Result<Project> {
    let result = sqlx::query(INSERT)
        .bind(&project.name)
        .bind(&project.description)
        .bind(encode_string_list(&project.technologies))
        .bind(&project.github_url)
        .bind(&project.live_url)
        .bind(&project.image_url)
        .bind(project.featured)
        .bind(project.stars)
        .bind(project.forks)
        .bind(&project.language)
        .bind(project.sort_order)
        .bind(project.created_at)
        .bind(project.updated_at)
        .execute(pool)
        .await
        .context("Failed to create project")?;

    let mut created = project.clone();
    created.id = result.last_insert_rowid();
    Ok(created)
}

async fn get_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Project>> {
    let row = sqlx::query(&format!("SELECT {} FROM projects WHERE id = ?", COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get project")?;
    row.map(|r| row_to_project_sqlite(&r)).transpose()
}

async fn list_sqlite(pool: &SqlitePool, featured: Option<bool>) -> Result<Vec<Project>> {
    let rows = match featured {
        Some(flag) => {
            sqlx::query(&format!(
                "SELECT {} FROM projects WHERE featured = ? ORDER BY sort_order",
                COLUMNS
            ))
            .bind(flag)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query(&format!(
                "SELECT {} FROM projects ORDER BY sort_order",
                COLUMNS
            ))
            .fetch_all(pool)
            .await
        }
    }
    .context("Failed to list projects")?;

    rows.iter().map(row_to_project_sqlite).collect()
}

async fn update_sqlite(pool: &SqlitePool, project: &Project) -> Result<Project> {
    sqlx::query(UPDATE)
        .bind(&project.name)
        .bind(&project.description)
        .bind(encode_string_list(&project.technologies))
        .bind(&project.github_url)
        .bind(&project.live_url)
        .bind(&project.image_url)
        .bind(project.featured)
        .bind(project.stars)
        .bind(project.forks)
        .bind(&project.language)
        .bind(project.sort_order)
        .bind(Utc::now())
        .bind(project.id)
        .execute(pool)
        .await
        .context("Failed to update project")?;

    get_by_id_sqlite(pool, project.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Project not found after update"))
}

fn row_to_project_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Project> {
    Ok(Project {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        technologies: decode_string_list(row.get("technologies")),
        github_url: row.get("github_url"),
        live_url: row.get("live_url"),
        image_url: row.get("image_url"),
        featured: row.get("featured"),
        stars: row.get("stars"),
        forks: row.get("forks"),
        language: row.get("language"),
        sort_order: row.get("sort_order"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

// MySQL implementations

async fn create_mysql(pool: &MySqlPool, project: &Project) -> Result<Project> {
    let result = sqlx::query(INSERT)
        .bind(&project.name)
        .bind(&project.description)
        .bind(encode_string_list(&project.technologies))
        .bind(&project.github_url)
        .bind(&project.live_url)
        .bind(&project.image_url)
        .bind(project.featured)
        .bind(project.stars)
        .bind(project.forks)
        .bind(&project.language)
        .bind(project.sort_order)
        .bind(project.created_at)
        .bind(project.updated_at)
        .execute(pool)
        .await
        .context("Failed to create project")?;

    let mut created = project.clone();
    created.id = result.last_insert_id() as i64;
    Ok(created)
}

async fn get_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Project>> {
    let row = sqlx::query(&format!("SELECT {} FROM projects WHERE id = ?", COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get project")?;
    row.map(|r| row_to_project_mysql(&r)).transpose()
}

async fn list_mysql(pool: &MySqlPool, featured: Option<bool>) -> Result<Vec<Project>> {
    let rows = match featured {
        Some(flag) => {
            sqlx::query(&format!(
                "SELECT {} FROM projects WHERE featured = ? ORDER BY sort_order",
                COLUMNS
            ))
            .bind(flag)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query(&format!(
                "SELECT {} FROM projects ORDER BY sort_order",
                COLUMNS
            ))
            .fetch_all(pool)
            .await
        }
    }
    .context("Failed to list projects")?;

    rows.iter().map(row_to_project_mysql).collect()
}

async fn update_mysql(pool: &MySqlPool, project: &Project) -> Result<Project> {
    sqlx::query(UPDATE)
        .bind(&project.name)
        .bind(&project.description)
        .bind(encode_string_list(&project.technologies))
        .bind(&project.github_url)
        .bind(&project.live_url)
        .bind(&project.image_url)
        .bind(project.featured)
        .bind(project.stars)
        .bind(project.forks)
        .bind(&project.language)
        .bind(project.sort_order)
        .bind(Utc::now())
        .bind(project.id)
        .execute(pool)
        .await
        .context("Failed to update project")?;

    get_by_id_mysql(pool, project.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Project not found after update"))
}

fn row_to_project_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Project> {
    Ok(Project {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        technologies: decode_string_list(row.get("technologies")),
        github_url: row.get("github_url"),
        live_url: row.get("live_url"),
        image_url: row.get("image_url"),
        featured: row.get("featured"),
        stars: row.get("stars"),
        forks: row.get("forks"),
        language: row.get("language"),
        sort_order: row.get("sort_order"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_repo() -> SqlxProjectRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxProjectRepository::new(pool)
    }

    fn test_project(name: &str, featured: bool) -> Project {
        let now = Utc::now();
        Project {
            id: 0,
            name: name.into(),
            description: "A side project".into(),
            technologies: vec!["rust".into()],
            github_url: Some("https://github.com/someone/project".into()),
            live_url: None,
            image_url: None,
            featured,
            stars: 42,
            forks: 3,
            language: Some("Rust".into()),
            sort_order: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = setup_test_repo().await;

        let created = repo.create(&test_project("folio", true)).await.unwrap();
        let found = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.name, "folio");
        assert_eq!(found.stars, 42);
        assert_eq!(found.technologies, vec!["rust".to_string()]);
    }

    #[tokio::test]
    async fn test_list_filters_featured() {
        let repo = setup_test_repo().await;

        repo.create(&test_project("featured", true)).await.unwrap();
        repo.create(&test_project("plain", false)).await.unwrap();

        assert_eq!(repo.list(None).await.unwrap().len(), 2);
        let featured = repo.list(Some(true)).await.unwrap();
        assert_eq!(featured.len(), 1);
        assert_eq!(featured[0].name, "featured");
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repo = setup_test_repo().await;

        let mut created = repo.create(&test_project("folio", false)).await.unwrap();
        created.featured = true;
        created.stars = 100;
        let updated = repo.update(&created).await.unwrap();
        assert!(updated.featured);
        assert_eq!(updated.stars, 100);

        repo.delete(created.id).await.unwrap();
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
    }
}
