//! Resume education repository

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::Education;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

#[async_trait]
pub trait EducationRepository: Send + Sync {
    async fn create(&self, education: &Education) -> Result<Education>;
    async fn get_by_id(&self, id: i64) -> Result<Option<Education>>;
    async fn list(&self) -> Result<Vec<Education>>;
    async fn update(&self, education: &Education) -> Result<Education>;
    async fn delete(&self, id: i64) -> Result<()>;
}

pub struct SqlxEducationRepository {
    pool: DynDatabasePool,
}

impl SqlxEducationRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn EducationRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl EducationRepository for SqlxEducationRepository {
    async fn create(&self, education: &Education) -> Result<Education> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_sqlite(self.pool.as_sqlite().unwrap(), education).await,
            DatabaseDriver::Mysql => create_mysql(self.pool.as_mysql().unwrap(), education).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Education>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_by_id_sqlite(self.pool.as_sqlite().unwrap(), id).await,
            DatabaseDriver::Mysql => get_by_id_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }

    async fn list(&self) -> Result<Vec<Education>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Mysql => list_mysql(self.pool.as_mysql().unwrap()).await,
        }
    }

    async fn update(&self, education: &Education) -> Result<Education> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => update_sqlite(self.pool.as_sqlite().unwrap(), education).await,
            DatabaseDriver::Mysql => update_mysql(self.pool.as_mysql().unwrap(), education).await,
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let query = "DELETE FROM education WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(query)
                    .bind(id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to delete education entry")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(query)
                    .bind(id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to delete education entry")?;
            }
        }
        Ok(())
    }
}

const COLUMNS: &str =
    "id, degree, institution, location, start_year, end_year, description, gpa, sort_order";

const INSERT: &str = "INSERT INTO education (degree, institution, location, start_year, \
                      end_year, description, gpa, sort_order) VALUES (?, ?, ?, ?, ?, ?, ?, ?)";

const UPDATE: &str = "UPDATE education SET degree = ?, institution = ?, location = ?, \
                      start_year = ?, end_year = ?, description = ?, gpa = ?, sort_order = ? \
                      WHERE id = ?";

// SQLite implementations

async fn create_sqlite(pool: &SqlitePool, education: &Education) -> Result<Education> {
    let result = sqlx::query(INSERT)
        .bind(&education.degree)
        .bind(&education.institution)
        .bind(&education.location)
        .bind(&education.start_year)
        .bind(&education.end_year)
        .bind(&education.description)
        .bind(&education.gpa)
        .bind(education.sort_order)
        .execute(pool)
        .await
        .context("Failed to create education entry")?;

    let mut created = education.clone();
    created.id = result.last_insert_rowid();
    Ok(created)
}

async fn get_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Education>> {
    let row = sqlx::query(&format!("SELECT {} FROM education WHERE id = ?", COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get education entry")?;
    row.map(|r| row_to_education_sqlite(&r)).transpose()
}

async fn list_sqlite(pool: &SqlitePool) -> Result<Vec<Education>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM education ORDER BY sort_order",
        COLUMNS
    ))
    .fetch_all(pool)
    .await
    .context("Failed to list education entries")?;
    rows.iter().map(row_to_education_sqlite).collect()
}

async fn update_sqlite(pool: &SqlitePool, education: &Education) -> Result<Education> {
    sqlx::query(UPDATE)
        .bind(&education.degree)
        .bind(&education.institution)
        .bind(&education.location)
        .bind(&education.start_year)
        .bind(&education.end_year)
        .bind(&education.description)
        .bind(&education.gpa)
        .bind(education.sort_order)
        .bind(education.id)
        .execute(pool)
        .await
        .context("Failed to update education entry")?;

    get_by_id_sqlite(pool, education.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Education entry not found after update"))
}

fn row_to_education_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Education> {
    Ok(Education {
        id: row.get("id"),
        degree: row.get("degree"),
        institution: row.get("institution"),
        location: row.get("location"),
        start_year: row.get("start_year"),
        end_year: row.get("end_year"),
        description: row.get("description"),
        gpa: row.get("gpa"),
        sort_order: row.get("sort_order"),
    })
}

// MySQL implementations

async fn create_mysql(pool: &MySqlPool, education: &Education) -> Result<Education> {
    let result = sqlx::query(INSERT)
        .bind(&education.degree)
        .bind(&education.institution)
        .bind(&education.location)
        .bind(&education.start_year)
        .bind(&education.end_year)
        .bind(&education.description)
        .bind(&education.gpa)
        .bind(education.sort_order)
        .execute(pool)
        .await
        .context("Failed to create education entry")?;

    let mut created = education.clone();
    created.id = result.last_insert_id() as i64;
    Ok(created)
}

async fn get_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Education>> {
    let row = sqlx::query(&format!("SELECT {} FROM education WHERE id = ?", COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get education entry")?;
    row.map(|r| row_to_education_mysql(&r)).transpose()
}

async fn list_mysql(pool: &MySqlPool) -> Result<Vec<Education>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM education ORDER BY sort_order",
        COLUMNS
    ))
    .fetch_all(pool)
    .await
    .context("Failed to list education entries")?;
    rows.iter().map(row_to_education_mysql).collect()
}

async fn update_mysql(pool: &MySqlPool, education: &Education) -> Result<Education> {
    sqlx::query(UPDATE)
        .bind(&education.degree)
        .bind(&education.institution)
        .bind(&education.location)
        .bind(&education.start_year)
        .bind(&education.end_year)
        .bind(&education.description)
        .bind(&education.gpa)
        .bind(education.sort_order)
        .bind(education.id)
        .execute(pool)
        .await
        .context("Failed to update education entry")?;

    get_by_id_mysql(pool, education.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Education entry not found after update"))
}

fn row_to_education_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Education> {
    Ok(Education {
        id: row.get("id"),
        degree: row.get("degree"),
        institution: row.get("institution"),
        location: row.get("location"),
        start_year: row.get("start_year"),
        end_year: row.get("end_year"),
        description: row.get("description"),
        gpa: row.get("gpa"),
        sort_order: row.get("sort_order"),
    })
}
