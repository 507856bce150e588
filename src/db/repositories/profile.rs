//! Profile repository
//!
//! The profile is a singleton row: `get` returns the first row if any,
//! `upsert` updates it in place or inserts it on first save.

use crate::config::DatabaseDriver;
use crate::db::repositories::{decode_json, encode_json};
use crate::db::DynDatabasePool;
use crate::models::{Profile, UpsertProfileInput};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn get(&self) -> Result<Option<Profile>>;
    async fn upsert(&self, input: &UpsertProfileInput) -> Result<Profile>;
}

pub struct SqlxProfileRepository {
    pool: DynDatabasePool,
}

impl SqlxProfileRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn ProfileRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ProfileRepository for SqlxProfileRepository {
    async fn get(&self) -> Result<Option<Profile>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Mysql => get_mysql(self.pool.as_mysql().unwrap()).await,
        }
    }

    async fn upsert(&self, input: &UpsertProfileInput) -> Result<Profile> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => upsert_sqlite(self.pool.as_sqlite().unwrap(), input).await,
            DatabaseDriver::Mysql => upsert_mysql(self.pool.as_mysql().unwrap(), input).await,
        }
    }
}

const COLUMNS: &str = "id, name, title, email, phone, location, bio, avatar_url, resume_url, \
                       social_links, theme_preference, created_at, updated_at";

const INSERT: &str = "INSERT INTO profile (name, title, email, phone, location, bio, \
                      avatar_url, resume_url, social_links, theme_preference, created_at, \
                      updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";

const UPDATE: &str = "UPDATE profile SET name = ?, title = ?, email = ?, phone = ?, \
                      location = ?, bio = ?, avatar_url = ?, resume_url = ?, social_links = ?, \
                      theme_preference = ?, updated_at = ? WHERE id = ?";

// SQLite implementations

async fn get_sqlite(pool: &SqlitePool) -> Result<Option<Profile>> {
    let row = sqlx::query(&format!("SELECT {} FROM profile LIMIT 1", COLUMNS))
        .fetch_optional(pool)
        .await
        .context("Failed to get profile")?;
    row.map(|r| row_to_profile_sqlite(&r)).transpose()
}

async fn upsert_sqlite(pool: &SqlitePool, input: &UpsertProfileInput) -> Result<Profile> {
    let now = Utc::now();
    match get_sqlite(pool).await? {
        Some(existing) => {
            sqlx::query(UPDATE)
                .bind(&input.name)
                .bind(&input.title)
                .bind(&input.email)
                .bind(&input.phone)
                .bind(&input.location)
                .bind(&input.bio)
                .bind(&input.avatar_url)
                .bind(&input.resume_url)
                .bind(encode_json(&input.social_links))
                .bind(&input.theme_preference)
                .bind(now)
                .bind(existing.id)
                .execute(pool)
                .await
                .context("Failed to update profile")?;
        }
        None => {
            sqlx::query(INSERT)
                .bind(&input.name)
                .bind(&input.title)
                .bind(&input.email)
                .bind(&input.phone)
                .bind(&input.location)
                .bind(&input.bio)
                .bind(&input.avatar_url)
                .bind(&input.resume_url)
                .bind(encode_json(&input.social_links))
                .bind(&input.theme_preference)
                .bind(now)
                .bind(now)
                .execute(pool)
                .await
                .context("Failed to create profile")?;
        }
    }

    get_sqlite(pool)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Profile not found after upsert"))
}

fn row_to_profile_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Profile> {
    Ok(Profile {
        id: row.get("id"),
        name: row.get("name"),
        title: row.get("title"),
        email: row.get("email"),
        phone: row.get("phone"),
        location: row.get("location"),
        bio: row.get("bio"),
        avatar_url: row.get("avatar_url"),
        resume_url: row.get("resume_url"),
        social_links: decode_json(row.get("social_links")),
        theme_preference: row.get("theme_preference"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

// MySQL implementations

async fn get_mysql(pool: &MySqlPool) -> Result<Option<Profile>> {
    let row = sqlx::query(&format!("SELECT {} FROM profile LIMIT 1", COLUMNS))
        .fetch_optional(pool)
        .await
        .context("Failed to get profile")?;
    row.map(|r| row_to_profile_mysql(&r)).transpose()
}

async fn upsert_mysql(pool: &MySqlPool, input: &UpsertProfileInput) -> Result<Profile> {
    let now = Utc::now();
    match get_mysql(pool).await? {
        Some(existing) => {
            sqlx::query(UPDATE)
                .bind(&input.name)
                .bind(&input.title)
                .bind(&input.email)
                .bind(&input.phone)
                .bind(&input.location)
                .bind(&input.bio)
                .bind(&input.avatar_url)
                .bind(&input.resume_url)
                .bind(encode_json(&input.social_links))
                .bind(&input.theme_preference)
                .bind(now)
                .bind(existing.id)
                .execute(pool)
                .await
                .context("Failed to update profile")?;
        }
        None => {
            sqlx::query(INSERT)
                .bind(&input.name)
                .bind(&input.title)
                .bind(&input.email)
                .bind(&input.phone)
                .bind(&input.location)
                .bind(&input.bio)
                .bind(&input.avatar_url)
                .bind(&input.resume_url)
                .bind(encode_json(&input.social_links))
                .bind(&input.theme_preference)
                .bind(now)
                .bind(now)
                .execute(pool)
                .await
                .context("Failed to create profile")?;
        }
    }

    get_mysql(pool)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Profile not found after upsert"))
}

fn row_to_profile_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Profile> {
    Ok(Profile {
        id: row.get("id"),
        name: row.get("name"),
        title: row.get("title"),
        email: row.get("email"),
        phone: row.get("phone"),
        location: row.get("location"),
        bio: row.get("bio"),
        avatar_url: row.get("avatar_url"),
        resume_url: row.get("resume_url"),
        social_links: decode_json(row.get("social_links")),
        theme_preference: row.get("theme_preference"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
