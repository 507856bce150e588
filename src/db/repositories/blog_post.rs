//! Blog post repository

use crate::config::DatabaseDriver;
use crate::db::repositories::{decode_string_list, encode_string_list};
use crate::db::DynDatabasePool;
use crate::models::BlogPost;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

#[async_trait]
pub trait BlogPostRepository: Send + Sync {
    async fn create(&self, post: &BlogPost) -> Result<BlogPost>;
    async fn get_by_id(&self, id: i64) -> Result<Option<BlogPost>>;
    /// List posts, optionally filtered by published state, newest first.
    async fn list(&self, published: Option<bool>) -> Result<Vec<BlogPost>>;
    async fn update(&self, post: &BlogPost) -> Result<BlogPost>;
    async fn delete(&self, id: i64) -> Result<()>;
}

pub struct SqlxBlogPostRepository {
    pool: DynDatabasePool,
}

impl SqlxBlogPostRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn BlogPostRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl BlogPostRepository for SqlxBlogPostRepository {
    async fn create(&self, post: &BlogPost) -> Result<BlogPost> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_sqlite(self.pool.as_sqlite().unwrap(), post).await,
            DatabaseDriver::Mysql => create_mysql(self.pool.as_mysql().unwrap(), post).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<BlogPost>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_by_id_sqlite(self.pool.as_sqlite().unwrap(), id).await,
            DatabaseDriver::Mysql => get_by_id_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }

    async fn list(&self, published: Option<bool>) -> Result<Vec<BlogPost>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_sqlite(self.pool.as_sqlite().unwrap(), published).await,
            DatabaseDriver::Mysql => list_mysql(self.pool.as_mysql().unwrap(), published).await,
        }
    }

    async fn update(&self, post: &BlogPost) -> Result<BlogPost> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => update_sqlite(self.pool.as_sqlite().unwrap(), post).await,
            DatabaseDriver::Mysql => update_mysql(self.pool.as_mysql().unwrap(), post).await,
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let query = "DELETE FROM blog_posts WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(query)
                    .bind(id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to delete blog post")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(query)
                    .bind(id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to delete blog post")?;
            }
        }
        Ok(())
    }
}

const COLUMNS: &str = "id, title, slug, excerpt, content, category, tags, published_at, \
                       created_at, updated_at, is_published, read_time, views";

const INSERT: &str = "INSERT INTO blog_posts (title, slug, excerpt, content, category, tags, \
                      published_at, created_at, updated_at, is_published, read_time, views) \
                      VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";

const UPDATE: &str = "UPDATE blog_posts SET title = ?, slug = ?, excerpt = ?, content = ?, \
                      category = ?, tags = ?, published_at = ?, updated_at = ?, \
                      is_published = ?, read_time = ? WHERE id = ?";

// SQLite implementations

async fn create_sqlite(pool: &SqlitePool, post: &BlogPost) -> Result<BlogPost> {
    let result = sqlx::query(INSERT)
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(&post.category)
        .bind(encode_string_list(&post.tags))
        .bind(post.published_at)
        .bind(post.created_at)
        .bind(post.updated_at)
        .bind(post.is_published)
        .bind(post.read_time)
        .bind(post.views)
        .execute(pool)
        .await
        .context("Failed to create blog post")?;

    let mut created = post.clone();
    created.id = result.last_insert_rowid();
    Ok(created)
}

async fn get_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<BlogPost>> {
    let row = sqlx::query(&format!("SELECT {} FROM blog_posts WHERE id = ?", COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get blog post")?;
    row.map(|r| row_to_post_sqlite(&r)).transpose()
}

async fn list_sqlite(pool: &SqlitePool, published: Option<bool>) -> Result<Vec<BlogPost>> {
    let rows = match published {
        Some(flag) => {
            sqlx::query(&format!(
                "SELECT {} FROM blog_posts WHERE is_published = ? ORDER BY created_at DESC",
                COLUMNS
            ))
            .bind(flag)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query(&format!(
                "SELECT {} FROM blog_posts ORDER BY created_at DESC",
                COLUMNS
            ))
            .fetch_all(pool)
            .await
        }
    }
    .context("Failed to list blog posts")?;

    rows.iter().map(row_to_post_sqlite).collect()
}

async fn update_sqlite(pool: &SqlitePool, post: &BlogPost) -> Result<BlogPost> {
    sqlx::query(UPDATE)
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(&post.category)
        .bind(encode_string_list(&post.tags))
        .bind(post.published_at)
        .bind(Utc::now())
        .bind(post.is_published)
        .bind(post.read_time)
        .bind(post.id)
        .execute(pool)
        .await
        .context("Failed to update blog post")?;

    get_by_id_sqlite(pool, post.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Blog post not found after update"))
}

fn row_to_post_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<BlogPost> {
    Ok(BlogPost {
        id: row.get("id"),
        title: row.get("title"),
        slug: row.get("slug"),
        excerpt: row.get("excerpt"),
        content: row.get("content"),
        category: row.get("category"),
        tags: decode_string_list(row.get("tags")),
        published_at: row.get("published_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        is_published: row.get("is_published"),
        read_time: row.get("read_time"),
        views: row.get("views"),
    })
}

// MySQL implementations

async fn create_mysql(pool: &MySqlPool, post: &BlogPost) -> Result<BlogPost> {
    let result = sqlx::query(INSERT)
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(&post.category)
        .bind(encode_string_list(&post.tags))
        .bind(post.published_at)
        .bind(post.created_at)
        .bind(post.updated_at)
        .bind(post.is_published)
        .bind(post.read_time)
        .bind(post.views)
        .execute(pool)
        .await
        .context("Failed to create blog post")?;

    let mut created = post.clone();
    created.id = result.last_insert_id() as i64;
    Ok(created)
}

async fn get_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<BlogPost>> {
    let row = sqlx::query(&format!("SELECT {} FROM blog_posts WHERE id = ?", COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get blog post")?;
    row.map(|r| row_to_post_mysql(&r)).transpose()
}

async fn list_mysql(pool: &MySqlPool, published: Option<bool>) -> Result<Vec<BlogPost>> {
    let rows = match published {
        Some(flag) => {
            sqlx::query(&format!(
                "SELECT {} FROM blog_posts WHERE is_published = ? ORDER BY created_at DESC",
                COLUMNS
            ))
            .bind(flag)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query(&format!(
                "SELECT {} FROM blog_posts ORDER BY created_at DESC",
                COLUMNS
            ))
            .fetch_all(pool)
            .await
        }
    }
    .context("Failed to list blog posts")?;

    rows.iter().map(row_to_post_mysql).collect()
}

async fn update_mysql(pool: &MySqlPool, post: &BlogPost) -> Result<BlogPost> {
    sqlx::query(UPDATE)
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(&post.category)
        .bind(encode_string_list(&post.tags))
        .bind(post.published_at)
        .bind(Utc::now())
        .bind(post.is_published)
        .bind(post.read_time)
        .bind(post.id)
        .execute(pool)
        .await
        .context("Failed to update blog post")?;

    get_by_id_mysql(pool, post.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Blog post not found after update"))
}

fn row_to_post_mysql(row: &sqlx::mysql::MySqlRow) -> Result<BlogPost> {
    Ok(BlogPost {
        id: row.get("id"),
        title: row.get("title"),
        slug: row.get("slug"),
        excerpt: row.get("excerpt"),
        content: row.get("content"),
        category: row.get("category"),
        tags: decode_string_list(row.get("tags")),
        published_at: row.get("published_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        is_published: row.get("is_published"),
        read_time: row.get("read_time"),
        views: row.get("views"),
    })
}
