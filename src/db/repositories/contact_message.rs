//! Contact message repository

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::ContactMessage;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

#[async_trait]
pub trait ContactMessageRepository: Send + Sync {
    async fn create(&self, message: &ContactMessage) -> Result<ContactMessage>;
    async fn get_by_id(&self, id: i64) -> Result<Option<ContactMessage>>;
    /// Newest first.
    async fn list(&self) -> Result<Vec<ContactMessage>>;
    async fn mark_read(&self, id: i64) -> Result<()>;
    async fn delete(&self, id: i64) -> Result<()>;
}

pub struct SqlxContactMessageRepository {
    pool: DynDatabasePool,
}

impl SqlxContactMessageRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn ContactMessageRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ContactMessageRepository for SqlxContactMessageRepository {
    async fn create(&self, message: &ContactMessage) -> Result<ContactMessage> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_sqlite(self.pool.as_sqlite().unwrap(), message).await,
            DatabaseDriver::Mysql => create_mysql(self.pool.as_mysql().unwrap(), message).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<ContactMessage>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_by_id_sqlite(self.pool.as_sqlite().unwrap(), id).await,
            DatabaseDriver::Mysql => get_by_id_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }

    async fn list(&self) -> Result<Vec<ContactMessage>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Mysql => list_mysql(self.pool.as_mysql().unwrap()).await,
        }
    }

    async fn mark_read(&self, id: i64) -> Result<()> {
        let query = "UPDATE contact_messages SET is_read = ? WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(query)
                    .bind(true)
                    .bind(id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to mark message read")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(query)
                    .bind(true)
                    .bind(id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to mark message read")?;
            }
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let query = "DELETE FROM contact_messages WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(query)
                    .bind(id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to delete message")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(query)
                    .bind(id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to delete message")?;
            }
        }
        Ok(())
    }
}

const COLUMNS: &str = "id, name, email, subject, message, is_read, created_at";

const INSERT: &str = "INSERT INTO contact_messages (name, email, subject, message, is_read, \
                      created_at) VALUES (?, ?, ?, ?, ?, ?)";

// SQLite implementations

async fn create_sqlite(pool: &SqlitePool, message: &ContactMessage) -> Result<ContactMessage> {
    let result = sqlx::query(INSERT)
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.subject)
        .bind(&message.message)
        .bind(message.is_read)
        .bind(message.created_at)
        .execute(pool)
        .await
        .context("Failed to create contact message")?;

    let mut created = message.clone();
    created.id = result.last_insert_rowid();
    Ok(created)
}

async fn get_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<ContactMessage>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM contact_messages WHERE id = ?",
        COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get contact message")?;
    row.map(|r| row_to_message_sqlite(&r)).transpose()
}

async fn list_sqlite(pool: &SqlitePool) -> Result<Vec<ContactMessage>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM contact_messages ORDER BY created_at DESC",
        COLUMNS
    ))
    .fetch_all(pool)
    .await
    .context("Failed to list contact messages")?;
    rows.iter().map(row_to_message_sqlite).collect()
}

fn row_to_message_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<ContactMessage> {
    Ok(ContactMessage {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        subject: row.get("subject"),
        message: row.get("message"),
        is_read: row.get("is_read"),
        created_at: row.get("created_at"),
    })
}

// MySQL implementations

async fn create_mysql(pool: &MySqlPool, message: &ContactMessage) -> Result<ContactMessage> {
    let result = sqlx::query(INSERT)
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.subject)
        .bind(&message.message)
        .bind(message.is_read)
        .bind(message.created_at)
        .execute(pool)
        .await
        .context("Failed to create contact message")?;

    let mut created = message.clone();
    created.id = result.last_insert_id() as i64;
    Ok(created)
}

async fn get_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<ContactMessage>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM contact_messages WHERE id = ?",
        COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get contact message")?;
    row.map(|r| row_to_message_mysql(&r)).transpose()
}

async fn list_mysql(pool: &MySqlPool) -> Result<Vec<ContactMessage>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM contact_messages ORDER BY created_at DESC",
        COLUMNS
    ))
    .fetch_all(pool)
    .await
    .context("Failed to list contact messages")?;
    rows.iter().map(row_to_message_mysql).collect()
}

fn row_to_message_mysql(row: &sqlx::mysql::MySqlRow) -> Result<ContactMessage> {
    Ok(ContactMessage {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        subject: row.get("subject"),
        message: row.get("message"),
        is_read: row.get("is_read"),
        created_at: row.get("created_at"),
    })
}
