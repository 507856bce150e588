//! Navigation item repository

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::NavigationItem;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

#[async_trait]
pub trait NavigationRepository: Send + Sync {
    async fn create(&self, item: &NavigationItem) -> Result<NavigationItem>;
    async fn get_by_id(&self, id: i64) -> Result<Option<NavigationItem>>;
    async fn list(&self) -> Result<Vec<NavigationItem>>;
    async fn update(&self, item: &NavigationItem) -> Result<NavigationItem>;
    async fn delete(&self, id: i64) -> Result<()>;
}

pub struct SqlxNavigationRepository {
    pool: DynDatabasePool,
}

impl SqlxNavigationRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn NavigationRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl NavigationRepository for SqlxNavigationRepository {
    async fn create(&self, item: &NavigationItem) -> Result<NavigationItem> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_sqlite(self.pool.as_sqlite().unwrap(), item).await,
            DatabaseDriver::Mysql => create_mysql(self.pool.as_mysql().unwrap(), item).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<NavigationItem>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_by_id_sqlite(self.pool.as_sqlite().unwrap(), id).await,
            DatabaseDriver::Mysql => get_by_id_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }

    async fn list(&self) -> Result<Vec<NavigationItem>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Mysql => list_mysql(self.pool.as_mysql().unwrap()).await,
        }
    }

    async fn update(&self, item: &NavigationItem) -> Result<NavigationItem> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => update_sqlite(self.pool.as_sqlite().unwrap(), item).await,
            DatabaseDriver::Mysql => update_mysql(self.pool.as_mysql().unwrap(), item).await,
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => delete_sqlite(self.pool.as_sqlite().unwrap(), id).await,
            DatabaseDriver::Mysql => delete_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }
}

const COLUMNS: &str = "id, label, href, icon, sort_order, is_visible";

// SQLite implementations

async fn create_sqlite(pool: &SqlitePool, item: &NavigationItem) -> Result<NavigationItem> {
    let result = sqlx::query(
        "INSERT INTO navigation_items (label, href, icon, sort_order, is_visible) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&item.label)
    .bind(&item.href)
    .bind(&item.icon)
    .bind(item.sort_order)
    .bind(item.is_visible)
    .execute(pool)
    .await
    .context("Failed to create navigation item")?;

    let mut created = item.clone();
    created.id = result.last_insert_rowid();
    Ok(created)
}

async fn get_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<NavigationItem>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM navigation_items WHERE id = ?",
        COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get navigation item")?;
    row.map(|r| row_to_item_sqlite(&r)).transpose()
}

async fn list_sqlite(pool: &SqlitePool) -> Result<Vec<NavigationItem>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM navigation_items ORDER BY sort_order",
        COLUMNS
    ))
    .fetch_all(pool)
    .await
    .context("Failed to list navigation items")?;
    rows.iter().map(row_to_item_sqlite).collect()
}

async fn update_sqlite(pool: &SqlitePool, item: &NavigationItem) -> Result<NavigationItem> {
    sqlx::query(
        "UPDATE navigation_items SET label = ?, href = ?, icon = ?, sort_order = ?, is_visible = ? WHERE id = ?",
    )
    .bind(&item.label)
    .bind(&item.href)
    .bind(&item.icon)
    .bind(item.sort_order)
    .bind(item.is_visible)
    .bind(item.id)
    .execute(pool)
    .await
    .context("Failed to update navigation item")?;

    get_by_id_sqlite(pool, item.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Navigation item not found after update"))
}

async fn delete_sqlite(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM navigation_items WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete navigation item")?;
    Ok(())
}

fn row_to_item_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<NavigationItem> {
    Ok(NavigationItem {
        id: row.get("id"),
        label: row.get("label"),
        href: row.get("href"),
        icon: row.get("icon"),
        sort_order: row.get("sort_order"),
        is_visible: row.get("is_visible"),
    })
}

// MySQL implementations

async fn create_mysql(pool: &MySqlPool, item: &NavigationItem) -> Result<NavigationItem> {
    let result = sqlx::query(
        "INSERT INTO navigation_items (label, href, icon, sort_order, is_visible) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&item.label)
    .bind(&item.href)
    .bind(&item.icon)
    .bind(item.sort_order)
    .bind(item.is_visible)
    .execute(pool)
    .await
    .context("Failed to create navigation item")?;

    let mut created = item.clone();
    created.id = result.last_insert_id() as i64;
    Ok(created)
}

async fn get_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<NavigationItem>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM navigation_items WHERE id = ?",
        COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get navigation item")?;
    row.map(|r| row_to_item_mysql(&r)).transpose()
}

async fn list_mysql(pool: &MySqlPool) -> Result<Vec<NavigationItem>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM navigation_items ORDER BY sort_order",
        COLUMNS
    ))
    .fetch_all(pool)
    .await
    .context("Failed to list navigation items")?;
    rows.iter().map(row_to_item_mysql).collect()
}

async fn update_mysql(pool: &MySqlPool, item: &NavigationItem) -> Result<NavigationItem> {
    sqlx::query(
        "UPDATE navigation_items SET label = ?, href = ?, icon = ?, sort_order = ?, is_visible = ? WHERE id = ?",
    )
    .bind(&item.label)
    .bind(&item.href)
    .bind(&item.icon)
    .bind(item.sort_order)
    .bind(item.is_visible)
    .bind(item.id)
    .execute(pool)
    .await
    .context("Failed to update navigation item")?;

    get_by_id_mysql(pool, item.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Navigation item not found after update"))
}

async fn delete_mysql(pool: &MySqlPool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM navigation_items WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete navigation item")?;
    Ok(())
}

fn row_to_item_mysql(row: &sqlx::mysql::MySqlRow) -> Result<NavigationItem> {
    Ok(NavigationItem {
        id: row.get("id"),
        label: row.get("label"),
        href: row.get("href"),
        icon: row.get("icon"),
        sort_order: row.get("sort_order"),
        is_visible: row.get("is_visible"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_repo() -> SqlxNavigationRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxNavigationRepository::new(pool)
    }

    #[tokio::test]
    async fn test_create_and_list_ordered() {
        let repo = setup_test_repo().await;

        let mut second = NavigationItem::new("Projects".into(), "#projects".into(), "folder".into());
        second.sort_order = 1;
        let first = NavigationItem::new("Home".into(), "#home".into(), "house".into());

        repo.create(&second).await.unwrap();
        repo.create(&first).await.unwrap();

        let items = repo.list().await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].label, "Home");
        assert_eq!(items[1].label, "Projects");
    }

    #[tokio::test]
    async fn test_update() {
        let repo = setup_test_repo().await;

        let item = NavigationItem::new("Blog".into(), "#blog".into(), "pen".into());
        let mut created = repo.create(&item).await.unwrap();

        created.is_visible = false;
        created.label = "Writing".into();
        let updated = repo.update(&created).await.unwrap();

        assert_eq!(updated.label, "Writing");
        assert!(!updated.is_visible);
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = setup_test_repo().await;

        let item = NavigationItem::new("Contact".into(), "#contact".into(), "mail".into());
        let created = repo.create(&item).await.unwrap();

        repo.delete(created.id).await.unwrap();
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
    }
}
