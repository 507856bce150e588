//! Navigation service

use crate::cache::MemoryCache;
use crate::db::repositories::NavigationRepository;
use crate::models::{CreateNavigationItemInput, NavigationItem, UpdateNavigationItemInput};
use anyhow::{Context, Result};
use std::sync::Arc;

const CACHE_KEY: &str = "navigation:list";

pub struct NavigationService {
    repo: Arc<dyn NavigationRepository>,
    cache: Arc<MemoryCache>,
}

impl NavigationService {
    pub fn new(repo: Arc<dyn NavigationRepository>, cache: Arc<MemoryCache>) -> Self {
        Self { repo, cache }
    }

    pub async fn create(&self, input: CreateNavigationItemInput) -> Result<NavigationItem> {
        if input.label.trim().is_empty() {
            anyhow::bail!("Label cannot be empty");
        }
        if input.href.trim().is_empty() {
            anyhow::bail!("Href cannot be empty");
        }

        let mut item = NavigationItem::new(input.label, input.href, input.icon);
        item.sort_order = input.sort_order;
        item.is_visible = input.is_visible;

        let created = self
            .repo
            .create(&item)
            .await
            .context("Failed to create navigation item")?;
        self.cache.invalidate(CACHE_KEY).await;
        Ok(created)
    }

    pub async fn list(&self) -> Result<Vec<NavigationItem>> {
        if let Some(items) = self.cache.get::<Vec<NavigationItem>>(CACHE_KEY).await {
            return Ok(items);
        }

        let items = self.repo.list().await?;
        let _ = self.cache.set(CACHE_KEY, &items).await;
        Ok(items)
    }

    /// Patch an item. Returns `None` when the id does not exist.
    pub async fn update(
        &self,
        id: i64,
        input: UpdateNavigationItemInput,
    ) -> Result<Option<NavigationItem>> {
        let Some(mut item) = self.repo.get_by_id(id).await? else {
            return Ok(None);
        };

        if let Some(label) = input.label {
            item.label = label;
        }
        if let Some(href) = input.href {
            item.href = href;
        }
        if let Some(icon) = input.icon {
            item.icon = icon;
        }
        if let Some(sort_order) = input.sort_order {
            item.sort_order = sort_order;
        }
        if let Some(is_visible) = input.is_visible {
            item.is_visible = is_visible;
        }

        let updated = self.repo.update(&item).await?;
        self.cache.invalidate(CACHE_KEY).await;
        Ok(Some(updated))
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.repo.delete(id).await?;
        self.cache.invalidate(CACHE_KEY).await;
        Ok(())
    }
}
