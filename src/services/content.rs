//! Content section service

use crate::cache::MemoryCache;
use crate::db::repositories::ContentSectionRepository;
use crate::models::{ContentSection, UpsertContentSectionInput};
use anyhow::Result;
use std::sync::Arc;

fn cache_key(section_key: &str) -> String {
    format!("content:{}", section_key)
}

pub struct ContentService {
    repo: Arc<dyn ContentSectionRepository>,
    cache: Arc<MemoryCache>,
}

impl ContentService {
    pub fn new(repo: Arc<dyn ContentSectionRepository>, cache: Arc<MemoryCache>) -> Self {
        Self { repo, cache }
    }

    pub async fn get(&self, section_key: &str) -> Result<Option<ContentSection>> {
        let key = cache_key(section_key);
        if let Some(section) = self.cache.get::<ContentSection>(&key).await {
            return Ok(Some(section));
        }

        let section = self.repo.get_by_key(section_key).await?;
        if let Some(ref section) = section {
            let _ = self.cache.set(&key, section).await;
        }
        Ok(section)
    }

    pub async fn upsert(
        &self,
        section_key: &str,
        input: UpsertContentSectionInput,
    ) -> Result<ContentSection> {
        let section = self.repo.upsert(section_key, &input).await?;
        self.cache.invalidate(&cache_key(section_key)).await;
        Ok(section)
    }
}
