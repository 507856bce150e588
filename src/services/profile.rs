//! Profile service

use crate::cache::MemoryCache;
use crate::db::repositories::ProfileRepository;
use crate::models::{Profile, UpsertProfileInput};
use anyhow::Result;
use std::sync::Arc;

const CACHE_KEY: &str = "profile";

pub struct ProfileService {
    repo: Arc<dyn ProfileRepository>,
    cache: Arc<MemoryCache>,
}

impl ProfileService {
    pub fn new(repo: Arc<dyn ProfileRepository>, cache: Arc<MemoryCache>) -> Self {
        Self { repo, cache }
    }

    pub async fn get(&self) -> Result<Option<Profile>> {
        if let Some(profile) = self.cache.get::<Profile>(CACHE_KEY).await {
            return Ok(Some(profile));
        }

        let profile = self.repo.get().await?;
        if let Some(ref profile) = profile {
            let _ = self.cache.set(CACHE_KEY, profile).await;
        }
        Ok(profile)
    }

    pub async fn upsert(&self, input: UpsertProfileInput) -> Result<Profile> {
        if input.name.trim().is_empty() {
            anyhow::bail!("Name is required");
        }
        if !input.email.contains('@') {
            anyhow::bail!("Invalid email address");
        }

        let profile = self.repo.upsert(&input).await?;
        self.cache.invalidate(CACHE_KEY).await;
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxProfileRepository;
    use crate::db::{create_test_pool, migrations};
    use std::time::Duration;

    async fn setup_test_service() -> ProfileService {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        ProfileService::new(
            SqlxProfileRepository::boxed(pool),
            Arc::new(MemoryCache::new(Duration::from_secs(60))),
        )
    }

    fn test_input(name: &str) -> UpsertProfileInput {
        UpsertProfileInput {
            name: name.into(),
            title: "Engineer".into(),
            email: "sam@example.com".into(),
            phone: None,
            location: None,
            bio: None,
            avatar_url: None,
            resume_url: None,
            social_links: serde_json::Value::Null,
            theme_preference: "dark".into(),
        }
    }

    #[tokio::test]
    async fn test_upsert_validates_email() {
        let service = setup_test_service().await;
        let mut input = test_input("Sam");
        input.email = "not-an-email".into();
        assert!(service.upsert(input).await.is_err());
    }

    #[tokio::test]
    async fn test_upsert_then_get_reflects_change() {
        let service = setup_test_service().await;

        assert!(service.get().await.unwrap().is_none());

        service.upsert(test_input("Sam")).await.unwrap();
        assert_eq!(service.get().await.unwrap().unwrap().name, "Sam");

        service.upsert(test_input("Samira")).await.unwrap();
        assert_eq!(service.get().await.unwrap().unwrap().name, "Samira");
    }
}
