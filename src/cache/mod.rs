//! Cache layer
//!
//! In-process caching for the hot public reads (navigation, content
//! sections, profile). Values are stored as JSON strings so a single cache
//! serves every entity type. Auth state is deliberately never cached here:
//! session validation always goes to the store.

use anyhow::Result;
use moka::future::Cache as MokaCache;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::config::CacheConfig;

/// Moka-backed in-process cache with a fixed TTL.
#[derive(Clone)]
pub struct MemoryCache {
    inner: MokaCache<String, String>,
}

impl MemoryCache {
    /// Create a cache with the given TTL and a bounded entry count.
    pub fn new(ttl: Duration) -> Self {
        let inner = MokaCache::builder()
            .max_capacity(1_000)
            .time_to_live(ttl)
            .build();
        Self { inner }
    }

    /// Create a cache from configuration.
    pub fn from_config(config: &CacheConfig) -> Arc<Self> {
        Arc::new(Self::new(Duration::from_secs(config.ttl_seconds)))
    }

    /// Get and deserialize a cached value. A decode failure is treated as a
    /// miss so stale shapes age out instead of erroring.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.inner.get(key).await?;
        serde_json::from_str(&raw).ok()
    }

    /// Serialize and store a value.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.inner.insert(key.to_string(), raw).await;
        Ok(())
    }

    /// Drop a single key.
    pub async fn invalidate(&self, key: &str) {
        self.inner.invalidate(key).await;
    }
}
