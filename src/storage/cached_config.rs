//! Cached configuration repository
//!
//! Reads through a [`ConfigDao`] and keeps hits in a moka cache with a TTL. Entries can be
//! invalidated out of band when a configuration changes.

use super::{ConfigDao, ConfigRepository};
use crate::core::types::BizConfig;
use crate::utils::error::{DispatchError, Result};
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[derive(Clone)]
pub struct CachedConfigRepository {
    dao: Arc<dyn ConfigDao>,
    cache: Cache<String, BizConfig>,
}

impl CachedConfigRepository {
    pub fn new(dao: Arc<dyn ConfigDao>, ttl: Duration, max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();
        Self { dao, cache }
    }

    /// Drop the cached entry for `biz`; the next lookup goes to the DAO
    pub async fn invalidate(&self, biz: &str) {
        self.cache.invalidate(biz).await;
        debug!(biz, "config cache invalidate");
    }

    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

#[async_trait]
impl ConfigRepository for CachedConfigRepository {
    async fn get_config(&self, biz: &str) -> Result<BizConfig> {
        if let Some(config) = self.cache.get(biz).await {
            debug!(biz, "config cache hit");
            return Ok(config);
        }

        let config = self
            .dao
            .find_config(biz)
            .await?
            .ok_or_else(|| DispatchError::config_not_found(biz))?;
        self.cache.insert(biz.to_string(), config.clone()).await;
        debug!(biz, "config cache miss, loaded from store");
        Ok(config)
    }
}
