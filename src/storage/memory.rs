//! In-memory storage backends

use super::{
    ConfigDao, CreditLog, CreditLogRepository, CreditStatus, UsageLogRepository, UsageRecord,
};
use crate::core::types::BizConfig;
use crate::utils::error::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Configuration DAO over a fixed set of business configurations
#[derive(Debug, Default)]
pub struct StaticConfigDao {
    configs: RwLock<HashMap<String, BizConfig>>,
}

impl StaticConfigDao {
    pub fn new(configs: impl IntoIterator<Item = BizConfig>) -> Self {
        Self {
            configs: RwLock::new(
                configs
                    .into_iter()
                    .map(|config| (config.biz.clone(), config))
                    .collect(),
            ),
        }
    }

    pub fn upsert(&self, config: BizConfig) {
        self.configs.write().insert(config.biz.clone(), config);
    }

    pub fn remove(&self, biz: &str) -> Option<BizConfig> {
        self.configs.write().remove(biz)
    }
}

#[async_trait]
impl ConfigDao for StaticConfigDao {
    async fn find_config(&self, biz: &str) -> Result<Option<BizConfig>> {
        Ok(self.configs.read().get(biz).cloned())
    }
}

/// Usage log keyed by correlation id
#[derive(Debug, Default)]
pub struct InMemoryUsageLog {
    records: DashMap<String, UsageRecord>,
}

impl InMemoryUsageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, tid: &str) -> Option<UsageRecord> {
        self.records.get(tid).map(|r| r.value().clone())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, oldest first
    pub fn records(&self) -> Vec<UsageRecord> {
        let mut records: Vec<_> = self.records.iter().map(|r| r.value().clone()).collect();
        records.sort_by(|a, b| a.ctime.cmp(&b.ctime).then_with(|| a.tid.cmp(&b.tid)));
        records
    }
}

#[async_trait]
impl UsageLogRepository for InMemoryUsageLog {
    async fn append(&self, record: UsageRecord) -> Result<()> {
        self.records.entry(record.tid.clone()).or_insert(record);
        Ok(())
    }
}

/// Credit log keyed by correlation id
#[derive(Debug, Default)]
pub struct InMemoryCreditLog {
    logs: DashMap<String, CreditLog>,
}

impl InMemoryCreditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, tid: &str) -> Option<CreditLog> {
        self.logs.get(tid).map(|l| l.value().clone())
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }
}

#[async_trait]
impl CreditLogRepository for InMemoryCreditLog {
    async fn save(&self, log: CreditLog) -> Result<()> {
        match self.logs.entry(log.tid.clone()) {
            Entry::Occupied(mut entry) => {
                let existing = entry.get_mut();
                if existing.status == CreditStatus::Success {
                    return Ok(());
                }
                existing.status = log.status;
                existing.amount = log.amount;
                existing.utime = log.utime;
            }
            Entry::Vacant(entry) => {
                entry.insert(log);
            }
        }
        Ok(())
    }
}
