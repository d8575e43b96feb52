//! Storage collaborators of the dispatch pipeline
//!
//! The handlers only see the traits defined here. Two backends implement them: in-memory maps
//! (tests, CLI dry runs) and a sea-orm database.

pub mod cached_config;
pub mod database;
pub mod memory;

pub use cached_config::CachedConfigRepository;
pub use database::SeaOrmDatabase;
pub use memory::{InMemoryCreditLog, InMemoryUsageLog, StaticConfigDao};

use crate::config::Config;
use crate::core::types::BizConfig;
use crate::utils::error::{DispatchError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Raw access to stored business configurations
#[async_trait]
pub trait ConfigDao: Send + Sync {
    /// `None` when no configuration exists for `biz`
    async fn find_config(&self, biz: &str) -> Result<Option<BizConfig>>;
}

/// Configuration lookup used by the configuration handler
#[async_trait]
pub trait ConfigRepository: Send + Sync {
    /// Fails with `ConfigNotFound` when `biz` has no configuration
    async fn get_config(&self, biz: &str) -> Result<BizConfig>;
}

/// Append-only usage log
#[async_trait]
pub trait UsageLogRepository: Send + Sync {
    /// Appending a record whose `tid` is already stored is a no-op
    async fn append(&self, record: UsageRecord) -> Result<()>;
}

/// Billing audit trail, one entry per correlation id
#[async_trait]
pub trait CreditLogRepository: Send + Sync {
    /// Insert the entry, or update status, amount and `utime` of the entry with the same `tid`.
    /// An entry already in `success` is left untouched.
    async fn save(&self, log: CreditLog) -> Result<()>;
}

/// One successful, charged model call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub tid: String,
    pub uid: i64,
    pub biz: String,
    pub tokens: i64,
    pub amount: i64,
    /// Model output as returned by the backend
    pub raw_output: String,
    /// Epoch milliseconds
    pub ctime: i64,
    pub utime: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditStatus {
    /// Written before the debit is attempted
    Processing,
    Success,
    Failed,
}

impl CreditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for CreditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CreditStatus {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "processing" => Ok(Self::Processing),
            "success" => Ok(Self::Success),
            "failed" => Ok(Self::Failed),
            other => Err(DispatchError::internal(format!(
                "unknown credit status '{}'",
                other
            ))),
        }
    }
}

/// Credit log entry for one debit attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditLog {
    pub tid: String,
    pub uid: i64,
    pub biz: String,
    pub amount: i64,
    pub status: CreditStatus,
    /// Epoch milliseconds
    pub ctime: i64,
    pub utime: i64,
}

/// The storage collaborators used by the module, bundled
#[derive(Clone)]
pub struct Storage {
    pub configs: Arc<dyn ConfigRepository>,
    pub usage: Arc<dyn UsageLogRepository>,
    pub credit_logs: Arc<dyn CreditLogRepository>,
    /// Set when backed by a database
    pub database: Option<Arc<SeaOrmDatabase>>,
}

impl fmt::Debug for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storage")
            .field("database", &self.database.is_some())
            .finish()
    }
}

impl Storage {
    /// Open the configured backend. The database backend is migrated and seeded with the
    /// business configurations from `config`.
    pub async fn connect(config: &Config) -> Result<Self> {
        if !config.storage.database.enabled {
            info!("Database disabled, using in-memory storage");
            return Ok(Self::in_memory(config));
        }

        let db = Arc::new(SeaOrmDatabase::new(&config.storage.database).await?);
        db.migrate().await?;
        db.seed_configs(&config.businesses).await?;

        let configs = CachedConfigRepository::new(
            db.clone(),
            Duration::from_secs(config.cache.config_ttl),
            config.cache.max_capacity,
        );

        Ok(Self {
            configs: Arc::new(configs),
            usage: db.clone(),
            credit_logs: db.clone(),
            database: Some(db),
        })
    }

    /// In-memory backend seeded with the business configurations from `config`
    pub fn in_memory(config: &Config) -> Self {
        let dao = Arc::new(StaticConfigDao::new(config.businesses.iter().cloned()));
        let configs = CachedConfigRepository::new(
            dao,
            Duration::from_secs(config.cache.config_ttl),
            config.cache.max_capacity,
        );

        Self {
            configs: Arc::new(configs),
            usage: Arc::new(InMemoryUsageLog::new()),
            credit_logs: Arc::new(InMemoryCreditLog::new()),
            database: None,
        }
    }
}
