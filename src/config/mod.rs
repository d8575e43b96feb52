//! Configuration management
//!
//! Configuration is read from a YAML file, overridden from the environment, then validated.

pub mod loader;
pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::core::types::BizConfig;
use crate::utils::error::{DispatchError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Model backend
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    /// Business configuration cache
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Business configurations seeded into the configuration store
    #[serde(default)]
    pub businesses: Vec<BizConfig>,
}

impl Config {
    /// Load configuration from file, apply environment overrides and validate
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DispatchError::Config(format!("Failed to read config file: {}", e)))?;

        let mut config = Self::parse_yaml(&content)?;
        config.apply_env_overrides()?;
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse YAML without overrides or validation
    pub fn parse_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| DispatchError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Look up a seeded business configuration
    pub fn business(&self, biz: &str) -> Option<&BizConfig> {
        self.businesses.iter().find(|b| b.biz == biz)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.provider
            .validate()
            .map_err(|e| DispatchError::Config(format!("Provider config error: {}", e)))?;

        self.storage
            .validate()
            .map_err(|e| DispatchError::Config(format!("Storage config error: {}", e)))?;

        self.cache
            .validate()
            .map_err(|e| DispatchError::Config(format!("Cache config error: {}", e)))?;

        self.logging
            .validate()
            .map_err(|e| DispatchError::Config(format!("Logging config error: {}", e)))?;

        validation::validate_businesses(&self.businesses)
            .map_err(|e| DispatchError::Config(format!("Business config error: {}", e)))?;

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| DispatchError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}
