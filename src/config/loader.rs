//! Environment overrides

use super::Config;
use crate::utils::error::{DispatchError, Result};
use std::env;
use tracing::debug;

/// API key of the model backend
pub const ENV_API_KEY: &str = "LLM_DISPATCH_API_KEY";
/// Base URL of the model backend
pub const ENV_BASE_URL: &str = "LLM_DISPATCH_BASE_URL";
/// Database URL; setting it enables the database
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_LOG_LEVEL: &str = "LLM_DISPATCH_LOG_LEVEL";
pub const ENV_PRICE: &str = "LLM_DISPATCH_PRICE_PER_TOKEN";

impl Config {
    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_key) = lookup(ENV_API_KEY) {
            debug!("Overriding provider api key from {}", ENV_API_KEY);
            self.provider.api_key = api_key;
        }
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            self.provider.base_url = base_url;
        }
        if let Some(price) = lookup(ENV_PRICE) {
            self.provider.price_per_token = price
                .parse()
                .map_err(|e| DispatchError::Config(format!("Invalid price per token: {}", e)))?;
        }
        if let Some(db_url) = lookup(ENV_DATABASE_URL) {
            self.storage.database.url = db_url;
            self.storage.database.enabled = true;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
        Ok(())
    }
}
