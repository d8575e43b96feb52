//! Provider, cache, logging and business validators

use super::trait_def::Validate;
use crate::config::models::*;
use crate::core::types::BizConfig;
use crate::utils::is_valid_http_url;
use std::collections::HashSet;
use tracing::debug;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl Validate for ProviderConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating provider configuration");

        if self.name.is_empty() {
            return Err("Provider name cannot be empty".to_string());
        }

        if !is_valid_http_url(&self.base_url) {
            return Err(format!("Invalid base URL: {}", self.base_url));
        }

        if self.model.is_empty() {
            return Err("Default model cannot be empty".to_string());
        }

        if self.price_per_token < 0 {
            return Err("Price per token cannot be negative".to_string());
        }

        if self.timeout == 0 {
            return Err("Provider timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for CacheConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_capacity == 0 {
            return Err("Cache max capacity must be greater than 0".to_string());
        }

        if self.config_ttl == 0 {
            return Err("Cache TTL must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if !LOG_LEVELS.contains(&self.level.to_ascii_lowercase().as_str()) {
            return Err(format!(
                "Unknown log level '{}', expected one of {:?}",
                self.level, LOG_LEVELS
            ));
        }
        Ok(())
    }
}

impl Validate for BizConfig {
    fn validate(&self) -> Result<(), String> {
        if self.biz.is_empty() {
            return Err("Business key cannot be empty".to_string());
        }

        if self.prompt_template.trim().is_empty() {
            return Err(format!("Prompt template of '{}' cannot be empty", self.biz));
        }

        if matches!(self.price, Some(price) if price < 0) {
            return Err(format!("Price of '{}' cannot be negative", self.biz));
        }

        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(format!("top_p of '{}' must be within [0, 1]", self.biz));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!("Temperature of '{}' must be within [0, 2]", self.biz));
        }

        Ok(())
    }
}

/// Validate each business configuration and reject duplicate keys
pub fn validate_businesses(businesses: &[BizConfig]) -> Result<(), String> {
    let mut seen = HashSet::new();
    for biz in businesses {
        biz.validate()?;
        if !seen.insert(biz.biz.as_str()) {
            return Err(format!("Duplicate business key '{}'", biz.biz));
        }
    }
    Ok(())
}
