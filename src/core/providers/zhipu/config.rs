//! Zhipu Configuration

use super::PROVIDER_NAME;
use crate::config::ProviderConfig;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ZhipuConfig {
    pub api_key: String,
    /// Base URL, without the `/chat/completions` suffix
    pub base_url: String,
    /// Model used when the business configuration does not name one
    pub model: String,
    /// Default price per token; a business configuration price takes precedence
    pub price_per_token: i64,
    pub timeout: Duration,
}

impl ZhipuConfig {
    pub fn new(api_key: impl Into<String>, price_per_token: i64) -> Self {
        let defaults = ProviderConfig::default();
        Self {
            api_key: api_key.into(),
            base_url: defaults.base_url,
            model: defaults.model,
            price_per_token,
            timeout: Duration::from_secs(defaults.timeout),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.trim().is_empty() {
            return Err(format!("{} API key is required", PROVIDER_NAME));
        }
        if self.price_per_token < 0 {
            return Err("price per token must not be negative".to_string());
        }
        if self.timeout.is_zero() {
            return Err("timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl From<&ProviderConfig> for ZhipuConfig {
    fn from(config: &ProviderConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            price_per_token: config.price_per_token,
            timeout: Duration::from_secs(config.timeout),
        }
    }
}
