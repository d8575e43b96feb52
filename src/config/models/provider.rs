//! Model backend configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Model backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Adapter name
    #[serde(default = "default_provider_name")]
    pub name: String,
    /// API key
    #[serde(default)]
    pub api_key: String,
    /// Base URL, without the `/chat/completions` suffix
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model used when a business configuration does not name one
    #[serde(default = "default_model")]
    pub model: String,
    /// Price per token in the smallest currency unit
    #[serde(default)]
    pub price_per_token: i64,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            api_key: String::new(),
            base_url: default_base_url(),
            model: default_model(),
            price_per_token: 0,
            timeout: default_timeout(),
        }
    }
}
