//! Configuration cache settings

use super::*;
use serde::{Deserialize, Serialize};

/// Cache in front of the business configuration store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Time to live of a cached configuration, in seconds
    #[serde(default = "default_config_ttl")]
    pub config_ttl: u64,
    /// Maximum number of cached configurations
    #[serde(default = "default_cache_max_capacity")]
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            config_ttl: default_config_ttl(),
            max_capacity: default_cache_max_capacity(),
        }
    }
}
