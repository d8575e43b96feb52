//! Configuration data models

#![allow(missing_docs)]

pub mod cache;
pub mod logging;
pub mod provider;
pub mod storage;

// Re-export all configuration types
pub use cache::*;
pub use logging::*;
pub use provider::*;
pub use storage::*;

/// Default provider name
pub fn default_provider_name() -> String {
    "zhipu".to_string()
}

/// Default backend base URL
pub fn default_base_url() -> String {
    "https://open.bigmodel.cn/api/paas/v4".to_string()
}

pub fn default_model() -> String {
    "glm-4".to_string()
}

/// Default timeout in seconds
pub fn default_timeout() -> u64 {
    30
}

pub fn default_max_connections() -> u32 {
    10
}

pub fn default_connection_timeout() -> u64 {
    5
}

pub fn default_config_ttl() -> u64 {
    300 // 5 minutes
}

pub fn default_cache_max_capacity() -> u64 {
    1000
}

pub fn default_log_level() -> String {
    "info".to_string()
}
