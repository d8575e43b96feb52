//! Tracing subscriber setup

use crate::config::LoggingConfig;
use crate::utils::error::{DispatchError, Result};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Fails if a subscriber is already set.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &config.level;
        EnvFilter::new(format!("llm_dispatch={level},sqlx=warn,warn"))
    });

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false);

    let installed = if config.json {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    };

    installed.map_err(|e| DispatchError::internal(format!("Failed to install tracing: {}", e)))
}
