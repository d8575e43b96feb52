// Module declarations
mod types;
mod connection;
mod config_ops;
mod record_ops;
mod credit_log_ops;

// Re-export public types
pub use types::{DatabaseBackendType, SeaOrmDatabase};
