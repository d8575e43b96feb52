use crate::config::DatabaseConfig;
use crate::utils::error::{DispatchError, Result};
use sea_orm::*;
use sea_orm_migration::MigratorTrait;
use std::time::Duration;
use tracing::{info, warn};

use super::super::migration::Migrator;
use super::types::{DatabaseBackendType, SeaOrmDatabase};

impl SeaOrmDatabase {
    /// Open a connection pool for `config.url`
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let backend_type = DatabaseBackendType::from_url(&config.url);
        let in_memory = config.url.contains(":memory:");

        let mut opt = ConnectOptions::new(config.url.clone());
        // Every connection to an in-memory SQLite database opens its own empty database
        opt.max_connections(if in_memory { 1 } else { config.max_connections })
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.connection_timeout))
            .acquire_timeout(Duration::from_secs(30))
            .sqlx_logging(true)
            .sqlx_logging_level(log::LevelFilter::Debug);
        if !in_memory {
            opt.idle_timeout(Duration::from_secs(600))
                .max_lifetime(Duration::from_secs(3600));
        }

        let db = Database::connect(opt).await.map_err(|e| {
            warn!("Database connection failed: {}", e);
            DispatchError::Database(e)
        })?;

        info!("Database connection established ({:?})", backend_type);
        Ok(Self { db, backend_type })
    }

    /// Get the current backend type
    pub fn backend_type(&self) -> DatabaseBackendType {
        self.backend_type
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        info!("Running database migrations...");
        Migrator::up(&self.db, None).await.map_err(|e| {
            warn!("Migration failed: {}", e);
            DispatchError::Database(e)
        })?;
        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Get the underlying database connection
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Check database health
    pub async fn health_check(&self) -> Result<()> {
        self.db.ping().await.map_err(DispatchError::Database)
    }
}
