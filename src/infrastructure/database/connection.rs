use std::sync::Arc;
use std::time::Duration;

use sea_orm::{ConnectOptions, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::infrastructure::database::migrations::Migrator;
use crate::shared::{Result, TaskchiError};

#[derive(Clone)]
pub struct Database {
    connection: Arc<DatabaseConnection>,
}

impl Database {
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        info!("Connecting to PostgreSQL");

        let mut options = ConnectOptions::new(config.url.clone());
        options
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(config.connection_timeout_seconds))
            .sqlx_logging(false);

        let connection = sea_orm::Database::connect(options)
            .await
            .map_err(|e| TaskchiError::Database {
                message: format!("Failed to connect to PostgreSQL: {}", e),
            })?;

        info!("Successfully connected to PostgreSQL");

        Ok(Self {
            connection: Arc::new(connection),
        })
    }

    pub fn connection(&self) -> Arc<DatabaseConnection> {
        self.connection.clone()
    }

    /// Apply pending schema migrations. Runs at startup, before the server
    /// accepts traffic.
    pub async fn run_migrations(&self) -> Result<()> {
        info!("Running database migrations");
        Migrator::up(self.connection.as_ref(), None)
            .await
            .map_err(|e| TaskchiError::Database {
                message: format!("Migration failed: {}", e),
            })?;
        info!("Database schema is up to date");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<()> {
        self.connection
            .ping()
            .await
            .map_err(|e| TaskchiError::Database {
                message: format!("Database health check failed: {}", e),
            })
    }
}
