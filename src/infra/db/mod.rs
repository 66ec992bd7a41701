//! Database connection and initialization.

use std::sync::Arc;
use std::time::Duration;

use sea_orm::{ConnectOptions, Database as SeaDatabase, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;

use crate::config::Config;

pub mod migrations;

pub use migrations::Migrator;

/// Database wrapper for connection management.
///
/// `DatabaseConnection` is not `Clone` under SeaORM's `mock` feature, hence the `Arc`.
#[derive(Clone)]
pub struct Database {
    connection: Arc<DatabaseConnection>,
}

impl Database {
    /// Connect and apply pending migrations.
    pub async fn connect(config: &Config) -> Result<Self, DbErr> {
        let database = Self::connect_without_migrations(config).await?;

        if let Err(e) = database.run_migrations().await {
            tracing::error!("Failed to run migrations: {}", e);
            return Err(e);
        }

        tracing::info!("Database connected and migrations applied");
        Ok(database)
    }

    /// Connect without running migrations (for CLI commands).
    pub async fn connect_without_migrations(config: &Config) -> Result<Self, DbErr> {
        let mut options = ConnectOptions::new(config.database_url.clone());
        options
            .connect_timeout(Duration::from_secs(config.request_timeout_secs))
            .sqlx_logging(false);

        let connection = SeaDatabase::connect(options).await?;
        Ok(Self::from_connection(connection))
    }

    /// Wrap an existing connection (mock or disconnected in tests).
    pub fn from_connection(connection: DatabaseConnection) -> Self {
        Self {
            connection: Arc::new(connection),
        }
    }

    /// Shared handle for the repositories.
    pub fn get_connection(&self) -> Arc<DatabaseConnection> {
        Arc::clone(&self.connection)
    }

    /// Run pending migrations.
    pub async fn run_migrations(&self) -> Result<(), DbErr> {
        Migrator::up(self.connection.as_ref(), None).await
    }

    /// Rollback the last migration.
    pub async fn rollback_migration(&self) -> Result<(), DbErr> {
        Migrator::down(self.connection.as_ref(), Some(1)).await
    }

    /// Get migration status (list all migrations with applied status).
    pub async fn migration_status(&self) -> Result<Vec<(String, bool)>, DbErr> {
        use sea_orm::{EntityTrait, QueryOrder};
        use sea_orm_migration::seaql_migrations;

        let applied: std::collections::HashSet<String> = seaql_migrations::Entity::find()
            .order_by_asc(seaql_migrations::Column::Version)
            .all(self.connection.as_ref())
            .await?
            .into_iter()
            .map(|m| m.version)
            .collect();

        let migrations: Vec<(String, bool)> = Migrator::migrations()
            .iter()
            .map(|m| {
                let name = m.name().to_string();
                let is_applied = applied.contains(&name);
                (name, is_applied)
            })
            .collect();

        Ok(migrations)
    }

    /// Drop all tables and run all migrations fresh.
    pub async fn fresh_migrations(&self) -> Result<(), DbErr> {
        Migrator::fresh(self.connection.as_ref()).await
    }

    /// Check database connectivity.
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.connection.ping().await
    }
}
