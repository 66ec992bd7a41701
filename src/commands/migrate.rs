//! Migrate command - Schema management for the users and attendances tables.

use sea_orm::DbErr;

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

fn migration_failed(action: MigrateAction) -> impl Fn(DbErr) -> AppError {
    move |e| AppError::internal(format!("Migration {:?} failed: {}", action, e))
}

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    let action = args.action;
    tracing::info!(?action, "Running migration command");

    let db = Database::connect_without_migrations(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await.map_err(migration_failed(action))?;
            tracing::info!("Migrations applied");
        }
        MigrateAction::Down => {
            db.rollback_migration()
                .await
                .map_err(migration_failed(action))?;
            tracing::info!("Last migration rolled back");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await.map_err(migration_failed(action))?;
            let pending = status.iter().filter(|(_, applied)| !applied).count();

            for (name, applied) in &status {
                println!("{}: {}", name, if *applied { "applied" } else { "pending" });
            }
            tracing::info!(total = status.len(), pending, "Migration status listed");
        }
        MigrateAction::Fresh => {
            tracing::warn!("Dropping all tables, attendance history will be lost");
            db.fresh_migrations().await.map_err(migration_failed(action))?;
            tracing::info!("Schema recreated from scratch");
        }
    }

    Ok(())
}
