//! Pool construction and schema migration.

use std::time::Duration;

use anyhow::{Context, Result};
use lumina_core::CatalogConfig;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Connect to the catalog database and apply pending migrations.
pub async fn connect(config: &CatalogConfig) -> Result<PgPool> {
    tracing::info!("Connecting to catalog database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to catalog database")?;

    tracing::info!(
        max_connections = config.db_max_connections,
        "Catalog database connected"
    );

    migrator()
        .run(&pool)
        .await
        .context("Failed to run catalog migrations")?;
    tracing::info!("Catalog migrations applied");

    Ok(pool)
}

/// Workspace migrations, embedded at compile time.
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("../../migrations")
}
