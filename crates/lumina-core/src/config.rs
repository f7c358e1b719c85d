//! Configuration module
//!
//! Environment-driven configuration for the catalog's database access. The
//! catalog is a library; the embedding service owns everything else.

use std::env;

use anyhow::{Context, Result};

const DEFAULT_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Catalog database configuration, read from the environment.
#[derive(Clone, Debug)]
pub struct CatalogConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
}

impl CatalogConfig {
    /// Load configuration from the environment. `.env` files are honored when
    /// present (development convenience); real deployments set variables
    /// directly.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let db_max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .map(|v| v.parse::<u32>())
            .transpose()
            .context("DB_MAX_CONNECTIONS must be an integer")?
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        let db_timeout_seconds = env::var("DB_TIMEOUT_SECONDS")
            .ok()
            .map(|v| v.parse::<u64>())
            .transpose()
            .context("DB_TIMEOUT_SECONDS must be an integer")?
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            database_url,
            db_max_connections,
            db_timeout_seconds,
        })
    }

    /// Build a config directly; used by tests and embedding services that
    /// already hold a connection string.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            db_max_connections: DEFAULT_MAX_CONNECTIONS,
            db_timeout_seconds: DEFAULT_TIMEOUT_SECS,
        }
    }
}
