// Database module - provides data access layer

use std::time::Duration;

use color_eyre::Result;
use sqlx::postgres::PgPoolOptions;

pub mod models;
pub use models::*;

mod migrations;
mod module;
mod profile;
mod progress;
mod submission;

/// Settings for the shared connection pool.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

// Main database handle
#[derive(Clone)]
pub struct Db {
    pool: sqlx::PgPool,
}

impl Db {
    pub async fn new(url: &str, settings: PoolSettings) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout)
            .connect(url)
            .await?;

        Self::from_pool(pool).await
    }

    /// Wraps an existing pool, verifying the connection and applying migrations.
    pub async fn from_pool(pool: sqlx::PgPool) -> Result<Self> {
        let one: i32 = sqlx::query_scalar("SELECT 1").fetch_one(&pool).await?;
        assert_eq!(one, 1);

        migrations::run(&pool).await?;

        tracing::info!("database connection has been verified");

        Ok(Self { pool })
    }

    /// Wraps a pool without touching the database. Connections are opened on first use.
    pub fn lazy(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }

    pub async fn migration_applied(&self, version: &str) -> Result<bool> {
        let applied: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM schema_migrations WHERE version = $1)",
        )
        .bind(version)
        .fetch_one(&self.pool)
        .await?;

        Ok(applied)
    }
}
