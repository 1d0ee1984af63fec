//! PostgreSQL pool and schema migrations

mod error;

pub use error::StoreError;

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use crate::config::PoolConfig;

/// Owns the pool; the stores get clones of it.
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn connect(database_url: &str, config: &PoolConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(database_url)
            .await?;

        tracing::info!(
            max_connections = config.max_connections,
            "PostgreSQL connection pool established"
        );
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Round-trip used by `/health`.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| ())
    }

    /// Apply `migrations/` (tables, constraints and the PostGIS extension).
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Database migrations applied");
        Ok(())
    }
}
