use sqlx::{postgres::PgPoolOptions, PgPool};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::info;

use crate::config;

/// Errors from DatabaseManager
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Store call timed out after {0}s")]
    Timeout(u64),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

static POOL: OnceCell<PgPool> = OnceCell::const_new();

/// Lazily-created connection pool for the directory database
pub struct DatabaseManager;

impl DatabaseManager {
    /// Get the shared pool, creating it on first use
    pub async fn pool() -> Result<PgPool, DatabaseError> {
        let pool = POOL
            .get_or_try_init(|| async {
                let url = std::env::var("DATABASE_URL")
                    .map_err(|_| DatabaseError::ConfigMissing("DATABASE_URL"))?;

                let cfg = &config::config().database;
                let pool = PgPoolOptions::new()
                    .max_connections(cfg.max_connections)
                    .acquire_timeout(Duration::from_secs(cfg.connect_timeout_secs))
                    .connect(&url)
                    .await?;

                info!("Created database pool ({} max connections)", cfg.max_connections);
                Ok::<_, DatabaseError>(pool)
            })
            .await?;
        Ok(pool.clone())
    }

    /// Run one store call under the configured timeout. Expiry is reported
    /// the same way as an unreachable backend: the caller sees 503 and the
    /// user re-submits, nothing is retried here.
    pub async fn guarded<T, F>(fut: F) -> Result<T, DatabaseError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        let secs = config::config().database.query_timeout_secs;
        match tokio::time::timeout(Duration::from_secs(secs), fut).await {
            Ok(res) => res.map_err(DatabaseError::from),
            Err(_) => Err(DatabaseError::Timeout(secs)),
        }
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check() -> Result<(), DatabaseError> {
        let pool = Self::pool().await?;
        Self::guarded(async { sqlx::query("SELECT 1").execute(&pool).await }).await?;
        Ok(())
    }
}
