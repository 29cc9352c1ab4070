//! Persistence for the procurement service.
//!
//! Row models and request DTOs live in [`models`], raw PostgreSQL queries in
//! [`repositories`]. Engines talk to the [`Store`] trait only, implemented by
//! [`PgStore`] and [`MemoryStore`].

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

pub mod memory;
pub mod models;
pub mod pg;
pub mod repositories;
pub mod store;

pub use memory::MemoryStore;
pub use pg::PgStore;
pub use store::{Store, StoreError, StoreResult, StoreTx};

pub type DbPool = sqlx::PgPool;

/// Pool sizing and per-call bounds.
#[derive(Debug, Clone, Copy)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub statement_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 20,
            acquire_timeout: Duration::from_secs(5),
            statement_timeout: Duration::from_millis(5000),
        }
    }
}

/// Create a connection pool from a database URL.
///
/// Every connection runs with `statement_timeout` set, so a stuck query
/// fails instead of holding a row lock indefinitely.
pub async fn create_pool(database_url: &str, settings: PoolSettings) -> Result<DbPool, sqlx::Error> {
    let options: PgConnectOptions = database_url.parse()?;
    let options = options.options([(
        "statement_timeout",
        settings.statement_timeout.as_millis().to_string(),
    )]);

    tracing::debug!(
        max_connections = settings.max_connections,
        statement_timeout_ms = settings.statement_timeout.as_millis() as u64,
        "Opening connection pool"
    );
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .connect_with(options)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded schema migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
