//! Database access for the inventory service.
//!
//! # Tables
//!
//! - `stores` - Store records
//! - `products` - Product records, FK to `stores` with `ON DELETE CASCADE`
//!
//! # Migrations
//!
//! Migrations live in `crates/api/migrations/` and are embedded with
//! `sqlx::migrate!`. They run on server startup and via:
//! ```bash
//! cargo run -p stockroom-cli -- migrate
//! ```

pub mod products;
pub mod stores;

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

pub use products::ProductRepository;
pub use stores::StoreRepository;

/// Embedded migrations from `crates/api/migrations/`.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Errors that can occur during repository operations.
///
/// `NotFound` is a dedicated variant so callers distinguish a missing row
/// structurally instead of inspecting driver error codes.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// Enables the `foreign_keys` pragma (required for the store-to-product
/// cascade) and creates the database file if missing. In-memory databases get
/// a single never-expiring connection, since each `SQLite` `:memory:`
/// connection owns private storage.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool_options = if is_memory_url(database_url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(10))
    };

    pool_options.connect_with(options).await
}

/// Run embedded migrations against the pool.
///
/// # Errors
///
/// Returns `sqlx::migrate::MigrateError` if a migration fails.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// True for `SQLite` URLs that address an in-memory database.
fn is_memory_url(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// Round a monetary value to 2 decimals, half away from zero.
pub(crate) fn round_currency(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) async fn test_pool() -> SqlitePool {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}
