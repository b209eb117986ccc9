//! Database migration command.
//!
//! Runs the migrations embedded in the api crate against the configured
//! database:
//!
//! ```bash
//! sr-cli migrate
//! ```

use stockroom_api::config::ApiConfig;
use stockroom_api::db;

/// Run embedded migrations.
///
/// # Errors
///
/// Returns an error if configuration is missing, the connection fails, or a
/// migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ApiConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;

    tracing::info!("Running migrations...");
    db::run_migrations(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
