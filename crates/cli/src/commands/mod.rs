//! CLI subcommand implementations.

pub mod migrate;
pub mod seed;

use creditcards_api::config::ApiConfig;
use creditcards_api::db;
use secrecy::ExposeSecret;
use sqlx::SqlitePool;

/// Load configuration and connect to the configured database.
async fn connect() -> Result<SqlitePool, Box<dyn std::error::Error>> {
    let config = ApiConfig::from_env()?;

    if db::is_in_memory(config.database_url.expose_secret()) {
        tracing::warn!(
            "CREDITCARDS_DATABASE_URL is not set; changes go to an in-memory database and are lost on exit"
        );
    }

    tracing::info!("Connecting to database...");
    Ok(db::create_pool(&config.database_url).await?)
}
