//! Database operations for the credit cards store.
//!
//! # Database: `SQLite`
//!
//! ## Tables
//!
//! - `person` - Registered people (`email` is unique)
//! - `card` - Issued cards, each referencing one `person`
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and embedded at compile
//! time. The API applies them on startup (unless disabled) and the CLI runs
//! them on demand:
//! ```bash
//! cargo run -p creditcards-cli -- migrate
//! ```

pub mod cards;
pub mod persons;

use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::SqlitePool;
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

pub use cards::CardRepository;
pub use persons::PersonRepository;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// Foreign keys are enforced on every connection and database files are
/// created if missing. An in-memory database lives only as long as its
/// connections, so it gets a single connection that is never recycled.
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the connection cannot be
/// established.
pub async fn create_pool(database_url: &SecretString) -> Result<SqlitePool, sqlx::Error> {
    let url = database_url.expose_secret();
    let options = SqliteConnectOptions::from_str(url)?
        .foreign_keys(true)
        .create_if_missing(true);

    if is_in_memory(url) {
        return SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await;
    }

    SqlitePoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options.journal_mode(SqliteJournalMode::Wal))
        .await
}

/// Apply all pending embedded migrations.
///
/// # Errors
///
/// Returns `MigrateError` if a migration fails or the applied history does
/// not match the embedded migrations.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), MigrateError> {
    tracing::info!(
        migrations = MIGRATOR.migrations.len(),
        "Applying database migrations"
    );
    MIGRATOR.run(pool).await?;
    tracing::info!("Database migrations complete");
    Ok(())
}

/// Whether `url` names an in-memory `SQLite` database.
#[must_use]
pub fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) async fn test_pool() -> SqlitePool {
    let pool = create_pool(&SecretString::from("sqlite::memory:"))
        .await
        .unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_is_in_memory() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite://cards.db?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite://data/cards.db"));
    }

    #[tokio::test]
    async fn test_migrations_create_tables() {
        let pool = test_pool().await;

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('person', 'card') ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        assert_eq!(tables, vec!["card".to_owned(), "person".to_owned()]);
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let pool = test_pool().await;
        run_migrations(&pool).await.unwrap();
    }

    #[tokio::test]
    async fn test_foreign_keys_enforced() {
        let pool = test_pool().await;

        let result = sqlx::query("INSERT INTO card (number, person_id) VALUES (?1, ?2)")
            .bind("1234567890123456")
            .bind(999_i64)
            .execute(&pool)
            .await;

        assert!(result.is_err());
    }
}
