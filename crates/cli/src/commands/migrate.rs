//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! CREDITCARDS_DATABASE_URL=sqlite://creditcards.db cc-cli migrate
//! ```
//!
//! Migrations live in `crates/api/migrations/` and are embedded in the binary.

/// Apply all pending migrations.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the database cannot be
/// opened, or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;

    tracing::info!("Running migrations...");
    creditcards_api::db::run_migrations(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
