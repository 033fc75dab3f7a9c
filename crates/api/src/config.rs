//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `CREDITCARDS_DATABASE_URL` - `SQLite` connection string (falls back to
//!   `DATABASE_URL`, then to `sqlite::memory:`)
//! - `CREDITCARDS_HOST` - Bind address (default: 127.0.0.1)
//! - `CREDITCARDS_PORT` - Listen port (default: 5000)
//! - `CREDITCARDS_BASE_URL` - Public URL used to build `Location` headers
//!   (default: relative locations)
//! - `CREDITCARDS_RUN_MIGRATIONS` - Apply migrations on startup (default: true)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};

use creditcards_core::CardId;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_DATABASE_URL: &str = "sqlite::memory:";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// API application configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `SQLite` database connection URL
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL, if locations should be absolute
    pub base_url: Option<Url>,
    /// Whether to apply migrations on startup
    pub run_migrations: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "production", "staging")
    pub sentry_environment: Option<String>,
    /// Sentry error event sample rate
    pub sentry_sample_rate: f32,
    /// Sentry transaction sample rate
    pub sentry_traces_sample_rate: f32,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("CREDITCARDS_DATABASE_URL")
            .or_else(|| lookup("DATABASE_URL"))
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_owned());

        let host = parse_or_default(&lookup, "CREDITCARDS_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = parse_or_default(&lookup, "CREDITCARDS_PORT", 5000_u16)?;
        let base_url = lookup("CREDITCARDS_BASE_URL")
            .map(|raw| {
                Url::parse(&raw).map_err(|e| {
                    ConfigError::InvalidEnvVar("CREDITCARDS_BASE_URL".to_string(), e.to_string())
                })
            })
            .transpose()?;
        let run_migrations = parse_or_default(&lookup, "CREDITCARDS_RUN_MIGRATIONS", true)?;

        Ok(Self {
            database_url: SecretString::from(database_url),
            host,
            port,
            base_url,
            run_migrations,
            sentry_dsn: lookup("SENTRY_DSN"),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_or_default(&lookup, "SENTRY_SAMPLE_RATE", 1.0_f32)?,
            sentry_traces_sample_rate: parse_or_default(
                &lookup,
                "SENTRY_TRACES_SAMPLE_RATE",
                0.0_f32,
            )?,
        })
    }

    /// Configuration for tests and embedding: in-memory database, no Sentry.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            database_url: SecretString::from(DEFAULT_DATABASE_URL),
            host: IpAddr::from([127, 0, 0, 1]),
            port: 0,
            base_url: None,
            run_migrations: true,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Returns the `Location` value for a newly issued card.
    ///
    /// Absolute when a base URL is configured, otherwise a root-relative path.
    #[must_use]
    pub fn card_location(&self, id: CardId) -> String {
        let base = self
            .base_url
            .as_ref()
            .map_or("", |url| url.as_str().trim_end_matches('/'));
        format!("{base}/creditcards/{id}")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse an optional variable, falling back to `default` when unset.
fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key).map_or(Ok(default), |raw| {
        raw.parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.database_url.expose_secret(), "sqlite::memory:");
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:5000");
        assert!(config.base_url.is_none());
        assert!(config.run_migrations);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_database_url_fallback() {
        let config = load(&[("DATABASE_URL", "sqlite://fallback.db")]).unwrap();
        assert_eq!(config.database_url.expose_secret(), "sqlite://fallback.db");

        let config = load(&[
            ("DATABASE_URL", "sqlite://fallback.db"),
            ("CREDITCARDS_DATABASE_URL", "sqlite://primary.db"),
        ])
        .unwrap();
        assert_eq!(config.database_url.expose_secret(), "sqlite://primary.db");
    }

    #[test]
    fn test_invalid_port() {
        let result = load(&[("CREDITCARDS_PORT", "not-a-port")]);
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(key, _)) if key == "CREDITCARDS_PORT"));
    }

    #[test]
    fn test_invalid_base_url() {
        let result = load(&[("CREDITCARDS_BASE_URL", "not a url")]);
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(key, _)) if key == "CREDITCARDS_BASE_URL"));
    }

    #[test]
    fn test_run_migrations_flag() {
        let config = load(&[("CREDITCARDS_RUN_MIGRATIONS", "false")]).unwrap();
        assert!(!config.run_migrations);
    }

    #[test]
    fn test_card_location_relative() {
        let config = ApiConfig::in_memory();
        assert_eq!(config.card_location(CardId::new(7)), "/creditcards/7");
    }

    #[test]
    fn test_card_location_absolute() {
        let config = load(&[("CREDITCARDS_BASE_URL", "https://cards.example.com/")]).unwrap();
        assert_eq!(
            config.card_location(CardId::new(7)),
            "https://cards.example.com/creditcards/7"
        );
    }

    #[test]
    fn test_debug_redacts_database_url() {
        let config = load(&[("CREDITCARDS_DATABASE_URL", "sqlite://secret-path.db")]).unwrap();
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("secret-path"));
    }
}
