//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;

use creditcards_core::CardNumberGenerator;

use crate::config::ApiConfig;
use crate::db::{CardRepository, PersonRepository};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the database pool and the card number generator.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: SqlitePool,
    generator: CardNumberGenerator,
}

impl AppState {
    /// Create a new application state with an OS-seeded card number generator.
    #[must_use]
    pub fn new(config: ApiConfig, pool: SqlitePool) -> Self {
        Self::with_generator(config, pool, CardNumberGenerator::new())
    }

    /// Create a new application state with an explicit card number generator.
    #[must_use]
    pub fn with_generator(
        config: ApiConfig,
        pool: SqlitePool,
        generator: CardNumberGenerator,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                generator,
            }),
        }
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Get a reference to the process-wide card number generator.
    #[must_use]
    pub fn generator(&self) -> &CardNumberGenerator {
        &self.inner.generator
    }

    /// Person repository over the shared pool.
    #[must_use]
    pub fn persons(&self) -> PersonRepository<'_> {
        PersonRepository::new(self.pool())
    }

    /// Card repository over the shared pool and generator.
    #[must_use]
    pub fn cards(&self) -> CardRepository<'_> {
        CardRepository::new(self.pool(), self.generator())
    }
}
