//! Integration tests for the Credit Cards service.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p creditcards-integration-tests
//! ```
//!
//! Each [`TestContext`] owns a fresh in-memory `SQLite` database with all
//! migrations applied, and drives the real router in-process.

#![cfg_attr(not(test), forbid(unsafe_code))]

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

use creditcards_api::config::ApiConfig;
use creditcards_api::db;
use creditcards_api::routes;
use creditcards_api::state::AppState;
use creditcards_core::CardNumberGenerator;

/// A response captured from the router.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse the body as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not valid JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!(
                "response body is not JSON ({e}): {}",
                String::from_utf8_lossy(&self.body)
            )
        })
    }

    /// Get a response header as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Application under test plus direct access to its database.
pub struct TestContext {
    pub app: Router,
    pub pool: SqlitePool,
}

impl TestContext {
    /// Build the application on a fresh, migrated in-memory database.
    ///
    /// # Panics
    ///
    /// Panics if the database cannot be created or migrated.
    pub async fn new() -> Self {
        Self::with_generator(CardNumberGenerator::new()).await
    }

    /// Like [`TestContext::new`] with a deterministic card number generator.
    ///
    /// # Panics
    ///
    /// Panics if the database cannot be created or migrated.
    pub async fn with_generator(generator: CardNumberGenerator) -> Self {
        let config = ApiConfig::in_memory();
        let pool = db::create_pool(&config.database_url)
            .await
            .unwrap_or_else(|e| panic!("Failed to create test pool: {e}"));
        db::run_migrations(&pool)
            .await
            .unwrap_or_else(|e| panic!("Failed to migrate test database: {e}"));

        let state = AppState::with_generator(config, pool.clone(), generator);
        Self {
            app: routes::app(state),
            pool,
        }
    }

    /// Send a request with an optional raw body.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the router fails.
    pub async fn send(&self, method: Method, uri: &str, body: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if body.is_some() {
            builder = builder.header("content-type", "application/json");
        }
        let request = builder
            .body(body.map_or_else(Body::empty, |b| Body::from(b.to_owned())))
            .unwrap_or_else(|e| panic!("Failed to build request: {e}"));

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .unwrap_or_else(|e| panic!("Router failed: {e}"));

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .unwrap_or_else(|e| panic!("Failed to read body: {e}"))
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// `GET` a path.
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    /// `POST` a JSON body.
    pub async fn post_json(&self, uri: &str, body: &Value) -> TestResponse {
        self.send(Method::POST, uri, Some(&body.to_string())).await
    }

    /// Count rows in a table.
    ///
    /// # Panics
    ///
    /// Panics if the query fails.
    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .unwrap_or_else(|e| panic!("Failed to count {table}: {e}"))
    }
}
