//! Person repository for database operations.
//!
//! A person exists at most once per email. [`PersonRepository::ensure`] is the
//! idempotent registration entry point; the unique constraint on
//! `person.email` settles concurrent registrations of the same address.

use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use creditcards_core::{Email, PersonId};

use super::RepositoryError;
use crate::models::Person;

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for person queries.
#[derive(Debug, sqlx::FromRow)]
struct PersonRow {
    id: i64,
    email: String,
}

impl TryFrom<PersonRow> for Person {
    type Error = RepositoryError;

    fn try_from(row: PersonRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: PersonId::new(row.id),
            email,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for person database operations.
pub struct PersonRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PersonRepository<'a> {
    /// Create a new person repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Make sure a person with this email exists and return the stored row.
    ///
    /// Looks the email up first. If nobody has it yet the person is inserted;
    /// an insert that loses a race against a concurrent registration of the
    /// same email falls back to a second lookup and returns the winner's row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the lookup or insert fails.
    /// Returns `RepositoryError::Conflict` if the insert was rejected as a
    /// duplicate but the existing row still cannot be found.
    pub async fn ensure(&self, email: &Email) -> Result<Person, RepositoryError> {
        if let Some(existing) = self.get_by_email(email).await? {
            debug!(person_id = %existing.id, "Person already registered");
            return Ok(existing);
        }

        let inserted = sqlx::query_as::<_, PersonRow>(
            r"
            INSERT INTO person (email)
            VALUES (?1)
            ON CONFLICT (email) DO NOTHING
            RETURNING id, email
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        if let Some(row) = inserted {
            let person = Person::try_from(row)?;
            info!(person_id = %person.id, "Person registered");
            return Ok(person);
        }

        warn!("Concurrent registration for the same email, re-reading person");
        self.get_by_email(email).await?.ok_or_else(|| {
            RepositoryError::Conflict(format!("person with email {email} was not created"))
        })
    }

    /// Get a person by their exact email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<Person>, RepositoryError> {
        let row = sqlx::query_as::<_, PersonRow>(
            r"
            SELECT id, email
            FROM person
            WHERE email = ?1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Get a person by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn get_by_id(&self, id: PersonId) -> Result<Option<Person>, RepositoryError> {
        let row = sqlx::query_as::<_, PersonRow>(
            r"
            SELECT id, email
            FROM person
            WHERE id = ?1
            ",
        )
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Count all registered people.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM person")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}
