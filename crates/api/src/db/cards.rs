//! Card repository for database operations.
//!
//! Cards are read back together with their owner through an explicit join on
//! `card.person_id`.

use sqlx::SqlitePool;
use tracing::{debug, info};

use creditcards_core::{CardId, CardNumber, CardNumberGenerator, Email, PersonId};

use super::RepositoryError;
use crate::models::{Card, Person};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for card queries joined with the owning person.
#[derive(Debug, sqlx::FromRow)]
struct CardRow {
    id: i64,
    number: String,
    person_id: i64,
    person_email: String,
}

impl TryFrom<CardRow> for Card {
    type Error = RepositoryError;

    fn try_from(row: CardRow) -> Result<Self, Self::Error> {
        let number = CardNumber::parse(&row.number).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid card number in database: {e}"))
        })?;
        let email = Email::parse(&row.person_email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let person_id = PersonId::new(row.person_id);

        Ok(Self {
            id: CardId::new(row.id),
            number,
            person_id,
            person: Person {
                id: person_id,
                email,
            },
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for card database operations.
pub struct CardRepository<'a> {
    pool: &'a SqlitePool,
    generator: &'a CardNumberGenerator,
}

impl<'a> CardRepository<'a> {
    /// Create a new card repository.
    ///
    /// `generator` supplies the numbers for newly issued cards.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool, generator: &'a CardNumberGenerator) -> Self {
        Self { pool, generator }
    }

    /// Issue a new card to `owner`.
    ///
    /// The owner is trusted to exist; a dangling owner is rejected by the
    /// foreign key and surfaces as a database error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn issue(&self, owner: &Person) -> Result<Card, RepositoryError> {
        let number = self.generator.generate();

        let id: i64 = sqlx::query_scalar(
            r"
            INSERT INTO card (number, person_id)
            VALUES (?1, ?2)
            RETURNING id
            ",
        )
        .bind(number.as_str())
        .bind(owner.id.as_i64())
        .fetch_one(self.pool)
        .await?;

        let card = Card {
            id: CardId::new(id),
            number,
            person_id: owner.id,
            person: owner.clone(),
        };

        info!(card_id = %card.id, person_id = %card.person_id, "Card issued");
        Ok(card)
    }

    /// List every card whose owner's email exactly equals `email`.
    ///
    /// Cards are returned oldest first. An unknown email yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored row is invalid.
    pub async fn find_by_email(&self, email: &str) -> Result<Vec<Card>, RepositoryError> {
        let rows = sqlx::query_as::<_, CardRow>(
            r"
            SELECT c.id, c.number, c.person_id, p.email AS person_email
            FROM card c
            INNER JOIN person p ON p.id = c.person_id
            WHERE p.email = ?1
            ORDER BY c.id ASC
            ",
        )
        .bind(email)
        .fetch_all(self.pool)
        .await?;

        debug!(count = rows.len(), "Cards found for email");
        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a card by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get_by_id(&self, id: CardId) -> Result<Option<Card>, RepositoryError> {
        let row = sqlx::query_as::<_, CardRow>(
            r"
            SELECT c.id, c.number, c.person_id, p.email AS person_email
            FROM card c
            INNER JOIN person p ON p.id = c.person_id
            WHERE c.id = ?1
            ",
        )
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Count all issued cards.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM card")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::{PersonRepository, test_pool};

    async fn register(pool: &SqlitePool, address: &str) -> Person {
        PersonRepository::new(pool)
            .ensure(&Email::parse(address).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_issue_returns_persisted_card() {
        let pool = test_pool().await;
        let generator = CardNumberGenerator::seeded(1);
        let repo = CardRepository::new(&pool, &generator);
        let owner = register(&pool, "a@x.com").await;

        let card = repo.issue(&owner).await.unwrap();

        assert_eq!(card.id, CardId::new(1));
        assert_eq!(card.person_id, owner.id);
        assert_eq!(card.person, owner);
        assert_eq!(card.number.as_str().len(), 16);
        assert!(card.number.as_str().bytes().all(|b| b.is_ascii_digit()));
        assert_eq!(repo.get_by_id(card.id).await.unwrap(), Some(card));
    }

    #[tokio::test]
    async fn test_issued_card_is_found_by_email() {
        let pool = test_pool().await;
        let generator = CardNumberGenerator::new();
        let repo = CardRepository::new(&pool, &generator);
        let owner = register(&pool, "a@x.com").await;

        let card = repo.issue(&owner).await.unwrap();
        let found = repo.find_by_email("a@x.com").await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].number, card.number);
        assert_eq!(found[0].person_id, card.person_id);
        assert_eq!(found[0].person.email.as_str(), "a@x.com");
    }

    #[tokio::test]
    async fn test_find_by_email_only_returns_owner_cards_in_order() {
        let pool = test_pool().await;
        let generator = CardNumberGenerator::new();
        let repo = CardRepository::new(&pool, &generator);
        let alice = register(&pool, "alice@x.com").await;
        let bob = register(&pool, "bob@x.com").await;

        let first = repo.issue(&alice).await.unwrap();
        repo.issue(&bob).await.unwrap();
        let second = repo.issue(&alice).await.unwrap();

        let ids: Vec<_> = repo
            .find_by_email("alice@x.com")
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();

        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn test_find_by_unknown_email_is_empty() {
        let pool = test_pool().await;
        let generator = CardNumberGenerator::new();
        let repo = CardRepository::new(&pool, &generator);

        assert!(repo.find_by_email("nobody@x.com").await.unwrap().is_empty());
        assert!(repo.find_by_email("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_person_without_cards_is_empty() {
        let pool = test_pool().await;
        let generator = CardNumberGenerator::new();
        let repo = CardRepository::new(&pool, &generator);
        register(&pool, "a@x.com").await;

        assert!(repo.find_by_email("a@x.com").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_issue_for_missing_person_fails() {
        let pool = test_pool().await;
        let generator = CardNumberGenerator::new();
        let repo = CardRepository::new(&pool, &generator);
        let ghost = Person {
            id: PersonId::new(404),
            email: Email::parse("ghost@x.com").unwrap(),
        };

        let result = repo.issue(&ghost).await;

        assert!(matches!(result, Err(RepositoryError::Database(_))));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_by_id_missing() {
        let pool = test_pool().await;
        let generator = CardNumberGenerator::new();
        let repo = CardRepository::new(&pool, &generator);

        assert_eq!(repo.get_by_id(CardId::new(1)).await.unwrap(), None);
    }
}
