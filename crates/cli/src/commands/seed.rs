//! Seed the database with people and cards.
//!
//! Each email is registered (or reused if already present) and receives
//! `cards` freshly generated card numbers.

use tracing::info;

use creditcards_api::db::{self, CardRepository, PersonRepository};
use creditcards_core::{CardNumberGenerator, Email};

/// Register every email and issue `cards` cards to each.
///
/// All emails are validated before anything is written.
///
/// # Errors
///
/// Returns an error if an email is invalid, the database cannot be opened,
/// or an insert fails.
pub async fn run(emails: &[String], cards: u32) -> Result<(), Box<dyn std::error::Error>> {
    let emails = emails
        .iter()
        .map(|raw| Email::parse(raw).map_err(|e| format!("invalid email {raw:?}: {e}")))
        .collect::<Result<Vec<_>, _>>()?;

    let pool = super::connect().await?;
    db::run_migrations(&pool).await?;

    let generator = CardNumberGenerator::new();
    let persons = PersonRepository::new(&pool);
    let card_repo = CardRepository::new(&pool, &generator);

    for email in &emails {
        let person = persons.ensure(email).await?;
        for _ in 0..cards {
            let card = card_repo.issue(&person).await?;
            info!(
                email = %email,
                card_id = %card.id,
                number = %card.number,
                "Seeded card"
            );
        }
    }

    info!(
        people = persons.count().await?,
        cards = card_repo.count().await?,
        "Seeding complete!"
    );
    Ok(())
}
