//! Card domain type.

use serde::{Deserialize, Serialize};

use creditcards_core::{CardId, CardNumber, PersonId};

use super::Person;

/// An issued card together with its owner.
///
/// Serialized as
/// `{ "id": 1, "number": "0123456789012345", "personId": 1, "person": { ... } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Unique card ID, assigned by the store.
    pub id: CardId,
    /// The 16-digit card number.
    pub number: CardNumber,
    /// ID of the owning person.
    pub person_id: PersonId,
    /// The owning person.
    pub person: Person,
}
