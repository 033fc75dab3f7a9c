//! Person domain type.

use serde::{Deserialize, Serialize};

use creditcards_core::{Email, PersonId};

/// A registered person, identified by email.
///
/// Serialized as `{ "id": 1, "email": "a@x.com" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Unique person ID, assigned by the store.
    pub id: PersonId,
    /// Email address; at most one person exists per email.
    pub email: Email,
}
