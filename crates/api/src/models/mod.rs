//! Domain models for the credit cards service.
//!
//! These are validated domain objects, separate from the database row types
//! in [`crate::db`]. Their serde shape is the JSON contract of the HTTP API.

pub mod card;
pub mod person;

pub use card::Card;
pub use person::Person;
