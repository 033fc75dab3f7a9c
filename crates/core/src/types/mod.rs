//! Core types for the credit cards service.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod card_number;
pub mod email;
pub mod id;

pub use card_number::{CardNumber, CardNumberError, CardNumberGenerator};
pub use email::{Email, EmailError};
pub use id::*;
