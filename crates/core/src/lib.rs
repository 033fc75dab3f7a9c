//! Credit Cards Core - Shared domain types.
//!
//! This crate provides the types used across all credit cards components:
//! - `api` - HTTP service issuing and listing cards
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and the card number generator - no
//! database access, no HTTP. The generator's only side effect is drawing
//! from its random source.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, emails, and card numbers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
