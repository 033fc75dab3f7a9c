//! Credit Cards API library.
//!
//! Registers people by email and issues them randomly numbered cards. The
//! crate is a library so the router can be driven in-process by tests and
//! reused by the CLI; `main.rs` only wires configuration, logging, and the
//! listener around [`routes::app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
