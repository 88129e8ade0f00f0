//! Card Catalog Core: shared domain types and ports.
//!
//! This crate defines the card projection and its replay engine, the card
//! domain events, and the traits (repository, cache, publisher, clock) that
//! infrastructure crates implement. It contains no infrastructure code.

pub mod cache;
pub mod card;
pub mod clock;
pub mod error;
pub mod event;
pub mod publisher;
pub mod repository;
