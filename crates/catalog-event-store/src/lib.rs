//! Card Catalog Event Store: durable append-only card event logs.
//!
//! Both stores implement `CardRepository`: saves append a batch of events for
//! one card, loads replay a card's events in append order, and searches scan
//! and replay every card.

pub mod in_memory;
pub mod pg_event_store;

/// Embedded schema migrations for the PostgreSQL store.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");
