//! In-memory implementation of the `CardRepository` trait.
//!
//! A single `RwLock` guards the whole id→events map: saves take it
//! exclusively for the duration of the append, loads and searches share it.
//! The lock is never held across an `.await`.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::{debug, instrument};
use uuid::Uuid;

use catalog_core::card::Card;
use catalog_core::error::DomainError;
use catalog_core::event::CardEvent;
use catalog_core::repository::{CardRepository, SearchFilter, batch_aggregate_id};

#[derive(Debug, Default)]
struct EventLog {
    streams: HashMap<Uuid, Vec<CardEvent>>,
    /// Card ids in order of their first append.
    order: Vec<Uuid>,
}

/// Process-local event store.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    log: RwLock<EventLog>,
}

fn poisoned() -> DomainError {
    DomainError::StoreUnavailable("event log lock poisoned".into())
}

impl InMemoryEventStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the stored history of a card, in append order.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::StoreUnavailable` if the lock is poisoned.
    pub fn history(&self, card_id: Uuid) -> Result<Vec<CardEvent>, DomainError> {
        let log = self.log.read().map_err(|_| poisoned())?;
        Ok(log.streams.get(&card_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl CardRepository for InMemoryEventStore {
    #[instrument(skip(self, events), fields(event_count = events.len()))]
    async fn save(&self, events: &[CardEvent]) -> Result<(), DomainError> {
        let Some(card_id) = batch_aggregate_id(events)? else {
            return Ok(());
        };

        let mut log = self.log.write().map_err(|_| poisoned())?;
        if !log.streams.contains_key(&card_id) {
            if let Some(CardEvent::Updated(_)) = events.first() {
                return Err(DomainError::OrphanEvent(card_id));
            }
            log.order.push(card_id);
        }
        log.streams
            .entry(card_id)
            .or_default()
            .extend_from_slice(events);
        drop(log);

        debug!(%card_id, "events appended");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn load(&self, card_id: Uuid) -> Result<Option<Card>, DomainError> {
        let log = self.log.read().map_err(|_| poisoned())?;
        match log.streams.get(&card_id) {
            Some(events) => Card::replay(events),
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    async fn search(&self, filter: &SearchFilter) -> Result<Vec<Card>, DomainError> {
        let log = self.log.read().map_err(|_| poisoned())?;
        let mut cards = Vec::new();
        for card_id in &log.order {
            let Some(events) = log.streams.get(card_id) else {
                continue;
            };
            if let Some(card) = Card::replay(events)? {
                if filter.matches(&card) {
                    cards.push(card);
                }
            }
        }
        Ok(cards)
    }
}
