//! Test repositories: mock `CardRepository` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use catalog_core::card::Card;
use catalog_core::error::DomainError;
use catalog_core::event::CardEvent;
use catalog_core::repository::{CardRepository, SearchFilter};
use uuid::Uuid;

/// A card repository that records every `save` batch and every `load`/`search`
/// call. Returns the configured card from `load` and the configured list from
/// `search`, and always succeeds on `save`.
#[derive(Debug, Default)]
pub struct RecordingCardRepository {
    load_result: Mutex<Option<Card>>,
    search_result: Mutex<Vec<Card>>,
    saved: Mutex<Vec<Vec<CardEvent>>>,
    loads: Mutex<Vec<Uuid>>,
    searches: Mutex<Vec<SearchFilter>>,
}

impl RecordingCardRepository {
    /// Create a new recording repository that will return `load_result` from
    /// every `load` call and nothing from `search`.
    #[must_use]
    pub fn new(load_result: Option<Card>) -> Self {
        Self {
            load_result: Mutex::new(load_result),
            ..Self::default()
        }
    }

    /// Sets the list returned from every `search` call.
    #[must_use]
    pub fn with_search_result(self, cards: Vec<Card>) -> Self {
        *self.search_result.lock().unwrap() = cards;
        self
    }

    /// Returns a snapshot of all batches that were saved.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn saved_batches(&self) -> Vec<Vec<CardEvent>> {
        self.saved.lock().unwrap().clone()
    }

    /// Returns the ids passed to `load`, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn loaded_ids(&self) -> Vec<Uuid> {
        self.loads.lock().unwrap().clone()
    }

    /// Returns the filters passed to `search`, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn searches(&self) -> Vec<SearchFilter> {
        self.searches.lock().unwrap().clone()
    }
}

#[async_trait]
impl CardRepository for RecordingCardRepository {
    async fn save(&self, events: &[CardEvent]) -> Result<(), DomainError> {
        self.saved.lock().unwrap().push(events.to_vec());
        Ok(())
    }

    async fn load(&self, card_id: Uuid) -> Result<Option<Card>, DomainError> {
        self.loads.lock().unwrap().push(card_id);
        Ok(self.load_result.lock().unwrap().clone())
    }

    async fn search(&self, filter: &SearchFilter) -> Result<Vec<Card>, DomainError> {
        self.searches.lock().unwrap().push(filter.clone());
        Ok(self.search_result.lock().unwrap().clone())
    }
}

/// A card repository that never finds anything and silently accepts saves.
/// Useful for testing "card not found" scenarios and creation commands.
#[derive(Debug)]
pub struct EmptyCardRepository;

#[async_trait]
impl CardRepository for EmptyCardRepository {
    async fn save(&self, _events: &[CardEvent]) -> Result<(), DomainError> {
        Ok(())
    }

    async fn load(&self, _card_id: Uuid) -> Result<Option<Card>, DomainError> {
        Ok(None)
    }

    async fn search(&self, _filter: &SearchFilter) -> Result<Vec<Card>, DomainError> {
        Ok(Vec::new())
    }
}

/// A card repository whose store is always down. Useful for testing
/// error-handling paths.
#[derive(Debug)]
pub struct FailingCardRepository;

#[async_trait]
impl CardRepository for FailingCardRepository {
    async fn save(&self, _events: &[CardEvent]) -> Result<(), DomainError> {
        Err(DomainError::StoreUnavailable("connection refused".into()))
    }

    async fn load(&self, _card_id: Uuid) -> Result<Option<Card>, DomainError> {
        Err(DomainError::StoreUnavailable("connection refused".into()))
    }

    async fn search(&self, _filter: &SearchFilter) -> Result<Vec<Card>, DomainError> {
        Err(DomainError::StoreUnavailable("connection refused".into()))
    }
}

/// A card repository that accepts saves but fails every read. Proves that a
/// read was served without consulting the store.
#[derive(Debug, Default)]
pub struct WriteOnlyCardRepository {
    saved: Mutex<Vec<Vec<CardEvent>>>,
}

impl WriteOnlyCardRepository {
    /// Create an empty write-only repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all batches that were saved.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn saved_batches(&self) -> Vec<Vec<CardEvent>> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl CardRepository for WriteOnlyCardRepository {
    async fn save(&self, events: &[CardEvent]) -> Result<(), DomainError> {
        self.saved.lock().unwrap().push(events.to_vec());
        Ok(())
    }

    async fn load(&self, _card_id: Uuid) -> Result<Option<Card>, DomainError> {
        Err(DomainError::StoreUnavailable("reads disabled".into()))
    }

    async fn search(&self, _filter: &SearchFilter) -> Result<Vec<Card>, DomainError> {
        Err(DomainError::StoreUnavailable("reads disabled".into()))
    }
}
