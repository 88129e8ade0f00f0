//! Shared application state.

use std::sync::Arc;

use catalog_core::publisher::EventPublisher;
use catalog_core::repository::CardRepository;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Card repository (normally the cache-aside decorator over the store).
    pub card_repository: Arc<dyn CardRepository>,
    /// Sink for events after they are persisted.
    pub event_publisher: Arc<dyn EventPublisher>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        card_repository: Arc<dyn CardRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            card_repository,
            event_publisher,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
