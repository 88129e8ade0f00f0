//! Cache-aside decorator over a `CardRepository`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use catalog_core::cache::Cache;
use catalog_core::card::Card;
use catalog_core::error::DomainError;
use catalog_core::event::CardEvent;
use catalog_core::repository::{CardRepository, SearchFilter};

/// Expiry applied to cached card snapshots unless overridden.
pub const DEFAULT_CARD_TTL: Duration = Duration::from_secs(60 * 60);

/// Longest snapshot expiry the caches accept.
pub const MAX_CARD_TTL: Duration = Duration::from_secs(10 * 365 * 24 * 60 * 60);

/// Returns the cache key under which a card snapshot is stored.
#[must_use]
pub fn card_cache_key(card_id: Uuid) -> String {
    format!("card:{card_id}")
}

/// Card repository that serves loads from a cache and writes snapshots
/// through after successful saves.
///
/// Cache failures never surface: a failed read is a miss, a failed write is
/// logged and skipped.
pub struct CachedCardRepository {
    inner: Arc<dyn CardRepository>,
    cache: Arc<dyn Cache>,
    ttl: Duration,
}

impl CachedCardRepository {
    /// Wraps `inner` with `cache`, using [`DEFAULT_CARD_TTL`].
    #[must_use]
    pub fn new(inner: Arc<dyn CardRepository>, cache: Arc<dyn Cache>) -> Self {
        Self {
            inner,
            cache,
            ttl: DEFAULT_CARD_TTL,
        }
    }

    /// Overrides the snapshot expiry.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    async fn put(&self, card: &Card) {
        let key = card_cache_key(card.id);
        let raw = match serde_json::to_string(card) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(%key, error = %e, "failed to encode card snapshot");
                return;
            }
        };
        if let Err(e) = self.cache.set(&key, raw, self.ttl).await {
            warn!(%key, error = %e, "cache write skipped");
        }
    }

    async fn cached(&self, card_id: Uuid) -> Option<Card> {
        let key = card_cache_key(card_id);
        let raw = match self.cache.get(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(%key, error = %e, "cache read failed, treating as miss");
                return None;
            }
        };
        match serde_json::from_str::<Card>(&raw) {
            Ok(card) if card.id == card_id => Some(card),
            Ok(card) => {
                debug!(%key, cached_id = %card.id, "cached snapshot has wrong id, treating as miss");
                None
            }
            Err(e) => {
                debug!(%key, error = %e, "undecodable cache entry, treating as miss");
                None
            }
        }
    }
}

impl std::fmt::Debug for CachedCardRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedCardRepository")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CardRepository for CachedCardRepository {
    #[instrument(skip(self, events), fields(event_count = events.len()))]
    async fn save(&self, events: &[CardEvent]) -> Result<(), DomainError> {
        self.inner.save(events).await?;

        // Every event carries the full field set, so the last one describes
        // the card's state after the batch.
        if let Some(last) = events.last() {
            self.put(&last.snapshot()).await;
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn load(&self, card_id: Uuid) -> Result<Option<Card>, DomainError> {
        if let Some(card) = self.cached(card_id).await {
            debug!("cache hit");
            return Ok(Some(card));
        }

        let loaded = self.inner.load(card_id).await?;
        if let Some(card) = &loaded {
            self.put(card).await;
        }
        Ok(loaded)
    }

    #[instrument(skip(self))]
    async fn search(&self, filter: &SearchFilter) -> Result<Vec<Card>, DomainError> {
        self.inner.search(filter).await
    }
}
