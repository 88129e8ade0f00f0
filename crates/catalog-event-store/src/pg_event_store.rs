//! `PostgreSQL` implementation of the `CardRepository` trait.
//!
//! Events live in the `card_events` table; `sequence_id` is the replay order.
//! Each save runs in one transaction holding an advisory lock keyed by the
//! card id, so batches for the same card never interleave and a failed batch
//! leaves nothing behind.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::{debug, instrument};
use uuid::Uuid;

use catalog_core::card::Card;
use catalog_core::error::DomainError;
use catalog_core::event::CardEvent;
use catalog_core::repository::{CardRepository, SearchFilter, StoredEvent, batch_aggregate_id};

/// PostgreSQL-backed card event store.
#[derive(Debug, Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

#[allow(clippy::needless_pass_by_value)]
fn store_error(err: sqlx::Error) -> DomainError {
    DomainError::StoreUnavailable(err.to_string())
}

fn stored_event(row: &sqlx::postgres::PgRow) -> Result<StoredEvent, DomainError> {
    Ok(StoredEvent {
        sequence_id: row.try_get("sequence_id").map_err(store_error)?,
        aggregate_id: row.try_get("aggregate_id").map_err(store_error)?,
        event_kind: row.try_get("event_kind").map_err(store_error)?,
        payload: row.try_get("payload").map_err(store_error)?,
    })
}

impl PgEventStore {
    /// Creates a new `PgEventStore`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Loads the raw stored records of a card, ordered by `sequence_id`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::StoreUnavailable` if the query fails.
    pub async fn load_stored_events(&self, card_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        let rows = sqlx::query(
            r"SELECT sequence_id, aggregate_id, event_kind, payload
              FROM card_events
              WHERE aggregate_id = $1
              ORDER BY sequence_id",
        )
        .bind(card_id)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        rows.iter().map(stored_event).collect()
    }
}

#[async_trait]
impl CardRepository for PgEventStore {
    #[instrument(skip(self, events), fields(event_count = events.len()))]
    async fn save(&self, events: &[CardEvent]) -> Result<(), DomainError> {
        let Some(card_id) = batch_aggregate_id(events)? else {
            return Ok(());
        };

        let mut staged = Vec::with_capacity(events.len());
        for event in events {
            staged.push((event.kind(), event.to_payload()?));
        }

        let mut tx = self.pool.begin().await.map_err(store_error)?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(card_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(store_error)?;

        if let Some(CardEvent::Updated(_)) = events.first() {
            let exists: bool = sqlx::query_scalar(
                "SELECT EXISTS (SELECT 1 FROM card_events WHERE aggregate_id = $1)",
            )
            .bind(card_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(store_error)?;
            if !exists {
                return Err(DomainError::OrphanEvent(card_id));
            }
        }

        for (kind, payload) in staged {
            sqlx::query(
                "INSERT INTO card_events (aggregate_id, event_kind, payload) VALUES ($1, $2, $3)",
            )
            .bind(card_id)
            .bind(kind)
            .bind(payload)
            .execute(&mut *tx)
            .await
            .map_err(store_error)?;
        }

        tx.commit().await.map_err(store_error)?;

        debug!(%card_id, "events committed");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn load(&self, card_id: Uuid) -> Result<Option<Card>, DomainError> {
        let stored = self.load_stored_events(card_id).await?;
        let events = stored
            .iter()
            .map(StoredEvent::decode)
            .collect::<Result<Vec<_>, _>>()?;
        Card::replay(&events)
    }

    #[instrument(skip(self))]
    async fn search(&self, filter: &SearchFilter) -> Result<Vec<Card>, DomainError> {
        let rows = sqlx::query(
            r"SELECT sequence_id, aggregate_id, event_kind, payload
              FROM card_events
              ORDER BY sequence_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        let mut order = Vec::new();
        let mut streams: HashMap<Uuid, Vec<CardEvent>> = HashMap::new();
        for row in &rows {
            let stored = stored_event(row)?;
            let event = stored.decode()?;
            streams
                .entry(stored.aggregate_id)
                .or_insert_with(|| {
                    order.push(stored.aggregate_id);
                    Vec::new()
                })
                .push(event);
        }

        let mut cards = Vec::new();
        for card_id in order {
            if let Some(card) = Card::replay(&streams[&card_id])? {
                if filter.matches(&card) {
                    cards.push(card);
                }
            }
        }
        debug!(scanned = rows.len(), matched = cards.len(), "search complete");
        Ok(cards)
    }
}
