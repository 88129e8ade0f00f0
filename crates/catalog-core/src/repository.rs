//! Card repository abstraction.

use async_trait::async_trait;
use uuid::Uuid;

use crate::card::Card;
use crate::error::DomainError;
use crate::event::CardEvent;

/// Stored representation of a card event in a durable log.
#[derive(Debug, Clone)]
pub struct StoredEvent {
    /// Monotonic position in the log; load order.
    pub sequence_id: i64,
    /// Card this event belongs to.
    pub aggregate_id: Uuid,
    /// Event kind tag for decoding.
    pub event_kind: String,
    /// Serialized event fields.
    pub payload: serde_json::Value,
}

impl StoredEvent {
    /// Decodes the stored record back into a domain event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownEventKind` or
    /// `DomainError::Serialization` for records that cannot be decoded.
    pub fn decode(&self) -> Result<CardEvent, DomainError> {
        CardEvent::decode(&self.event_kind, self.payload.clone())
    }
}

/// Exact-match search criteria. Unset fields do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    /// Exact card name.
    pub name: Option<String>,
    /// Exact cost.
    pub cost: Option<i64>,
    /// Exact faction.
    pub faction: Option<String>,
    /// Exact category.
    pub category: Option<String>,
    /// Exact sub-category.
    pub sub_category: Option<String>,
}

impl SearchFilter {
    /// Builds a filter from sentinel-style criteria, where an empty string or
    /// a zero cost means "do not filter on this field".
    #[must_use]
    pub fn from_criteria(
        name: &str,
        cost: i64,
        faction: &str,
        category: &str,
        sub_category: &str,
    ) -> Self {
        fn text(value: &str) -> Option<String> {
            (!value.is_empty()).then(|| value.to_owned())
        }

        Self {
            name: text(name),
            cost: (cost != 0).then_some(cost),
            faction: text(faction),
            category: text(category),
            sub_category: text(sub_category),
        }
    }

    /// Returns `true` if every set field equals the card's field.
    #[must_use]
    pub fn matches(&self, card: &Card) -> bool {
        fn eq(expected: Option<&String>, actual: &str) -> bool {
            expected.is_none_or(|v| v == actual)
        }

        eq(self.name.as_ref(), &card.name)
            && self.cost.is_none_or(|c| c == card.cost)
            && eq(self.faction.as_ref(), &card.faction)
            && eq(self.category.as_ref(), &card.category)
            && eq(self.sub_category.as_ref(), &card.sub_category)
    }
}

/// Returns the aggregate id shared by every event in a save batch, or `None`
/// for an empty batch.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the batch spans more than one card.
pub fn batch_aggregate_id(events: &[CardEvent]) -> Result<Option<Uuid>, DomainError> {
    let Some(first) = events.first() else {
        return Ok(None);
    };
    let aggregate_id = first.aggregate_id();
    if let Some(stray) = events.iter().find(|e| e.aggregate_id() != aggregate_id) {
        return Err(DomainError::Validation(format!(
            "save batch for card {aggregate_id} contains an event for card {}",
            stray.aggregate_id()
        )));
    }
    Ok(Some(aggregate_id))
}

/// Repository contract shared by every card store and by the cache
/// decorator.
#[async_trait]
pub trait CardRepository: Send + Sync {
    /// Appends a batch of events for a single card, in order.
    async fn save(&self, events: &[CardEvent]) -> Result<(), DomainError>;

    /// Loads the current projection of a card, or `None` if it has no events.
    async fn load(&self, card_id: Uuid) -> Result<Option<Card>, DomainError>;

    /// Returns the current projection of every card matching `filter`.
    async fn search(&self, filter: &SearchFilter) -> Result<Vec<Card>, DomainError>;
}
