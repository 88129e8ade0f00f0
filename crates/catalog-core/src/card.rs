//! The card projection and its replay engine.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;
use crate::event::CardEvent;

/// Materialized current state of a card, derived by folding its events.
///
/// Serializes to the snapshot format used by the read cache.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Card {
    /// Card identifier, fixed by the creation event.
    #[serde(rename = "ID")]
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Play cost.
    pub cost: i64,
    /// Owning faction.
    pub faction: String,
    /// Top-level category.
    pub category: String,
    /// Category refinement.
    pub sub_category: String,
    /// Free-form rules text.
    pub description: String,
}

impl Card {
    /// Applies a single event to this projection.
    ///
    /// `Created` overwrites every field including the id. `Updated`
    /// overwrites every field except the id.
    pub fn apply(&mut self, event: &CardEvent) {
        match event {
            CardEvent::Created(e) => {
                self.id = e.card_id;
                self.name.clone_from(&e.name);
                self.cost = e.cost;
                self.faction.clone_from(&e.faction);
                self.category.clone_from(&e.category);
                self.sub_category.clone_from(&e.sub_category);
                self.description.clone_from(&e.description);
            }
            CardEvent::Updated(e) => {
                self.name.clone_from(&e.name);
                self.cost = e.cost;
                self.faction.clone_from(&e.faction);
                self.category.clone_from(&e.category);
                self.sub_category.clone_from(&e.sub_category);
                self.description.clone_from(&e.description);
            }
        }
    }

    /// Reconstitutes a card by folding `events` in order.
    ///
    /// Returns `Ok(None)` for an empty history.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::OrphanEvent` if the history does not begin with
    /// a `Created` event.
    pub fn replay<'a, I>(events: I) -> Result<Option<Self>, DomainError>
    where
        I: IntoIterator<Item = &'a CardEvent>,
    {
        let mut events = events.into_iter();
        let Some(first) = events.next() else {
            return Ok(None);
        };
        if let CardEvent::Updated(e) = first {
            return Err(DomainError::OrphanEvent(e.card_id));
        }

        let mut card = Self::default();
        card.apply(first);
        for event in events {
            card.apply(event);
        }
        Ok(Some(card))
    }
}
