//! Card domain events.
//!
//! Events are a closed sum type. The persisted form is a `(kind, payload)`
//! pair; the kind tags and the PascalCase payload keys match the records
//! already present in existing card logs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::card::Card;
use crate::error::DomainError;

/// Kind tag persisted for [`CardEvent::Created`].
pub const CARD_CREATED_EVENT_KIND: &str = "card.CardCreated";

/// Kind tag persisted for [`CardEvent::Updated`].
pub const CARD_UPDATED_EVENT_KIND: &str = "card.CardUpdated";

/// Emitted when a card is created. Establishes the card identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CardCreated {
    /// The card identifier.
    #[serde(rename = "ID")]
    pub card_id: Uuid,
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

/// Emitted when every mutable field of an existing card is replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CardUpdated {
    /// The card identifier.
    #[serde(rename = "ID")]
    pub card_id: Uuid,
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

/// A card domain event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardEvent {
    /// A card has been created.
    Created(CardCreated),
    /// A card has been updated.
    Updated(CardUpdated),
}

impl CardEvent {
    /// Returns the persisted kind tag for this event.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Created(_) => CARD_CREATED_EVENT_KIND,
            Self::Updated(_) => CARD_UPDATED_EVENT_KIND,
        }
    }

    /// Returns the identifier of the card this event belongs to.
    #[must_use]
    pub fn aggregate_id(&self) -> Uuid {
        match self {
            Self::Created(e) => e.card_id,
            Self::Updated(e) => e.card_id,
        }
    }

    /// Serializes the event payload to JSON.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Serialization` if the payload cannot be encoded.
    pub fn to_payload(&self) -> Result<serde_json::Value, DomainError> {
        let value = match self {
            Self::Created(e) => serde_json::to_value(e)?,
            Self::Updated(e) => serde_json::to_value(e)?,
        };
        Ok(value)
    }

    /// Rebuilds an event from its persisted kind tag and payload.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownEventKind` for an unrecognized tag and
    /// `DomainError::Serialization` for a payload that does not decode.
    pub fn decode(kind: &str, payload: serde_json::Value) -> Result<Self, DomainError> {
        match kind {
            CARD_CREATED_EVENT_KIND => Ok(Self::Created(serde_json::from_value(payload)?)),
            CARD_UPDATED_EVENT_KIND => Ok(Self::Updated(serde_json::from_value(payload)?)),
            other => Err(DomainError::UnknownEventKind(other.to_owned())),
        }
    }

    /// The full-field card state carried by this event, keyed by its
    /// aggregate id.
    #[must_use]
    pub fn snapshot(&self) -> Card {
        match self {
            Self::Created(e) => Card {
                id: e.card_id,
                name: e.name.clone(),
                cost: e.cost,
                faction: e.faction.clone(),
                category: e.category.clone(),
                sub_category: e.sub_category.clone(),
                description: e.description.clone(),
            },
            Self::Updated(e) => Card {
                id: e.card_id,
                name: e.name.clone(),
                cost: e.cost,
                faction: e.faction.clone(),
                category: e.category.clone(),
                sub_category: e.sub_category.clone(),
                description: e.description.clone(),
            },
        }
    }
}
