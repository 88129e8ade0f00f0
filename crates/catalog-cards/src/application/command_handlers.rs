//! Command handlers for the card catalog.
//!
//! Each handler validates the command, builds the domain event, persists it,
//! and only then publishes it. Publication is best-effort: failures are
//! logged and never change the command result.

use catalog_core::card::Card;
use catalog_core::error::DomainError;
use catalog_core::event::{CardCreated, CardEvent, CardUpdated};
use catalog_core::publisher::{CARD_EVENTS_TOPIC, EventPublisher};
use catalog_core::repository::CardRepository;
use tracing::{info, warn};

use crate::domain::commands::{CreateCard, UpdateCard};

fn validate(name: &str, cost: i64) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::Validation("card name must not be empty".into()));
    }
    if cost < 0 {
        return Err(DomainError::Validation("card cost must not be negative".into()));
    }
    Ok(())
}

async fn publish_all(events: &[CardEvent], publisher: &dyn EventPublisher) {
    for event in events {
        if let Err(e) = publisher.publish(CARD_EVENTS_TOPIC, event).await {
            warn!(
                card_id = %event.aggregate_id(),
                event_kind = event.kind(),
                error = %e,
                "event publication failed"
            );
        }
    }
}

/// Handles the `CreateCard` command: persists a `Created` event and returns
/// the new card.
///
/// # Errors
///
/// Returns `DomainError::Validation` for an empty name or negative cost, and
/// any error raised by the repository while saving.
pub async fn handle_create_card(
    command: &CreateCard,
    repo: &dyn CardRepository,
    publisher: &dyn EventPublisher,
) -> Result<Card, DomainError> {
    validate(&command.name, command.cost)?;

    let event = CardEvent::Created(CardCreated {
        card_id: command.card_id,
        name: command.name.clone(),
        cost: command.cost,
        faction: command.faction.clone(),
        category: command.category.clone(),
        sub_category: command.sub_category.clone(),
        description: command.description.clone(),
    });
    let events = [event];

    repo.save(&events).await?;
    info!(card_id = %command.card_id, "card created");

    publish_all(&events, publisher).await;

    Ok(events[0].snapshot())
}

/// Handles the `UpdateCard` command: checks the card exists, persists an
/// `Updated` event, and returns the card as it is now stored.
///
/// # Errors
///
/// Returns `DomainError::Validation` for invalid fields,
/// `DomainError::CardNotFound` if the card does not exist, and any error
/// raised by the repository.
pub async fn handle_update_card(
    command: &UpdateCard,
    repo: &dyn CardRepository,
    publisher: &dyn EventPublisher,
) -> Result<Card, DomainError> {
    validate(&command.name, command.cost)?;

    if repo.load(command.card_id).await?.is_none() {
        return Err(DomainError::CardNotFound(command.card_id));
    }

    let events = [CardEvent::Updated(CardUpdated {
        card_id: command.card_id,
        name: command.name.clone(),
        cost: command.cost,
        faction: command.faction.clone(),
        category: command.category.clone(),
        sub_category: command.sub_category.clone(),
        description: command.description.clone(),
    })];

    repo.save(&events).await?;
    info!(card_id = %command.card_id, "card updated");

    publish_all(&events, publisher).await;

    repo.load(command.card_id)
        .await?
        .ok_or(DomainError::CardNotFound(command.card_id))
}
