//! Query handlers for the card catalog.
//!
//! This module contains query handlers that read card projections through a
//! `CardRepository` and return read-only view DTOs.

use catalog_core::card::Card;
use catalog_core::error::DomainError;
use catalog_core::repository::{CardRepository, SearchFilter};
use serde::Serialize;
use uuid::Uuid;

/// Read-only view of a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    /// The card identifier.
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

impl From<Card> for CardView {
    fn from(card: Card) -> Self {
        Self {
            card_id: card.id,
            name: card.name,
            cost: card.cost,
            faction: card.faction,
            category: card.category,
            sub_category: card.sub_category,
            description: card.description,
        }
    }
}

/// Retrieves a card by its identifier.
///
/// # Errors
///
/// Returns `DomainError::CardNotFound` if the card has no events, and any
/// error raised by the repository.
pub async fn get_card_by_id(
    card_id: Uuid,
    repo: &dyn CardRepository,
) -> Result<CardView, DomainError> {
    repo.load(card_id)
        .await?
        .map(CardView::from)
        .ok_or(DomainError::CardNotFound(card_id))
}

/// Returns every card matching `filter`.
///
/// # Errors
///
/// Returns any error raised by the repository.
pub async fn search_cards(
    filter: &SearchFilter,
    repo: &dyn CardRepository,
) -> Result<Vec<CardView>, DomainError> {
    let cards = repo.search(filter).await?;
    Ok(cards.into_iter().map(CardView::from).collect())
}

#[cfg(test)]
mod tests {
    use catalog_core::card::Card;
    use catalog_core::error::DomainError;
    use catalog_core::repository::SearchFilter;
    use catalog_test_support::{EmptyCardRepository, RecordingCardRepository};
    use uuid::Uuid;

    use crate::application::query_handlers::{get_card_by_id, search_cards};

    #[tokio::test]
    async fn test_get_card_by_id_returns_view() {
        // Arrange
        let card_id = Uuid::new_v4();
        let repo = RecordingCardRepository::new(Some(Card {
            id: card_id,
            name: "Fireball".to_owned(),
            cost: 3,
            sub_category: "Evocation".to_owned(),
            ..Card::default()
        }));

        // Act
        let view = get_card_by_id(card_id, &repo).await.unwrap();

        // Assert
        assert_eq!(view.card_id, card_id);
        assert_eq!(view.name, "Fireball");
        assert_eq!(view.cost, 3);
        assert_eq!(view.sub_category, "Evocation");
    }

    #[tokio::test]
    async fn test_get_card_by_id_returns_not_found_when_no_events() {
        let card_id = Uuid::new_v4();

        let result = get_card_by_id(card_id, &EmptyCardRepository).await;

        match result {
            Err(DomainError::CardNotFound(id)) => assert_eq!(id, card_id),
            other => panic!("expected CardNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_search_cards_passes_filter_through() {
        let card = Card {
            id: Uuid::new_v4(),
            name: "X".to_owned(),
            ..Card::default()
        };
        let repo = RecordingCardRepository::new(None).with_search_result(vec![card.clone()]);
        let filter = SearchFilter::from_criteria("X", 0, "", "", "");

        let views = search_cards(&filter, &repo).await.unwrap();

        assert_eq!(views.len(), 1);
        assert_eq!(views[0].card_id, card.id);
        assert_eq!(repo.searches(), vec![filter]);
    }
}
