//! Commands and queries for the card catalog.

use uuid::Uuid;

/// Command to create a new card.
#[derive(Debug, Clone)]
pub struct CreateCard {
    /// The identifier to assign to the new card.
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

/// Command to replace every mutable field of an existing card.
#[derive(Debug, Clone)]
pub struct UpdateCard {
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
