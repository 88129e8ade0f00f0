//! Post-commit event publication.

use async_trait::async_trait;
use thiserror::Error;

use crate::event::CardEvent;

/// Topic every persisted card event is published to.
pub const CARD_EVENTS_TOPIC: &str = "card_events";

/// Errors raised while publishing an event. Never affect command results.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The event could not be encoded.
    #[error("publish serialization error: {0}")]
    Serialization(String),

    /// The broker rejected or did not acknowledge the message.
    #[error("publish failed: {0}")]
    Broker(String),
}

/// Best-effort sink for events that have already been persisted.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publishes `event` to `topic`.
    async fn publish(&self, topic: &str, event: &CardEvent) -> Result<(), PublishError>;
}
