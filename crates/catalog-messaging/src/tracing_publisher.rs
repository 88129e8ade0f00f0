//! Publisher that records events in the application log.

use async_trait::async_trait;
use tracing::info;

use catalog_core::event::CardEvent;
use catalog_core::publisher::{EventPublisher, PublishError};

use crate::message_body;

/// Writes every published event as a structured `info` record.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventPublisher;

#[async_trait]
impl EventPublisher for TracingEventPublisher {
    async fn publish(&self, topic: &str, event: &CardEvent) -> Result<(), PublishError> {
        let body = message_body(event)?;
        info!(
            topic,
            card_id = %event.aggregate_id(),
            event_kind = event.kind(),
            body = %body,
            "card event published"
        );
        Ok(())
    }
}
