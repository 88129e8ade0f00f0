//! Kafka implementation of the `EventPublisher` trait.

use std::time::Duration;

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::message::{Header, OwnedHeaders};
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;
use tracing::debug;

use catalog_core::event::CardEvent;
use catalog_core::publisher::{EventPublisher, PublishError};

use crate::message_body;

const DELIVERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Produces card events to a Kafka-compatible broker, keyed by card id.
pub struct KafkaEventPublisher {
    producer: FutureProducer,
}

impl KafkaEventPublisher {
    /// Creates a producer for the comma-separated `brokers` list.
    ///
    /// # Errors
    ///
    /// Returns `PublishError::Broker` if the producer cannot be configured.
    pub fn new(brokers: &str) -> Result<Self, PublishError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .create()
            .map_err(|e| PublishError::Broker(e.to_string()))?;
        Ok(Self { producer })
    }
}

impl std::fmt::Debug for KafkaEventPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KafkaEventPublisher").finish_non_exhaustive()
    }
}

#[async_trait]
impl EventPublisher for KafkaEventPublisher {
    async fn publish(&self, topic: &str, event: &CardEvent) -> Result<(), PublishError> {
        let key = event.aggregate_id().to_string();
        let body = message_body(event)?;
        let headers = OwnedHeaders::new().insert(Header {
            key: "event_kind",
            value: Some(event.kind()),
        });
        let record = FutureRecord::to(topic)
            .key(&key)
            .payload(&body)
            .headers(headers);

        match self
            .producer
            .send(record, Timeout::After(DELIVERY_TIMEOUT))
            .await
        {
            Ok(_) => {
                debug!(topic, %key, "published to kafka");
                Ok(())
            }
            Err((e, _)) => Err(PublishError::Broker(format!(
                "delivery of {} for card {key} failed: {e}",
                event.kind()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use catalog_core::event::{CardCreated, CardEvent};
    use catalog_core::publisher::{CARD_EVENTS_TOPIC, EventPublisher, PublishError};
    use uuid::Uuid;

    use super::KafkaEventPublisher;

    #[tokio::test]
    async fn test_undeliverable_event_reports_card_and_kind() {
        // Arrange
        let card_id = Uuid::new_v4();
        let event = CardEvent::Created(CardCreated {
            card_id,
            name: "Fireball".to_owned(),
            cost: 3,
            faction: String::new(),
            category: String::new(),
            sub_category: String::new(),
            description: String::new(),
        });
        let publisher = KafkaEventPublisher::new("127.0.0.1:1").unwrap();

        // Act
        let result = publisher.publish(CARD_EVENTS_TOPIC, &event).await;

        // Assert
        match result {
            Err(PublishError::Broker(msg)) => {
                assert!(msg.contains(&card_id.to_string()));
                assert!(msg.contains("card.CardCreated"));
            }
            other => panic!("expected Broker error, got {other:?}"),
        }
    }
}
