//! Card Catalog Messaging: publishers for persisted card events.
//!
//! `TracingEventPublisher` writes each event to the log and is used when no
//! broker is configured. With the `kafka` feature, `KafkaEventPublisher`
//! produces to a Kafka-compatible broker.

#[cfg(feature = "kafka")]
pub mod kafka;
pub mod tracing_publisher;

/// Encodes an event as the JSON message body sent to subscribers.
pub(crate) fn message_body(
    event: &catalog_core::event::CardEvent,
) -> Result<String, catalog_core::publisher::PublishError> {
    let payload = event
        .to_payload()
        .map_err(|e| catalog_core::publisher::PublishError::Serialization(e.to_string()))?;
    Ok(payload.to_string())
}
