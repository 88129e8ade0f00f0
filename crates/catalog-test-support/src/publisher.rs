//! Test publishers: `EventPublisher` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use catalog_core::event::CardEvent;
use catalog_core::publisher::{EventPublisher, PublishError};

/// A publisher that records every `(topic, event)` pair it is given.
#[derive(Debug, Default)]
pub struct RecordingEventPublisher {
    published: Mutex<Vec<(String, CardEvent)>>,
}

impl RecordingEventPublisher {
    /// Create an empty recording publisher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of everything published so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn published(&self) -> Vec<(String, CardEvent)> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingEventPublisher {
    async fn publish(&self, topic: &str, event: &CardEvent) -> Result<(), PublishError> {
        self.published
            .lock()
            .unwrap()
            .push((topic.to_owned(), event.clone()));
        Ok(())
    }
}

/// A publisher whose broker always rejects messages.
#[derive(Debug)]
pub struct FailingEventPublisher;

#[async_trait]
impl EventPublisher for FailingEventPublisher {
    async fn publish(&self, _topic: &str, _event: &CardEvent) -> Result<(), PublishError> {
        Err(PublishError::Broker("broker unreachable".into()))
    }
}
