//! Shared test doubles and utilities for the card catalog service.

mod cache;
mod clock;
mod publisher;
mod repository;

pub use cache::UnavailableCache;
pub use clock::ManualClock;
pub use publisher::{FailingEventPublisher, RecordingEventPublisher};
pub use repository::{
    EmptyCardRepository, FailingCardRepository, RecordingCardRepository, WriteOnlyCardRepository,
};
