//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A card was not found. Raised by handlers; repositories report absence
    /// as `Ok(None)`.
    #[error("card not found: {0}")]
    CardNotFound(Uuid),

    /// A persisted event carried a kind tag this service does not recognize.
    #[error("unknown event kind: {0}")]
    UnknownEventKind(String),

    /// An `Updated` event was submitted or replayed for a card that was never
    /// created.
    #[error("orphan event for card {0}: first event must be a creation")]
    OrphanEvent(Uuid),

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// The durable event store could not be reached or rejected the request.
    #[error("event store unavailable: {0}")]
    StoreUnavailable(String),

    /// A stored payload could not be decoded (or an event could not be
    /// encoded).
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
