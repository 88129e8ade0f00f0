//! Key-value cache abstraction for the read path.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by cache backends. Never surfaced to repository callers.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The cache backend could not be reached.
    #[error("cache unavailable: {0}")]
    Unavailable(String),

    /// A value could not be encoded for the cache.
    #[error("cache serialization error: {0}")]
    Serialization(String),
}

/// String-valued cache with per-entry expiry.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Returns the live value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Stores `value` under `key`, replacing any previous value, expiring
    /// after `ttl`.
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;
}
