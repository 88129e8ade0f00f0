//! Test caches: `Cache` implementations for failure scenarios.

use std::time::Duration;

use async_trait::async_trait;
use catalog_core::cache::{Cache, CacheError};

/// A cache whose backend is always down.
#[derive(Debug)]
pub struct UnavailableCache;

#[async_trait]
impl Cache for UnavailableCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(CacheError::Unavailable("connection refused".into()))
    }

    async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".into()))
    }
}
