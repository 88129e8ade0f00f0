//! Process-local implementation of the `Cache` trait.
//!
//! Used when no Redis server is configured. An expired entry is dropped when
//! it is read, and a write sweeps every expired entry once the earliest
//! known deadline has passed.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};

use catalog_core::cache::{Cache, CacheError};
use catalog_core::clock::{Clock, SystemClock};

#[derive(Debug)]
struct Entry {
    value: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Entries {
    map: HashMap<String, Entry>,
    /// No entry expires before this instant.
    earliest_expiry: Option<DateTime<Utc>>,
}

impl Entries {
    fn sweep(&mut self, now: DateTime<Utc>) {
        self.map.retain(|_, entry| entry.expires_at > now);
        self.earliest_expiry = self.map.values().map(|entry| entry.expires_at).min();
    }

    fn insert(&mut self, key: String, entry: Entry) {
        self.earliest_expiry = Some(
            self.earliest_expiry
                .map_or(entry.expires_at, |t| t.min(entry.expires_at)),
        );
        self.map.insert(key, entry);
    }
}

/// In-memory TTL cache.
pub struct InMemoryCache {
    entries: Mutex<Entries>,
    clock: Arc<dyn Clock>,
}

fn poisoned() -> CacheError {
    CacheError::Unavailable("cache lock poisoned".into())
}

impl InMemoryCache {
    /// Creates an empty cache driven by the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty cache that reads time from `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(Entries::default()),
            clock,
        }
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryCache").finish_non_exhaustive()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().map_err(|_| poisoned())?;
        let live = entries
            .map
            .get(key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.value.clone());
        if live.is_none() {
            entries.map.remove(key);
        }
        Ok(live)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let now = self.clock.now();
        let expires_at = TimeDelta::from_std(ttl)
            .ok()
            .and_then(|delta| now.checked_add_signed(delta))
            .ok_or_else(|| {
                CacheError::Serialization(format!("cache ttl out of range: {}s", ttl.as_secs()))
            })?;

        let mut entries = self.entries.lock().map_err(|_| poisoned())?;
        if entries.earliest_expiry.is_some_and(|t| t <= now) {
            entries.sweep(now);
        }
        entries.insert(key.to_owned(), Entry { value, expires_at });
        Ok(())
    }
}
