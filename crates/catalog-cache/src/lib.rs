//! Card Catalog Cache: read caches and the cache-aside repository.
//!
//! `CachedCardRepository` decorates any `CardRepository`: saves write through
//! to the cache after the durable store accepts them, loads are served from
//! the cache when possible. The durable store stays authoritative.

pub mod cached_repository;
pub mod in_memory;
pub mod redis_cache;
