//! In-memory caching of fetched key sets

use crate::error::Result;
use crate::keys::KeySet;
use crate::keys::source::KeySource;
use moka::sync::Cache;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default time-to-live for a cached key set (300 seconds = 5 minutes)
pub const DEFAULT_KEY_SET_TTL: Duration = Duration::from_secs(300);

/// Wraps a source and serves its last successful fetch until the TTL lapses
///
/// Failed fetches are never cached, so an outage is retried on the next call.
pub struct CachingKeySource<S> {
    inner: S,
    cache: Cache<(), Arc<KeySet>>,
}

impl<S: KeySource> CachingKeySource<S> {
    pub fn new(inner: S) -> Self {
        Self::with_ttl(inner, DEFAULT_KEY_SET_TTL)
    }

    pub fn with_ttl(inner: S, ttl: Duration) -> Self {
        let cache = Cache::builder().time_to_live(ttl).max_capacity(1).build();
        Self { inner, cache }
    }

    /// Drop the cached key set so the next fetch goes to the inner source
    pub fn invalidate(&self) {
        self.cache.invalidate_all();
    }
}

impl<S: KeySource> KeySource for CachingKeySource<S> {
    fn name(&self) -> &'static str {
        "caching"
    }

    fn fetch(&self) -> Result<KeySet> {
        if let Some(cached) = self.cache.get(&()) {
            debug!(keys = cached.len(), "Key set served from cache");
            return Ok(cached.as_ref().clone());
        }

        let set = self.inner.fetch()?;
        self.cache.insert((), Arc::new(set.clone()));
        Ok(set)
    }
}
