//! In-memory memoization with per-entry expiry
//!
//! Search results and forecast bundles are memoized for the lifetime of the
//! session so repeating a lookup does not repeat the network call. Nothing is
//! persisted.

use crate::api::WeatherApi;
use crate::models::{Candidate, CurrentSnapshot, ForecastBundle, ResolvedLocation};
use std::collections::HashMap;
use std::time::{Duration, Instant};

struct StoredEntry<T> {
    value: T,
    expires_at: Instant,
}

/// Key-value memo whose entries expire after their TTL
pub struct MemoCache<T> {
    store: HashMap<String, StoredEntry<T>>,
}

impl<T> Default for MemoCache<T> {
    fn default() -> Self {
        Self {
            store: HashMap::new(),
        }
    }
}

impl<T: Clone> MemoCache<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value with a time-to-live (TTL).
    #[tracing::instrument(name = "put_cache", level = "debug", skip(self, value))]
    pub fn put(&mut self, key: &str, value: T, ttl: Duration) {
        let expires_at = Instant::now() + ttl;
        self.store
            .insert(key.to_string(), StoredEntry { value, expires_at });
    }

    /// Retrieves a value if it exists and has not expired.
    /// Returns `None` for cache misses or expired entries.
    #[tracing::instrument(name = "query_cache", level = "debug", skip(self))]
    pub fn get(&mut self, key: &str) -> Option<T> {
        match self.store.get(key) {
            Some(entry) if Instant::now() < entry.expires_at => {
                tracing::debug!("Key found and still fresh");
                Some(entry.value.clone())
            }
            Some(_) => {
                tracing::debug!("Key found but expired");
                self.remove(key);
                None
            }
            None => {
                tracing::debug!("Key not found");
                None
            }
        }
    }

    /// Manually removes a key from the cache.
    pub fn remove(&mut self, key: &str) {
        self.store.remove(key);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

/// Memoizes search and forecast lookups of the wrapped API.
///
/// Current conditions always go to the network. Failures are never cached.
pub struct CachedWeatherApi<A> {
    inner: A,
    ttl: Duration,
    searches: MemoCache<Vec<Candidate>>,
    forecasts: MemoCache<ForecastBundle>,
}

impl<A: WeatherApi> CachedWeatherApi<A> {
    #[must_use]
    pub fn new(inner: A, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            searches: MemoCache::new(),
            forecasts: MemoCache::new(),
        }
    }

    #[must_use]
    pub fn inner(&self) -> &A {
        &self.inner
    }
}

impl<A: WeatherApi> WeatherApi for CachedWeatherApi<A> {
    fn has_api_key(&self) -> bool {
        self.inner.has_api_key()
    }

    fn search(&mut self, query: &str) -> crate::Result<Vec<Candidate>> {
        let key = format!("search:{query}");
        if let Some(hit) = self.searches.get(&key) {
            return Ok(hit);
        }
        let candidates = self.inner.search(query)?;
        self.searches.put(&key, candidates.clone(), self.ttl);
        Ok(candidates)
    }

    fn current(&mut self, location: &ResolvedLocation) -> crate::Result<CurrentSnapshot> {
        self.inner.current(location)
    }

    fn forecast(&mut self, location: &ResolvedLocation, days: u8) -> crate::Result<ForecastBundle> {
        let key = format!("{}:{days}", location.cache_key("forecast"));
        if let Some(hit) = self.forecasts.get(&key) {
            return Ok(hit);
        }
        let bundle = self.inner.forecast(location, days)?;
        self.forecasts.put(&key, bundle.clone(), self.ttl);
        Ok(bundle)
    }
}
