//! Scoped query cache
//!
//! Each binder owns its own cache; nothing is shared between cards. Entries
//! expire on time alone: an entry stored at `t` with window `w` is fresh while
//! `now < t + w`. Expired entries are dropped lazily on lookup and swept on
//! every insert.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::query::QueryKey;

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    stored_at: Instant,
    ttl: Duration,
}

impl<T> CacheEntry<T> {
    fn is_fresh(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) < self.ttl
    }
}

#[derive(Debug, Clone)]
pub struct QueryCache<T> {
    entries: HashMap<QueryKey, CacheEntry<T>>,
}

impl<T> Default for QueryCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> QueryCache<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Store `value` under `key`. A zero `ttl` stores nothing.
    pub fn insert(&mut self, key: QueryKey, value: T, ttl: Duration, now: Instant) {
        self.evict_expired(now);
        if ttl.is_zero() {
            return;
        }
        self.entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: now,
                ttl,
            },
        );
    }

    /// Fresh entry for `key`, dropping it if it has expired
    pub fn get(&mut self, key: &QueryKey, now: Instant) -> Option<&T> {
        let fresh = self.entries.get(key).map(|entry| entry.is_fresh(now))?;
        if !fresh {
            debug!(key = %key, "cache entry expired");
            self.entries.remove(key);
            return None;
        }
        self.entries.get(key).map(|entry| &entry.value)
    }

    /// Fresh entry without evicting; for inspection only
    pub fn peek(&self, key: &QueryKey, now: Instant) -> Option<&T> {
        self.entries
            .get(key)
            .filter(|entry| entry.is_fresh(now))
            .map(|entry| &entry.value)
    }

    pub fn invalidate(&mut self, key: &QueryKey) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drop every expired entry, returning how many went
    pub fn evict_expired(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_fresh(now));
        let evicted = before - self.entries.len();
        if evicted > 0 {
            debug!(evicted, "evicted expired cache entries");
        }
        evicted
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
