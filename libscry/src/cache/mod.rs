//! Session-scoped TTL caches.
//!
//! Provides the building blocks for the resolver's four tables: a
//! singleton slot (org listing) and LRU-bounded keyed tables (tokens, tag
//! lists, descriptions). Entries are freshness-checked on read; stale
//! entries are evicted rather than returned.
//!
//! Tables are owned by the resolver and shared between its clones, so
//! each one carries its own mutex. Locks are never held across an await.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};


/// A cached value plus the instant it was fetched.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    value: T,
    fetched_at: Instant,
}

impl<T> CacheEntry<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            fetched_at: Instant::now(),
        }
    }

    /// An entry is fresh while less than `ttl` has passed since the fetch.
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

/// A single-slot TTL cache, for the organization-wide listing.
pub struct SingletonCache<T> {
    slot: Mutex<Option<CacheEntry<T>>>,
    ttl: Duration,
}

impl<T: Clone> SingletonCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: Mutex::new(None),
            ttl,
        }
    }

    /// Returns the cached value if present and fresh.
    pub fn get(&self) -> Option<T> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        match slot.as_ref() {
            Some(entry) if entry.is_fresh(self.ttl) => Some(entry.value.clone()),
            Some(_) => {
                *slot = None;
                None
            }
            None => None,
        }
    }

    pub fn put(&self, value: T) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(CacheEntry::new(value));
    }

    pub fn invalidate(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = None;
    }
}

/// An LRU-bounded, TTL-checked keyed cache.
pub struct KeyedCache<T> {
    entries: Mutex<LruCache<String, CacheEntry<T>>>,
    ttl: Duration,
}

impl<T: Clone> KeyedCache<T> {
    pub fn new(capacity: NonZeroUsize, ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    /// Returns the cached value for `key` if present and fresh; stale
    /// entries are dropped on the way out.
    pub fn get(&self, key: &str) -> Option<T> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        match entries.get(key) {
            Some(entry) if entry.is_fresh(self.ttl) => Some(entry.value.clone()),
            Some(_) => {
                entries.pop(key);
                None
            }
            None => None,
        }
    }

    pub fn put(&self, key: &str, value: T) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.put(key.to_string(), CacheEntry::new(value));
    }

    /// Drops the entry for `key`, if any.
    pub fn invalidate(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.pop(key);
    }

    /// Drops every entry whose key starts with `prefix`.
    ///
    /// Used by the reload path to clear all cached tags' descriptions for
    /// one repository without touching other repositories.
    pub fn invalidate_prefix(&self, prefix: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let keys: Vec<String> = entries
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect();
        for key in keys {
            entries.pop(&key);
        }
    }

    pub fn len(&self) -> usize {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
