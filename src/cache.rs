//! # Response Cache Module
//!
//! Time-bounded, size-bounded store for formatted weather reports, keyed by
//! normalized city name. A read after an entry's expiry behaves as a miss.
//! When full, the least recently inserted entry is evicted.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use lru::LruCache;

use crate::config::WeatherCacheConfig;

/// Source of the current instant, injectable for tests
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock backed by `Instant::now`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: Instant,
}

/// Bounded TTL cache of formatted reports
///
/// Reads use `peek`, so recency is insertion order and a full cache drops
/// the least recently inserted entry.
pub struct ResponseCache {
    entries: Mutex<LruCache<String, CacheEntry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl ResponseCache {
    pub fn new(config: &WeatherCacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &WeatherCacheConfig, clock: Arc<dyn Clock>) -> Self {
        let capacity = NonZeroUsize::new(config.capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl: config.ttl,
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up a live entry; expired entries are dropped and reported as a miss
    pub fn get(&self, key: &str) -> Option<String> {
        let now = self.clock.now();
        let mut entries = self.lock();

        let expired = match entries.peek(key) {
            Some(entry) if now < entry.expires_at => return Some(entry.value.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.pop(key);
        }
        None
    }

    /// Insert or replace an entry, expiring `ttl` from now
    pub fn insert(&self, key: &str, value: String) {
        let expires_at = self.clock.now() + self.ttl;
        let mut entries = self.lock();

        // Replacing moves the key to the newest insertion slot
        entries.pop(key);
        entries.push(key.to_string(), CacheEntry { value, expires_at });
    }

    /// Number of stored entries, including ones not yet noticed as expired
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
