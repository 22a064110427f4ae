//! Memory Tier Module
//!
//! Fixed-capacity, TTL-aware in-process cache for hot, ephemeral values.
//! Combines HashMap storage with LRU tracking; intentionally volatile.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::adapter::{CacheAdapter, SetOptions};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::logging::{log_cache_event, CacheOp};
use crate::tiers::{CacheEntry, CacheStats, LruTracker, DEFAULT_MAX_ENTRIES, DEFAULT_TTL_SECS};
use crate::value::CacheValue;

const ADAPTER_NAME: &str = "memory";

// == Memory Store ==
/// Single-threaded core of the memory tier: entries, recency order, and
/// counters. The public adapter wraps this in a Mutex.
#[derive(Debug)]
struct MemoryStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance counters
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// TTL applied when `set` carries none
    default_ttl: Duration,
}

impl MemoryStore {
    fn new(max_entries: usize, default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries,
            default_ttl,
        }
    }

    // == Set ==
    /// Stores an entry, fully replacing an existing one for the key.
    ///
    /// Inserting a new key at capacity evicts the least recently used
    /// entry first, regardless of that entry's expiry state.
    fn set(&mut self, key: &str, value: CacheValue, ttl: Option<Duration>) {
        let is_overwrite = self.entries.contains_key(key);

        if !is_overwrite && self.entries.len() >= self.max_entries {
            if let Some(evicted_key) = self.lru.evict_oldest() {
                self.entries.remove(&evicted_key);
                self.stats.record_eviction();
            }
        }

        let effective_ttl = ttl.unwrap_or(self.default_ttl);
        self.entries
            .insert(key.to_string(), CacheEntry::new(value, Some(effective_ttl)));

        // Insert as most-recent
        self.lru.touch(key);
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Retrieves a value, refreshing its recency.
    ///
    /// An expired entry is removed on the spot and reported as a miss.
    fn get(&mut self, key: &str) -> Option<CacheValue> {
        match self.entries.get(key) {
            Some(entry) if entry.is_expired() => {
                self.remove_entry(key);
                self.stats.record_expiration();
                self.stats.record_miss();
                None
            }
            Some(entry) => {
                let value = entry.value.clone();
                self.stats.record_hit();
                self.lru.touch(key);
                Some(value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Contains ==
    /// Existence check with the same expiry handling and recency refresh
    /// as `get`, but without touching the hit/miss counters.
    fn contains(&mut self, key: &str) -> bool {
        match self.entries.get(key) {
            Some(entry) if entry.is_expired() => {
                self.remove_entry(key);
                self.stats.record_expiration();
                false
            }
            Some(_) => {
                self.lru.touch(key);
                true
            }
            None => false,
        }
    }

    // == Delete ==
    /// Removes an entry. Deleting an absent key is a no-op.
    fn delete(&mut self, key: &str) {
        self.remove_entry(key);
    }

    fn remove_entry(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.lru.remove(key);
            self.stats.set_total_entries(self.entries.len());
        }
    }

    fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }
}

// == Memory Cache ==
/// Bounded LRU + TTL cache tier.
///
/// Interior locking keeps the adapter usable behind a shared reference;
/// the lock is never held across an await point.
#[derive(Debug)]
pub struct MemoryCache {
    inner: Mutex<MemoryStore>,
}

impl MemoryCache {
    // == Constructor ==
    /// Creates a memory tier with the given capacity and default TTL.
    pub fn new(max_entries: usize, default_ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(MemoryStore::new(max_entries, default_ttl)),
        }
    }

    /// Creates a memory tier from configuration.
    pub fn with_config(config: &CacheConfig) -> Self {
        Self::new(config.memory_max_entries, config.memory_default_ttl())
    }

    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.store().stats()
    }

    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.store().entries.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn store(&self) -> MutexGuard<'_, MemoryStore> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES, Duration::from_secs(DEFAULT_TTL_SECS))
    }
}

// == Adapter Implementation ==
#[async_trait]
impl CacheAdapter for MemoryCache {
    fn name(&self) -> &str {
        ADAPTER_NAME
    }

    async fn get(&self, key: &str) -> Option<CacheValue> {
        let result = self.store().get(key);
        let op = if result.is_some() {
            CacheOp::Hit
        } else {
            CacheOp::Miss
        };
        log_cache_event(ADAPTER_NAME, op, key);
        result
    }

    async fn set(&self, key: &str, value: CacheValue, opts: SetOptions) -> Result<()> {
        self.store().set(key, value, opts.ttl);
        log_cache_event(ADAPTER_NAME, CacheOp::Set, key);
        Ok(())
    }

    async fn delete(&self, key: &str) {
        self.store().delete(key);
        log_cache_event(ADAPTER_NAME, CacheOp::Delete, key);
    }

    async fn has(&self, key: &str) -> bool {
        self.store().contains(key)
    }
}
