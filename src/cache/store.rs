//! Cache Store Module
//!
//! Bounded, time-expiring snapshot store. Freshness is checked lazily on
//! lookup; expired entries are only removed by a sweep, which every insert
//! runs before making room and storing the new entry.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, Clock, InsertionOrder, SystemClock};
use crate::config::Config;

/// Cache handle shared between the fetcher, the sweep task and the API.
///
/// Lookups take the read lock and may run together; inserts take the
/// write lock so sweep, eviction and store happen as one unit.
pub type SharedCache = Arc<RwLock<SnapshotCache>>;

// == Snapshot Cache ==
/// Element id to snapshot payload, bounded by `max_size` and `ttl_ms`.
#[derive(Debug)]
pub struct SnapshotCache {
    /// Stored snapshots keyed by element id
    entries: HashMap<String, CacheEntry>,
    /// Insertion order, used as the eviction tie-break
    order: InsertionOrder,
    /// Eviction/expiry counters (mutated under the write lock)
    stats: CacheStats,
    /// Lookup counters (mutated under the read lock)
    hits: AtomicU64,
    misses: AtomicU64,
    /// Freshness window in milliseconds
    ttl_ms: u64,
    /// Maximum number of entries
    max_size: usize,
    clock: Arc<dyn Clock>,
}

impl SnapshotCache {
    // == Constructor ==
    /// Creates a cache on the system clock.
    ///
    /// # Arguments
    /// * `ttl_ms` - Freshness window in milliseconds
    /// * `max_size` - Maximum number of entries (values below 1 are raised to 1)
    pub fn new(ttl_ms: u64, max_size: usize) -> Self {
        Self::with_clock(ttl_ms, max_size, Arc::new(SystemClock))
    }

    /// Creates a cache reading time from `clock`.
    pub fn with_clock(ttl_ms: u64, max_size: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            order: InsertionOrder::new(),
            stats: CacheStats::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            ttl_ms,
            max_size: max_size.max(1),
            clock,
        }
    }

    /// Creates a cache sized by the configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.cache_ttl_ms, config.cache_max_size)
    }

    /// Wraps the cache for sharing across tasks.
    pub fn shared(self) -> SharedCache {
        Arc::new(RwLock::new(self))
    }

    // == Lookup ==
    /// Returns the snapshot for `key` if present and fresh.
    ///
    /// A stale entry is reported as absent but left in place for the next
    /// sweep. The map is never modified here.
    pub fn lookup(&self, key: &str) -> Option<String> {
        let now = self.clock.now_ms();
        let found = self
            .entries
            .get(key)
            .filter(|entry| !entry.is_expired(now, self.ttl_ms))
            .map(|entry| entry.value.clone());

        match found {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        found
    }

    // == Sweep Expired ==
    /// Removes every entry whose age is at least the TTL.
    ///
    /// Returns the number of entries removed.
    pub fn sweep_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now, self.ttl_ms))
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();

        for key in expired_keys {
            self.entries.remove(&key);
            self.order.remove(&key);
        }

        self.stats.record_expirations(count);
        count
    }

    // == Evict If Full ==
    /// Removes the oldest entry when the cache is at capacity.
    ///
    /// Oldest is the smallest `stored_at`; among equal timestamps the key
    /// inserted earliest goes first. Returns the evicted key, if any.
    pub fn evict_if_full(&mut self) -> Option<String> {
        if self.entries.len() < self.max_size {
            return None;
        }

        let mut oldest: Option<(&String, u64)> = None;
        for key in self.order.earliest_first() {
            let Some(entry) = self.entries.get(key) else {
                continue;
            };
            match oldest {
                Some((_, stored_at)) if entry.stored_at >= stored_at => {}
                _ => oldest = Some((key, entry.stored_at)),
            }
        }

        let evicted = oldest.map(|(key, _)| key.clone())?;
        self.entries.remove(&evicted);
        self.order.remove(&evicted);
        self.stats.record_eviction();
        debug!(key = %evicted, "evicted oldest snapshot");
        Some(evicted)
    }

    // == Insert ==
    /// Stores `value` under `key`, stamped with the current time.
    ///
    /// Runs [`sweep_expired`](Self::sweep_expired) then
    /// [`evict_if_full`](Self::evict_if_full) first, so the size bound
    /// holds afterwards. An existing key is overwritten and its freshness
    /// reset.
    pub fn insert(&mut self, key: String, value: String) {
        let swept = self.sweep_expired();
        if swept > 0 {
            debug!(swept, "swept expired snapshots before insert");
        }
        self.evict_if_full();

        let entry = CacheEntry::new(value, self.clock.now_ms());
        self.order.record(&key);
        self.entries.insert(key, entry);
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.hits = self.hits.load(Ordering::Relaxed);
        stats.misses = self.misses.load(Ordering::Relaxed);
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Accessors ==
    /// Number of stored entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether an entry exists for `key`, fresh or not.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn ttl_ms(&self) -> u64 {
        self.ttl_ms
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;

    const TTL: u64 = 60_000;

    fn cache_with_clock(max_size: usize) -> (SnapshotCache, ManualClock) {
        let clock = ManualClock::new(1_000);
        let cache = SnapshotCache::with_clock(TTL, max_size, Arc::new(clock.clone()));
        (cache, clock)
    }

    #[test]
    fn test_store_new() {
        let cache = SnapshotCache::new(TTL, 3);
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        assert_eq!(cache.ttl_ms(), TTL);
        assert_eq!(cache.max_size(), 3);
    }

    #[test]
    fn test_zero_capacity_is_raised_to_one() {
        let (mut cache, _clock) = cache_with_clock(0);
        assert_eq!(cache.max_size(), 1);

        cache.insert("a".to_string(), "snap-a".to_string());
        cache.insert("b".to_string(), "snap-b".to_string());
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.lookup("b"), Some("snap-b".to_string()));
    }

    #[test]
    fn test_insert_then_lookup() {
        let (mut cache, _clock) = cache_with_clock(3);

        cache.insert("a".to_string(), "snap-a".to_string());

        assert_eq!(cache.lookup("a"), Some("snap-a".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_lookup_missing() {
        let (cache, _clock) = cache_with_clock(3);
        assert_eq!(cache.lookup("nope"), None);
    }

    #[test]
    fn test_lookup_stale_returns_none_but_keeps_entry() {
        let (mut cache, clock) = cache_with_clock(3);

        cache.insert("a".to_string(), "snap-a".to_string());
        clock.advance(TTL);

        assert_eq!(cache.lookup("a"), None);
        assert!(cache.contains_key("a"), "lookup must not delete stale entries");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_lookup_just_before_ttl() {
        let (mut cache, clock) = cache_with_clock(3);

        cache.insert("a".to_string(), "snap-a".to_string());
        clock.advance(TTL - 1);

        assert_eq!(cache.lookup("a"), Some("snap-a".to_string()));
    }

    #[test]
    fn test_sweep_expired() {
        let (mut cache, clock) = cache_with_clock(3);

        cache.insert("old".to_string(), "1".to_string());
        clock.advance(30_000);
        cache.insert("new".to_string(), "2".to_string());
        clock.advance(30_000);

        let removed = cache.sweep_expired();

        assert_eq!(removed, 1);
        assert!(!cache.contains_key("old"));
        assert_eq!(cache.lookup("new"), Some("2".to_string()));
        assert_eq!(cache.stats().expirations, 1);
    }

    #[test]
    fn test_evict_if_full_noop_below_capacity() {
        let (mut cache, clock) = cache_with_clock(3);

        cache.insert("a".to_string(), "1".to_string());
        clock.advance(1);
        cache.insert("b".to_string(), "2".to_string());

        assert_eq!(cache.evict_if_full(), None);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_evict_if_full_removes_oldest() {
        let (mut cache, clock) = cache_with_clock(3);

        for key in ["a", "b", "c"] {
            cache.insert(key.to_string(), format!("snap-{key}"));
            clock.advance(10);
        }

        assert_eq!(cache.evict_if_full(), Some("a".to_string()));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_eviction_order_on_insert() {
        let (mut cache, clock) = cache_with_clock(3);

        for key in ["a", "b", "c", "d"] {
            cache.insert(key.to_string(), format!("snap-{key}"));
            clock.advance(10);
        }

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.lookup("a"), None);
        assert!(cache.lookup("b").is_some());
        assert!(cache.lookup("c").is_some());
        assert!(cache.lookup("d").is_some());
    }

    #[test]
    fn test_eviction_tie_breaks_on_insertion_order() {
        let (mut cache, _clock) = cache_with_clock(3);

        // Clock never moves: every entry has the same stored_at.
        for key in ["x", "y", "z"] {
            cache.insert(key.to_string(), key.to_string());
        }
        cache.insert("w".to_string(), "w".to_string());

        assert!(!cache.contains_key("x"));
        assert!(cache.contains_key("y"));
        assert!(cache.contains_key("z"));
        assert!(cache.contains_key("w"));
    }

    #[test]
    fn test_overwrite_resets_freshness() {
        let (mut cache, clock) = cache_with_clock(3);

        cache.insert("a".to_string(), "v1".to_string());
        clock.advance(TTL - 1);
        cache.insert("a".to_string(), "v2".to_string());
        clock.advance(2);

        assert_eq!(cache.lookup("a"), Some("v2".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_overwrite_refreshes_eviction_position() {
        let (mut cache, clock) = cache_with_clock(3);

        for key in ["a", "b", "c"] {
            cache.insert(key.to_string(), key.to_string());
            clock.advance(10);
        }
        // Re-fetching "a" while full evicts the oldest (a itself), then stores it fresh.
        cache.insert("a".to_string(), "a2".to_string());
        clock.advance(10);
        cache.insert("d".to_string(), "d".to_string());

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.lookup("a"), Some("a2".to_string()));
        assert_eq!(cache.lookup("b"), None);
        assert!(cache.lookup("c").is_some());
        assert!(cache.lookup("d").is_some());
    }

    #[test]
    fn test_insert_sweeps_before_evicting() {
        let (mut cache, clock) = cache_with_clock(3);

        cache.insert("stale".to_string(), "1".to_string());
        clock.advance(TTL / 2);
        cache.insert("b".to_string(), "2".to_string());
        cache.insert("c".to_string(), "3".to_string());
        clock.advance(TTL / 2);

        cache.insert("d".to_string(), "4".to_string());

        let stats = cache.stats();
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.evictions, 0, "sweep already freed a slot");
        assert_eq!(cache.len(), 3);
        assert!(cache.lookup("b").is_some());
        assert!(cache.lookup("c").is_some());
    }

    #[test]
    fn test_store_stats() {
        let (mut cache, _clock) = cache_with_clock(3);

        cache.insert("a".to_string(), "1".to_string());
        cache.lookup("a");
        cache.lookup("missing");

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
    }

    #[tokio::test]
    async fn test_shared_cache_concurrent_inserts_respect_bound() {
        let cache = SnapshotCache::new(TTL, 3).shared();

        let mut handles = Vec::new();
        for i in 0..32 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .write()
                    .await
                    .insert(format!("el-{i}"), format!("snap-{i}"));
                cache.read().await.len()
            }));
        }

        for handle in handles {
            assert!(handle.await.unwrap() <= 3);
        }
        assert_eq!(cache.read().await.len(), 3);
    }
}
