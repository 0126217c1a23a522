//! Navigation cache
//!
//! This module provides a size-bounded cache with per-entry TTL expiry and
//! least-recently-used eviction. It memoizes derived navigation structures
//! (role item lists, resolved contexts, page metadata).
//!
//! Expiry is checked lazily on [`NavigationCache::get`] and
//! [`NavigationCache::has`], and proactively by a periodic sweep
//! ([`NavigationCache::spawn_sweeper`]) so keys that are written once and never
//! read again do not pile up.
//!
//! # Example
//!
//! ```rust
//! use storage::cache::{CacheConfig, NavigationCache};
//! use std::time::Duration;
//!
//! let cache: NavigationCache<Vec<String>> = NavigationCache::new(
//!     CacheConfig::new().max_size_bytes(4096).default_ttl(Duration::from_secs(60)),
//! );
//!
//! cache.set("nav:pilot:all", vec!["aircraft".to_string()]);
//! assert_eq!(cache.get("nav:pilot:all"), Some(vec!["aircraft".to_string()]));
//! assert_eq!(cache.hit_rate(), 1.0);
//! ```

use lru::LruCache;
use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tokio::task::JoinHandle;

/// Size assumed for a value whose serialized size cannot be measured
pub const FALLBACK_ENTRY_SIZE: usize = 1024;

/// Cache error types
#[derive(Debug, Error)]
pub enum CacheError {
    /// Configuration cannot be used
    #[error("Invalid cache configuration: {0}")]
    InvalidConfig(String),

    /// Background work was requested outside of a tokio runtime
    #[error("No async runtime available: {0}")]
    NoRuntime(String),
}

/// Result type for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;

// =============================================================================
// Clock
// =============================================================================

/// Source of wall-clock milliseconds used for TTL and recency bookkeeping
pub trait Clock: Send + Sync + fmt::Debug {
    /// Current time in milliseconds
    fn now_ms(&self) -> u64;
}

/// Clock backed by [`SystemTime`]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Manually driven clock for deterministic tests
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock starting at `start_ms`
    pub fn new(start_ms: u64) -> Self {
        Self { now: Arc::new(AtomicU64::new(start_ms)) }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        self.now.fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }

    /// Jump to an absolute time
    pub fn set(&self, now_ms: u64) {
        self.now.store(now_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Cache configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum total size of cached values in bytes
    pub max_size_bytes: usize,
    /// TTL applied when `set` is called without one
    pub default_ttl: Duration,
    /// Interval of the background expiry sweep
    pub sweep_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: 1024 * 1024,              // 1MB
            default_ttl: Duration::from_secs(5 * 60), // 5 minutes
            sweep_interval: Duration::from_secs(60),
        }
    }
}

impl CacheConfig {
    /// Create a new cache configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset for role navigation item lists
    pub fn navigation_items() -> Self {
        Self::new()
            .max_size_bytes(512 * 1024)
            .default_ttl(Duration::from_secs(5 * 60))
    }

    /// Preset for resolved role contexts
    pub fn contexts() -> Self {
        Self::new()
            .max_size_bytes(64 * 1024)
            .default_ttl(Duration::from_secs(10 * 60))
    }

    /// Preset for page metadata
    pub fn page_info() -> Self {
        Self::new()
            .max_size_bytes(128 * 1024)
            .default_ttl(Duration::from_secs(5 * 60))
    }

    /// Set maximum size in bytes
    pub fn max_size_bytes(mut self, bytes: usize) -> Self {
        self.max_size_bytes = bytes;
        self
    }

    /// Set default TTL
    pub fn default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Set the background sweep interval
    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Check that the configuration can drive a cache and its sweeper
    pub fn validate(&self) -> Result<()> {
        if self.max_size_bytes == 0 {
            return Err(CacheError::InvalidConfig("max_size_bytes must be greater than 0".into()));
        }
        if self.sweep_interval.is_zero() {
            return Err(CacheError::InvalidConfig("sweep_interval must be non-zero".into()));
        }
        Ok(())
    }
}

// =============================================================================
// Entries and statistics
// =============================================================================

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    timestamp: u64,
    access_count: u64,
    last_accessed: u64,
    size: usize,
    ttl: Duration,
    /// Distinguishes this entry from later writes to the same key
    generation: u64,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: u64) -> bool {
        now.saturating_sub(self.timestamp) > self.ttl.as_millis() as u64
    }

    fn metadata(&self) -> EntryMetadata {
        EntryMetadata {
            timestamp: self.timestamp,
            access_count: self.access_count,
            last_accessed: self.last_accessed,
            size: self.size,
        }
    }
}

/// Bookkeeping attached to a cached value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryMetadata {
    /// When the entry was written (ms)
    pub timestamp: u64,
    /// Number of live hits served
    pub access_count: u64,
    /// Last write or hit (ms)
    pub last_accessed: u64,
    /// Estimated size in bytes
    pub size: usize,
}

/// Snapshot of cache counters
///
/// `hits`, `misses`, `evictions` and `sets` accumulate for the lifetime of the
/// cache; `size` and `entries` describe the live contents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Live lookups served
    pub hits: u64,
    /// Lookups that found nothing or an expired entry
    pub misses: u64,
    /// Entries removed by expiry, deletion or size pressure
    pub evictions: u64,
    /// Successful writes
    pub sets: u64,
    /// Sum of live entry sizes in bytes
    pub size: usize,
    /// Number of live entries
    pub entries: usize,
}

struct CacheState<V> {
    entries: LruCache<String, CacheEntry<V>>,
    stats: CacheStats,
    next_generation: u64,
}

impl<V> CacheState<V> {
    fn new() -> Self {
        Self { entries: LruCache::unbounded(), stats: CacheStats::default(), next_generation: 0 }
    }

    /// Remove one entry and record it as an eviction
    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let entry = self.entries.pop(key)?;
        self.stats.size = self.stats.size.saturating_sub(entry.size);
        self.stats.entries = self.entries.len();
        self.stats.evictions += 1;
        Some(entry)
    }

    /// Evict least recently used entries until `incoming` bytes fit
    fn make_room(&mut self, incoming: usize, max_size: usize) {
        if self.stats.size + incoming <= max_size {
            return;
        }

        let mut freed = 0usize;
        let mut evicted = 0u64;
        while self.stats.size.saturating_sub(freed) + incoming > max_size {
            match self.entries.pop_lru() {
                Some((_, entry)) => {
                    freed += entry.size;
                    evicted += 1;
                }
                None => break,
            }
        }

        // Counters are updated once, after the loop
        self.stats.size = self.stats.size.saturating_sub(freed);
        self.stats.entries = self.entries.len();
        self.stats.evictions += evicted;

        if evicted > 0 {
            tracing::debug!(evicted, freed, "evicted least recently used cache entries");
        }
    }

    fn sweep(&mut self, now: u64) -> usize {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.remove_entry(key);
        }

        expired.len()
    }
}

// =============================================================================
// NavigationCache
// =============================================================================

/// Size-bounded TTL cache with least-recently-used eviction
///
/// Cloning a `NavigationCache` yields another handle to the same entries.
pub struct NavigationCache<V> {
    state: Arc<Mutex<CacheState<V>>>,
    config: CacheConfig,
    clock: Arc<dyn Clock>,
}

impl<V> Clone for NavigationCache<V> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            config: self.config.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<V> fmt::Debug for NavigationCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationCache")
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish()
    }
}

impl<V> NavigationCache<V> {
    /// Create a cache using the system clock
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a cache driven by a custom clock
    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self { state: Arc::new(Mutex::new(CacheState::new())), config, clock }
    }

    /// The configuration this cache was built with
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Check whether a live entry exists
    ///
    /// An expired entry is removed (and counted as an eviction) but hit and
    /// miss counters are left alone.
    pub fn has(&self, key: &str) -> bool {
        let now = self.clock.now_ms();
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let expired = match state.entries.peek(key) {
            Some(entry) => entry.is_expired(now),
            None => return false,
        };

        if expired {
            state.remove_entry(key);
            return false;
        }
        true
    }

    /// Remove an entry, returning whether one was present
    pub fn delete(&self, key: &str) -> bool {
        self.state.lock().remove_entry(key).is_some()
    }

    /// Remove every entry whose key starts with `prefix`
    pub fn invalidate_prefix(&self, prefix: &str) -> usize {
        let mut state = self.state.lock();
        let keys: Vec<String> = state
            .entries
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &keys {
            state.remove_entry(key);
        }
        keys.len()
    }

    /// Remove all entries
    ///
    /// Hit, miss, eviction and set counters are cumulative and survive a clear.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.stats.size = 0;
        state.stats.entries = 0;
    }

    /// Number of entries currently held (no expiry sweep)
    pub fn size(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// Check if the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Keys currently held, most recently used first
    pub fn keys(&self) -> Vec<String> {
        self.state.lock().entries.iter().map(|(key, _)| key.clone()).collect()
    }

    /// Entry bookkeeping without touching recency or counters
    pub fn peek_metadata(&self, key: &str) -> Option<EntryMetadata> {
        self.state.lock().entries.peek(key).map(CacheEntry::metadata)
    }

    /// Snapshot of the counters
    pub fn stats(&self) -> CacheStats {
        self.state.lock().stats
    }

    /// `hits / (hits + misses)`, or 0 before any lookup
    pub fn hit_rate(&self) -> f64 {
        let stats = self.stats();
        let lookups = stats.hits + stats.misses;
        if lookups == 0 {
            0.0
        } else {
            stats.hits as f64 / lookups as f64
        }
    }

    /// Remove every expired entry now
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now_ms();
        self.state.lock().sweep(now)
    }
}

impl<V: Clone> NavigationCache<V> {
    /// Get a live value
    ///
    /// A hit refreshes the entry's recency. An expired entry is deleted and
    /// reported as a miss.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now_ms();
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let expired = match state.entries.peek(key) {
            Some(entry) => entry.is_expired(now),
            None => {
                state.stats.misses += 1;
                return None;
            }
        };

        if expired {
            state.remove_entry(key);
            state.stats.misses += 1;
            return None;
        }

        state.stats.hits += 1;
        let entry = state.entries.get_mut(key)?;
        entry.access_count += 1;
        entry.last_accessed = now;
        Some(entry.value.clone())
    }
}

impl<V: Serialize> NavigationCache<V> {
    /// Store a value under the default TTL
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.insert(key.into(), value, self.config.default_ttl);
    }

    fn insert(&self, key: String, value: V, ttl: Duration) -> Option<u64> {
        let size = estimate_size(&value);
        let now = self.clock.now_ms();
        let mut guard = self.state.lock();
        let state = &mut *guard;

        if size > self.config.max_size_bytes {
            // The old value was replaced by the caller and must not be served
            state.remove_entry(&key);
            tracing::debug!(
                key = %key,
                size,
                max = self.config.max_size_bytes,
                "value larger than cache budget, not cached"
            );
            return None;
        }

        // Overwrites replace the old size rather than adding to it
        if let Some(previous) = state.entries.pop(&key) {
            state.stats.size = state.stats.size.saturating_sub(previous.size);
        }

        state.make_room(size, self.config.max_size_bytes);

        let generation = state.next_generation;
        state.next_generation += 1;
        state.entries.put(
            key,
            CacheEntry {
                value,
                timestamp: now,
                access_count: 0,
                last_accessed: now,
                size,
                ttl,
                generation,
            },
        );
        state.stats.size += size;
        state.stats.entries = state.entries.len();
        state.stats.sets += 1;

        Some(generation)
    }
}

impl<V: Serialize + Send + 'static> NavigationCache<V> {
    /// Store a value with its own TTL
    ///
    /// When the TTL differs from the default and a tokio runtime is current,
    /// a deferred delete is scheduled in addition to the lazy expiry check.
    /// The deferred delete only removes the entry written by this call.
    pub fn set_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();
        let Some(generation) = self.insert(key.clone(), value, ttl) else {
            return;
        };

        if ttl != self.config.default_ttl {
            self.schedule_delete(key, generation, ttl);
        }
    }

    fn schedule_delete(&self, key: String, generation: u64, ttl: Duration) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::trace!(key = %key, "no runtime, relying on lazy expiry");
            return;
        };

        let state = Arc::clone(&self.state);
        handle.spawn(async move {
            tokio::time::sleep(ttl).await;
            let mut state = state.lock();
            let same_entry = state
                .entries
                .peek(&key)
                .map(|entry| entry.generation == generation)
                .unwrap_or(false);
            if same_entry {
                state.remove_entry(&key);
            }
        });
    }

    /// Run [`sweep_expired`](Self::sweep_expired) every `sweep_interval`
    ///
    /// The task runs until the returned handle is aborted.
    pub fn spawn_sweeper(&self) -> Result<JoinHandle<()>> {
        self.config.validate()?;
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|e| CacheError::NoRuntime(e.to_string()))?;

        let cache = self.clone();
        let period = self.config.sweep_interval;
        Ok(handle.spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = cache.sweep_expired();
                if removed > 0 {
                    tracing::debug!(removed, "swept expired cache entries");
                }
            }
        }))
    }
}

/// Approximate byte size of a value from its JSON encoding
fn estimate_size<V: Serialize>(value: &V) -> usize {
    match serde_json::to_vec(value) {
        Ok(bytes) => bytes.len(),
        Err(err) => {
            tracing::warn!(error = %err, "could not measure cache value, using fallback size");
            FALLBACK_ENTRY_SIZE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serializer;

    fn cache_with_clock(config: CacheConfig) -> (NavigationCache<String>, ManualClock) {
        let clock = ManualClock::new(1_000);
        let cache = NavigationCache::with_clock(config, Arc::new(clock.clone()));
        (cache, clock)
    }

    /// A string whose JSON encoding is exactly `bytes` long
    fn sized(bytes: usize) -> String {
        "x".repeat(bytes - 2)
    }

    struct Unmeasurable;

    impl Serialize for Unmeasurable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> std::result::Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("cyclic structure"))
        }
    }

    #[test]
    fn test_basic_get_set() {
        let (cache, _) = cache_with_clock(CacheConfig::new());

        cache.set("key1", "value1".to_string());

        assert_eq!(cache.get("key1"), Some("value1".to_string()));
        assert_eq!(cache.get("missing"), None);
        assert_eq!(cache.size(), 1);
    }

    #[test]
    fn test_ttl_expiry_on_get_and_has() {
        let config = CacheConfig::new().default_ttl(Duration::from_millis(100));
        let (cache, clock) = cache_with_clock(config);

        cache.set("key1", "value1".to_string());
        assert!(cache.has("key1"));

        // Exactly at the TTL boundary the entry is still live
        clock.advance(Duration::from_millis(100));
        assert!(cache.has("key1"));

        clock.advance(Duration::from_millis(1));
        assert_eq!(cache.get("key1"), None);
        assert!(!cache.has("key1"));

        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.entries, 0);
        assert_eq!(stats.size, 0);
    }

    #[test]
    fn test_has_expiry_does_not_touch_hit_counters() {
        let config = CacheConfig::new().default_ttl(Duration::from_millis(10));
        let (cache, clock) = cache_with_clock(config);

        cache.set("key1", "v".to_string());
        assert!(cache.has("key1"));
        clock.advance(Duration::from_millis(11));
        assert!(!cache.has("key1"));

        let stats = cache.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.evictions, 1);
    }

    #[test]
    fn test_size_bound_with_eviction() {
        let config = CacheConfig::new().max_size_bytes(1000);
        let (cache, _) = cache_with_clock(config);

        for i in 0..15 {
            cache.set(format!("key{}", i), sized(100));
        }

        let stats = cache.stats();
        assert!(stats.size <= 1000);
        assert!(stats.evictions > 0);
        assert_eq!(stats.entries, cache.size());
        assert_eq!(stats.sets, 15);
    }

    #[test]
    fn test_lru_eviction_keeps_recently_read_entry() {
        let config = CacheConfig::new().max_size_bytes(300);
        let (cache, clock) = cache_with_clock(config);

        cache.set("a", sized(100));
        clock.advance(Duration::from_millis(1));
        cache.set("b", sized(100));
        clock.advance(Duration::from_millis(1));
        cache.set("c", sized(100));
        clock.advance(Duration::from_millis(1));

        assert!(cache.get("a").is_some());

        cache.set("d", sized(100));
        assert!(!cache.has("b"));
        assert!(cache.has("a"));
        assert!(cache.has("c"));

        // c was never read again, so it goes before a
        cache.set("e", sized(100));
        assert!(!cache.has("c"));
        assert!(cache.has("a"));
        assert_eq!(cache.stats().evictions, 2);
    }

    #[test]
    fn test_overwrite_adjusts_size_by_delta() {
        let (cache, _) = cache_with_clock(CacheConfig::new());

        cache.set("key", sized(100));
        assert_eq!(cache.stats().size, 100);

        cache.set("key", sized(40));
        let stats = cache.stats();
        assert_eq!(stats.size, 40);
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.evictions, 0);
    }

    #[test]
    fn test_oversized_value_is_not_cached() {
        let config = CacheConfig::new().max_size_bytes(50);
        let (cache, _) = cache_with_clock(config);

        cache.set("small", sized(20));
        cache.set("huge", sized(500));

        assert!(cache.has("small"));
        assert!(!cache.has("huge"));
        assert!(cache.stats().size <= 50);
    }

    #[test]
    fn test_oversized_overwrite_drops_previous_value() {
        let config = CacheConfig::new().max_size_bytes(50);
        let (cache, _) = cache_with_clock(config);

        cache.set("k", "old".to_string());
        cache.set("other", sized(10));
        cache.set("k", sized(500));

        assert_eq!(cache.get("k"), None);
        let stats = cache.stats();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.size, 10);
        assert_eq!(stats.evictions, 1);
        assert_eq!(cache.get("other"), Some(sized(10)));
    }

    #[test]
    fn test_unmeasurable_value_uses_fallback_size() {
        let cache: NavigationCache<Unmeasurable> = NavigationCache::new(CacheConfig::new());

        cache.set("cyclic", Unmeasurable);

        assert!(cache.has("cyclic"));
        assert_eq!(cache.stats().size, FALLBACK_ENTRY_SIZE);
    }

    #[test]
    fn test_exact_fit_does_not_evict() {
        let config = CacheConfig::new().max_size_bytes(100);
        let (cache, _) = cache_with_clock(config);

        cache.set("only", sized(100));
        assert_eq!(cache.stats().evictions, 0);
        assert_eq!(cache.stats().size, 100);

        // Replacing the only entry frees its own space first
        cache.set("only", sized(90));
        assert_eq!(cache.stats().evictions, 0);
        assert_eq!(cache.stats().size, 90);
    }

    #[test]
    fn test_delete() {
        let (cache, _) = cache_with_clock(CacheConfig::new());

        cache.set("key1", "value1".to_string());
        assert!(cache.delete("key1"));
        assert!(!cache.delete("key1"));

        let stats = cache.stats();
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.size, 0);
        assert_eq!(stats.entries, 0);
    }

    #[test]
    fn test_clear_keeps_cumulative_counters() {
        let (cache, _) = cache_with_clock(CacheConfig::new());

        cache.set("key1", "a".to_string());
        cache.set("key2", "b".to_string());
        cache.get("key1");
        cache.get("nope");

        cache.clear();

        let stats = cache.stats();
        assert!(cache.is_empty());
        assert_eq!(stats.size, 0);
        assert_eq!(stats.entries, 0);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.sets, 2);
    }

    #[test]
    fn test_hit_rate() {
        let (cache, _) = cache_with_clock(CacheConfig::new());
        assert_eq!(cache.hit_rate(), 0.0);

        cache.set("key", "v".to_string());
        cache.get("key");
        cache.get("key");
        cache.get("key");
        cache.get("missing");

        assert_eq!(cache.hit_rate(), 0.75);
    }

    #[test]
    fn test_access_metadata() {
        let (cache, clock) = cache_with_clock(CacheConfig::new());

        cache.set("key", "v".to_string());
        clock.advance(Duration::from_millis(25));
        cache.get("key");
        cache.get("key");

        let meta = cache.peek_metadata("key").unwrap();
        assert_eq!(meta.timestamp, 1_000);
        assert_eq!(meta.last_accessed, 1_025);
        assert_eq!(meta.access_count, 2);
        assert_eq!(meta.size, 3);
    }

    #[test]
    fn test_size_matches_sum_of_entries() {
        let (cache, _) = cache_with_clock(CacheConfig::new().max_size_bytes(500));

        cache.set("a", sized(120));
        cache.set("b", sized(80));
        cache.set("a", sized(60));
        cache.set("c", sized(300));
        cache.delete("b");

        let total: usize = cache
            .keys()
            .iter()
            .filter_map(|key| cache.peek_metadata(key))
            .map(|meta| meta.size)
            .sum();
        let stats = cache.stats();
        assert_eq!(stats.size, total);
        assert_eq!(stats.entries, cache.size());
    }

    #[test]
    fn test_sweep_expired() {
        let config = CacheConfig::new().default_ttl(Duration::from_secs(1));
        let (cache, clock) = cache_with_clock(config);

        cache.set("old", "1".to_string());
        clock.advance(Duration::from_millis(800));
        cache.set("new", "2".to_string());
        clock.advance(Duration::from_millis(300));

        assert_eq!(cache.sweep_expired(), 1);
        assert!(cache.has("new"));
        assert_eq!(cache.size(), 1);
    }

    #[test]
    fn test_invalidate_prefix() {
        let (cache, _) = cache_with_clock(CacheConfig::new());

        cache.set("nav:pilot:all", "1".to_string());
        cache.set("nav:pilot:main", "2".to_string());
        cache.set("nav:admin:all", "3".to_string());

        assert_eq!(cache.invalidate_prefix("nav:pilot:"), 2);
        assert_eq!(cache.keys(), vec!["nav:admin:all".to_string()]);
    }

    #[test]
    fn test_custom_ttl_without_runtime_uses_lazy_expiry() {
        let (cache, clock) = cache_with_clock(CacheConfig::new());

        cache.set_with_ttl("short", "v".to_string(), Duration::from_millis(50));
        assert!(cache.has("short"));

        clock.advance(Duration::from_millis(51));
        assert_eq!(cache.get("short"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_ttl_schedules_delete() {
        let (cache, _) = cache_with_clock(CacheConfig::new());

        cache.set_with_ttl("short", "v".to_string(), Duration::from_secs(5));
        assert!(cache.has("short"));

        tokio::time::sleep(Duration::from_secs(6)).await;

        // The manual clock never moved, so only the deferred delete can explain this
        assert!(!cache.has("short"));
        assert_eq!(cache.stats().entries, 0);
        assert_eq!(cache.stats().size, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduled_delete_ignores_overwritten_entry() {
        let (cache, _) = cache_with_clock(CacheConfig::new());

        cache.set_with_ttl("key", "first".to_string(), Duration::from_secs(5));
        cache.set("key", "second".to_string());

        tokio::time::sleep(Duration::from_secs(6)).await;

        assert_eq!(cache.get("key"), Some("second".to_string()));
        let stats = cache.stats();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.size, 8);
        assert_eq!(stats.evictions, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduled_delete_after_manual_delete() {
        let (cache, _) = cache_with_clock(CacheConfig::new());

        cache.set_with_ttl("key", "v".to_string(), Duration::from_secs(5));
        assert!(cache.delete("key"));

        tokio::time::sleep(Duration::from_secs(6)).await;

        let stats = cache.stats();
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.entries, 0);
        assert_eq!(stats.size, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_background_sweeper() {
        let config = CacheConfig::new()
            .default_ttl(Duration::from_secs(10))
            .sweep_interval(Duration::from_secs(60));
        let (cache, clock) = cache_with_clock(config);

        cache.set("write-once", "v".to_string());
        clock.advance(Duration::from_secs(11));

        let sweeper = cache.spawn_sweeper().unwrap();
        tokio::time::sleep(Duration::from_secs(61)).await;

        assert_eq!(cache.size(), 0);
        assert_eq!(cache.stats().evictions, 1);
        sweeper.abort();
    }

    #[test]
    fn test_spawn_sweeper_requires_runtime() {
        let cache: NavigationCache<String> = NavigationCache::new(CacheConfig::new());
        assert!(matches!(cache.spawn_sweeper(), Err(CacheError::NoRuntime(_))));
    }

    #[test]
    fn test_config_builder_and_presets() {
        let config = CacheConfig::new()
            .max_size_bytes(2048)
            .default_ttl(Duration::from_secs(30))
            .sweep_interval(Duration::from_secs(15));

        assert_eq!(config.max_size_bytes, 2048);
        assert_eq!(config.default_ttl, Duration::from_secs(30));
        assert_eq!(config.sweep_interval, Duration::from_secs(15));

        assert_eq!(CacheConfig::navigation_items().max_size_bytes, 512 * 1024);
        assert_eq!(CacheConfig::contexts().default_ttl, Duration::from_secs(600));
        assert!(CacheConfig::page_info().validate().is_ok());
        assert!(CacheConfig::new().max_size_bytes(0).validate().is_err());
        assert!(CacheConfig::new().sweep_interval(Duration::ZERO).validate().is_err());
    }
}
