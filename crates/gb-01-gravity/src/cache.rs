//! Bounded memoization cache for gravity evaluations.
//!
//! Keyed by quantized energy bucket. Bounded to a fixed number of
//! entries, evicted wholesale when full, and cleared on every
//! scheduling tick so staleness never exceeds one tick.

use std::collections::HashMap;

use parking_lot::RwLock;

/// Maximum cached buckets before wholesale eviction.
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Thread-safe bucket cache.
#[derive(Debug)]
pub struct GravityCache {
    buckets: RwLock<HashMap<u64, f64>>,
    capacity: usize,
}

impl GravityCache {
    /// Creates a cache with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Creates a cache with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buckets: RwLock::new(HashMap::new()),
            capacity,
        }
    }

    /// Looks up a cached value for the bucket.
    pub fn get(&self, bucket: u64) -> Option<f64> {
        self.buckets.read().get(&bucket).copied()
    }

    /// Inserts a value, evicting everything first when at capacity.
    pub fn insert(&self, bucket: u64, value: f64) {
        let mut buckets = self.buckets.write();
        if buckets.len() >= self.capacity {
            buckets.clear();
        }
        buckets.insert(bucket, value);
    }

    /// Drops every cached bucket. Called once per scheduling tick.
    pub fn clear(&self) {
        self.buckets.write().clear();
    }

    /// Number of cached buckets.
    pub fn len(&self) -> usize {
        self.buckets.read().len()
    }

    /// Returns true when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.buckets.read().is_empty()
    }
}

impl Default for GravityCache {
    fn default() -> Self {
        Self::new()
    }
}
