//! Key-value store boundary and the in-memory TTL implementation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::observability::metrics;

/// Opaque byte store with per-entry expiry.
///
/// Each call is atomic on its own; nothing is held across calls.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Value under `key`, if present and not expired.
    async fn get(&self, key: &str) -> Option<Vec<u8>>;

    /// Store `value` under `key` for `ttl`, replacing any existing value.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration);

    /// Remove `key`. Returns whether a live value was present.
    async fn delete(&self, key: &str) -> bool;
}

#[derive(Debug, Clone)]
struct StoredValue {
    value: Vec<u8>,
    /// `None` when the TTL reaches past what `Instant` can represent.
    expires_at: Option<Instant>,
}

impl StoredValue {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| at > now)
    }
}

/// A thread-safe volatile cache.
#[derive(Clone, Default)]
pub struct MemoryCacheStore {
    inner: Arc<DashMap<String, StoredValue>>,
}

impl MemoryCacheStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included until purged.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Drop expired entries. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.inner.len();
        self.inner.retain(|_, v| v.is_live(now));
        let removed = before.saturating_sub(self.inner.len());
        metrics::record_cache_size(self.inner.len());
        removed
    }

    /// Live and expired entry counts.
    pub fn get_summary(&self) -> (usize, usize) {
        let now = Instant::now();
        let mut live = 0;
        let mut expired = 0;
        for r in self.inner.iter() {
            if r.value().is_live(now) {
                live += 1;
            } else {
                expired += 1;
            }
        }
        (live, expired)
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Option<Vec<u8>> {
        let now = Instant::now();
        let hit = self.inner.get(key).and_then(|r| {
            if r.value().is_live(now) {
                Some(r.value().value.clone())
            } else {
                None
            }
        });

        if hit.is_none() {
            // Ref guard must be dropped before removing
            self.inner.remove_if(key, |_, v| !v.is_live(now));
        }
        hit
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) {
        self.inner.insert(
            key.to_string(),
            StoredValue {
                value,
                expires_at: Instant::now().checked_add(ttl),
            },
        );
        metrics::record_cache_size(self.inner.len());
    }

    async fn delete(&self, key: &str) -> bool {
        let removed = self.inner.remove(key);
        metrics::record_cache_size(self.inner.len());
        removed.is_some_and(|(_, v)| v.is_live(Instant::now()))
    }
}
