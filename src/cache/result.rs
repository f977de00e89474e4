//! Cache of annotated timeline results.
//!
//! # Design Decisions
//! - Payloads carry an explicit schema version; a version mismatch is reported
//!   separately from corruption, and callers treat both as a miss
//! - Keys are namespaced with a prefix so unrelated subsystems sharing the
//!   store never collide
//! - No locking across `get`/`put`: concurrent misses for the same key fetch
//!   independently and the last `put` wins

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cache::store::CacheStore;
use crate::config::CacheConfig;
use crate::haiku::types::Haiku;
use crate::timeline::types::User;

/// Current layout of `CachedTimeline`. Bump on any incompatible change.
pub const CACHE_SCHEMA_VERSION: u32 = 1;

/// Errors reading or writing cached results.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Stored blob does not decode.
    #[error("corrupt cache entry: {0}")]
    Corruption(String),

    /// Stored blob was written with another schema version.
    #[error("stale cache entry: schema version {found}, expected {expected}")]
    StaleFormat { found: u32, expected: u32 },

    /// Result could not be serialized.
    #[error("failed to encode cache entry: {0}")]
    Encode(String),
}

/// Serialized form of a cached pipeline result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedTimeline {
    pub version: u32,
    pub cached_at: DateTime<Utc>,
    pub user: User,
    pub haikus: Vec<Haiku>,
}

#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

/// TTL-bounded cache of `(User, Vec<Haiku>)` keyed by screen name.
#[derive(Clone)]
pub struct ResultCache {
    store: Arc<dyn CacheStore>,
    key_prefix: String,
    ttl: Duration,
}

impl ResultCache {
    pub fn new(store: Arc<dyn CacheStore>, config: &CacheConfig) -> Self {
        Self {
            store,
            key_prefix: config.key_prefix.clone(),
            ttl: Duration::from_secs(config.ttl_secs),
        }
    }

    /// Namespaced store key for a screen name.
    pub fn cache_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up `key`, reporting undecodable entries as errors.
    pub async fn lookup(&self, key: &str) -> Result<Option<CachedTimeline>, CacheError> {
        match self.store.get(&self.cache_key(key)).await {
            Some(blob) => decode(&blob).map(Some),
            None => Ok(None),
        }
    }

    /// Look up `key`. Corrupt or stale entries are logged and treated as absent.
    pub async fn get(&self, key: &str) -> Option<(User, Vec<Haiku>)> {
        match self.lookup(key).await {
            Ok(entry) => entry.map(|e| (e.user, e.haikus)),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Ignoring unreadable cache entry");
                None
            }
        }
    }

    /// Store a result under `key` with the configured TTL, overwriting.
    pub async fn put(&self, key: &str, user: &User, haikus: &[Haiku]) -> Result<(), CacheError> {
        let record = CachedTimeline {
            version: CACHE_SCHEMA_VERSION,
            cached_at: Utc::now(),
            user: user.clone(),
            haikus: haikus.to_vec(),
        };
        let blob = serde_json::to_vec(&record).map_err(|e| CacheError::Encode(e.to_string()))?;
        self.store.set(&self.cache_key(key), blob, self.ttl).await;
        Ok(())
    }

    /// Remove the entry for `key`. Returns whether one was present.
    pub async fn invalidate(&self, key: &str) -> bool {
        self.store.delete(&self.cache_key(key)).await
    }

    /// When the current entry for `key` was stored.
    pub async fn cached_at(&self, key: &str) -> Option<DateTime<Utc>> {
        self.lookup(key).await.ok().flatten().map(|e| e.cached_at)
    }
}

fn decode(blob: &[u8]) -> Result<CachedTimeline, CacheError> {
    let probe: VersionProbe =
        serde_json::from_slice(blob).map_err(|e| CacheError::Corruption(e.to_string()))?;
    if probe.version != CACHE_SCHEMA_VERSION {
        return Err(CacheError::StaleFormat {
            found: probe.version,
            expected: CACHE_SCHEMA_VERSION,
        });
    }
    serde_json::from_slice(blob).map_err(|e| CacheError::Corruption(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::store::MemoryCacheStore;
    use crate::timeline::types::Entry;
    use chrono::NaiveDate;

    fn cache_with_store() -> (ResultCache, MemoryCacheStore) {
        let store = MemoryCacheStore::new();
        let cache = ResultCache::new(Arc::new(store.clone()), &CacheConfig::default());
        (cache, store)
    }

    fn sample() -> (User, Vec<Haiku>) {
        let user = User {
            id: Some(7),
            name: Some("Matsuo Basho".into()),
            screen_name: "basho".into(),
        };
        let haiku = Haiku {
            lines: ["An old silent pond".into(), "A frog jumps into the pond".into(), "Splash! Silence again.".into()],
            entry: Entry {
                id: Some(1),
                text: "An old silent pond A frog jumps into the pond Splash! Silence again.".into(),
                user: user.clone(),
                timestamp: Some(1_577_836_800),
            },
            date: NaiveDate::from_ymd_opt(2020, 1, 1),
        };
        (user, vec![haiku])
    }

    #[tokio::test]
    async fn test_round_trip() {
        let (cache, store) = cache_with_store();
        let (user, haikus) = sample();

        assert!(cache.get("basho").await.is_none());
        cache.put("basho", &user, &haikus).await.unwrap();

        let (cached_user, cached_haikus) = cache.get("basho").await.unwrap();
        assert_eq!(cached_user, user);
        assert_eq!(cached_haikus, haikus);

        // Stored under the namespaced key
        assert!(store.get("twitter_basho").await.is_some());
        assert!(cache.cached_at("basho").await.is_some());
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_miss() {
        let (cache, store) = cache_with_store();
        store.set("twitter_basho", b"\x00not json".to_vec(), Duration::from_secs(60)).await;

        assert!(matches!(cache.lookup("basho").await, Err(CacheError::Corruption(_))));
        assert!(cache.get("basho").await.is_none());
        assert!(cache.cached_at("basho").await.is_none());
    }

    #[tokio::test]
    async fn test_stale_version_is_miss() {
        let (cache, store) = cache_with_store();
        let (user, _) = sample();
        let old = serde_json::json!({
            "version": 0,
            "cached_at": "2020-01-01T00:00:00Z",
            "user": user,
            "haikus": [],
        });
        store.set("twitter_basho", serde_json::to_vec(&old).unwrap(), Duration::from_secs(60)).await;

        match cache.lookup("basho").await {
            Err(CacheError::StaleFormat { found, expected }) => {
                assert_eq!(found, 0);
                assert_eq!(expected, CACHE_SCHEMA_VERSION);
            }
            other => panic!("expected stale format, got {:?}", other),
        }
        assert!(cache.get("basho").await.is_none());
    }

    #[tokio::test]
    async fn test_invalidate() {
        let (cache, _) = cache_with_store();
        let (user, haikus) = sample();
        cache.put("basho", &user, &haikus).await.unwrap();

        assert!(cache.invalidate("basho").await);
        assert!(cache.get("basho").await.is_none());
        assert!(!cache.invalidate("basho").await);
    }

    #[tokio::test]
    async fn test_put_with_extreme_ttl() {
        let config = CacheConfig {
            ttl_secs: u64::MAX,
            ..CacheConfig::default()
        };
        let cache = ResultCache::new(Arc::new(MemoryCacheStore::new()), &config);
        let (user, haikus) = sample();

        let task = tokio::spawn(async move {
            cache.put("basho", &user, &haikus).await.unwrap();
            cache.get("basho").await
        });
        let cached = task.await.unwrap();
        assert!(cached.is_some());
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let (cache, _) = cache_with_store();
        let (user, haikus) = sample();
        cache.put("basho", &user, &haikus).await.unwrap();
        cache.put("basho", &user, &[]).await.unwrap();

        let (_, cached) = cache.get("basho").await.unwrap();
        assert!(cached.is_empty());
    }
}
