//! Result caching subsystem.
//!
//! # Data Flow
//! ```text
//! ResultCache (result.rs): versioned (User, [Haiku]) envelope, namespaced keys
//!     → CacheStore (store.rs): opaque bytes with TTL
//!     → MemoryCacheStore: DashMap, expiry checked on read
//! ```

pub mod result;
pub mod store;

pub use result::{CacheError, CachedTimeline, ResultCache, CACHE_SCHEMA_VERSION};
pub use store::{CacheStore, MemoryCacheStore};
