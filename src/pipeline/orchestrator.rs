//! Retrieval-cache-annotate pipeline.
//!
//! # State Machine
//! ```text
//! CheckCache ──hit──────────────────────────────────────────────▶ Render (ok)
//!     │ miss / corrupt
//!     ▼
//! CheckRateLimit ──0──┐
//!     │ >0            │
//!     ▼               │
//! Fetch ──error───────┤
//!     ▼               │
//! Parse ──error───────┤
//!     ▼               │
//! Annotate ──error────┤
//!     ▼               ▼
//! DeriveUser       Degrade (synthesized user, no haikus, never cached)
//!     ▼               │
//! StoreAndRender      ▼
//!     └────────────▶ Render
//! ```
//!
//! Every stage returns a `Result`; `handle` is the only place a
//! `PipelineError` is turned into a degraded response. No retries.

use std::sync::Arc;

use crate::cache::result::{CachedTimeline, ResultCache};
use crate::haiku::{annotate, Haiku, HaikuDetector};
use crate::observability::metrics;
use crate::pipeline::types::{PipelineError, PipelineResult};
use crate::timeline::{parse_timeline, Entry, TimelineSource, User};

/// Number of posts requested per fetch.
pub const DEFAULT_FETCH_COUNT: u32 = 200;

/// Entry point consumed by the view layer.
#[derive(Clone)]
pub struct Orchestrator {
    source: Arc<dyn TimelineSource>,
    detector: Arc<dyn HaikuDetector>,
    cache: ResultCache,
    fetch_count: u32,
}

impl Orchestrator {
    pub fn new(
        source: Arc<dyn TimelineSource>,
        detector: Arc<dyn HaikuDetector>,
        cache: ResultCache,
    ) -> Self {
        Self {
            source,
            detector,
            cache,
            fetch_count: DEFAULT_FETCH_COUNT,
        }
    }

    /// Override the number of posts requested per fetch.
    pub fn with_fetch_count(mut self, fetch_count: u32) -> Self {
        self.fetch_count = fetch_count;
        self
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Produce the annotated view for `screen_name`. Never fails.
    pub async fn handle(&self, screen_name: &str) -> PipelineResult {
        if let Some(cached) = self.check_cache(screen_name).await {
            metrics::record_pipeline_result("cache_hit");
            return PipelineResult::ok(cached.user, cached.haikus);
        }

        match self.run_fresh(screen_name).await {
            Ok((user, haikus)) => {
                if let Err(e) = self.cache.put(screen_name, &user, &haikus).await {
                    tracing::error!(screen_name = %screen_name, error = %e, "Failed to cache result");
                }
                metrics::record_pipeline_result("ok");
                PipelineResult::ok(user, haikus)
            }
            Err(e) => {
                tracing::warn!(
                    screen_name = %screen_name,
                    kind = e.kind(),
                    error = %e,
                    "Failed to get timeline"
                );
                metrics::record_pipeline_result("degraded");
                PipelineResult::degraded(screen_name)
            }
        }
    }

    async fn check_cache(&self, screen_name: &str) -> Option<CachedTimeline> {
        match self.cache.lookup(screen_name).await {
            Ok(Some(cached)) => {
                metrics::record_cache_lookup("hit");
                tracing::debug!(screen_name = %screen_name, cached_at = %cached.cached_at, "Cache hit");
                Some(cached)
            }
            Ok(None) => {
                metrics::record_cache_lookup("miss");
                None
            }
            Err(e) => {
                let e = PipelineError::from(e);
                metrics::record_cache_lookup("corrupt");
                tracing::warn!(screen_name = %screen_name, kind = e.kind(), error = %e, "Treating cache entry as miss");
                None
            }
        }
    }

    async fn run_fresh(&self, screen_name: &str) -> Result<(User, Vec<Haiku>), PipelineError> {
        let remaining = self.source.rate_limit_remaining().await;
        if remaining <= 0 {
            return Err(PipelineError::RateLimited { remaining });
        }

        let raw = self.source.fetch_timeline(screen_name, self.fetch_count).await?;
        let entries = parse_timeline(&raw)?;
        let haikus = annotate(self.detector.as_ref(), &entries)?;

        if entries.is_empty() {
            tracing::info!(screen_name = %screen_name, "Empty public timeline");
        } else {
            tracing::debug!(screen_name = %screen_name, entries = entries.len(), "Fetched timeline");
        }
        if haikus.is_empty() {
            tracing::info!(screen_name = %screen_name, "No haikus");
        }

        Ok((derive_user(screen_name, &entries), haikus))
    }
}

/// Author of the first entry, or a user synthesized from the screen name.
pub fn derive_user(screen_name: &str, entries: &[Entry]) -> User {
    entries
        .first()
        .map(|e| e.user.clone())
        .unwrap_or_else(|| User::from_screen_name(screen_name))
}
