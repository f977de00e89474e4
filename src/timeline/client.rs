//! Remote timeline client with bounded timeouts.
//!
//! # Responsibilities
//! - Query the rate-limit status endpoint (fails closed)
//! - Fetch the raw timeline bytes for a screen name
//! - Map transport, timeout and status failures to `TimelineError`

use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::config::RemoteConfig;
use crate::observability::metrics;
use crate::timeline::types::{TimelineError, TimelineResult};

/// Upper bound the remote service accepts for `count`.
pub const MAX_FETCH_COUNT: u32 = 300;

/// Source of raw timeline data.
#[async_trait]
pub trait TimelineSource: Send + Sync {
    /// Remaining request budget. Any failure reports `0`.
    async fn rate_limit_remaining(&self) -> i64;

    /// Raw bytes of the `count` most recent posts for `screen_name`.
    ///
    /// An empty body is returned as-is, it is not an error.
    async fn fetch_timeline(&self, screen_name: &str, count: u32) -> TimelineResult<Bytes>;
}

#[derive(Debug, Deserialize)]
struct RateLimitStatus {
    #[serde(default)]
    remaining_hits: i64,
}

/// `reqwest`-backed timeline client.
#[derive(Clone)]
pub struct HttpTimelineClient {
    client: Client,
    timeline_url: Url,
    rate_limit_url: Url,
    timeout_secs: u64,
}

impl HttpTimelineClient {
    /// Build a client for the configured remote endpoints.
    pub fn new(config: &RemoteConfig) -> TimelineResult<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str());
        if !config.system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| TimelineError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            timeline_url: endpoint(&config.base_url, &config.timeline_path)?,
            rate_limit_url: endpoint(&config.base_url, &config.rate_limit_path)?,
            timeout_secs: config.timeout_secs,
        })
    }

    fn map_error(&self, e: reqwest::Error) -> TimelineError {
        if e.is_timeout() {
            TimelineError::Timeout(self.timeout_secs)
        } else {
            TimelineError::Transport(e.to_string())
        }
    }

    async fn query_rate_limit(&self) -> TimelineResult<i64> {
        let response = self
            .client
            .get(self.rate_limit_url.clone())
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TimelineError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| self.map_error(e))?;
        let parsed: RateLimitStatus = serde_json::from_slice(&body)
            .map_err(|e| TimelineError::Transport(format!("invalid rate limit payload: {}", e)))?;
        Ok(parsed.remaining_hits)
    }

    async fn request_timeline(&self, screen_name: &str, count: u32) -> TimelineResult<Bytes> {
        let response = self
            .client
            .get(self.timeline_url.clone())
            .query(&[("screen_name", screen_name)])
            .query(&[("count", count)])
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TimelineError::Status(status.as_u16()));
        }

        response.bytes().await.map_err(|e| self.map_error(e))
    }
}

#[async_trait]
impl TimelineSource for HttpTimelineClient {
    async fn rate_limit_remaining(&self) -> i64 {
        let start = Instant::now();
        match self.query_rate_limit().await {
            Ok(remaining) => {
                metrics::record_remote_request("rate_limit", "ok", start);
                tracing::debug!(remaining_hits = remaining, "Rate limit status");
                remaining
            }
            Err(e) => {
                metrics::record_remote_request("rate_limit", "error", start);
                tracing::warn!(error = %e, "Rate limit query failed, assuming no budget");
                0
            }
        }
    }

    async fn fetch_timeline(&self, screen_name: &str, count: u32) -> TimelineResult<Bytes> {
        let start = Instant::now();
        let count = count.clamp(1, MAX_FETCH_COUNT);

        let result = self.request_timeline(screen_name, count).await;

        let outcome = if result.is_ok() { "ok" } else { "error" };
        metrics::record_remote_request("timeline", outcome, start);
        result
    }
}

fn endpoint(base_url: &str, path: &str) -> TimelineResult<Url> {
    let raw = format!("{}{}", base_url.trim_end_matches('/'), path);
    Url::parse(&raw).map_err(|e| TimelineError::InvalidEndpoint(format!("{}: {}", raw, e)))
}
