//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files and every
//! section has defaults, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};

/// Root configuration for the haiku timeline service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address, request timeout).
    pub listener: ListenerConfig,

    /// Remote timeline service settings.
    pub remote: RemoteConfig,

    /// Result cache settings.
    pub cache: CacheConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Admin API settings.
    pub admin: AdminConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Total time allowed per incoming request in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Remote timeline service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Base URL of the remote API.
    pub base_url: String,

    /// Path of the user timeline endpoint.
    pub timeline_path: String,

    /// Path of the rate limit status endpoint.
    pub rate_limit_path: String,

    /// Per-call timeout in seconds.
    pub timeout_secs: u64,

    /// Number of posts requested per fetch (at most 300).
    pub fetch_count: u32,

    /// User-Agent sent to the remote service.
    pub user_agent: String,

    /// Honour proxy settings from the environment.
    pub system_proxy: bool,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.twitter.com/1".to_string(),
            timeline_path: "/statuses/user_timeline.json".to_string(),
            rate_limit_path: "/account/rate_limit_status.json".to_string(),
            timeout_secs: 10,
            fetch_count: 200,
            user_agent: concat!("haiku-timeline/", env!("CARGO_PKG_VERSION")).to_string(),
            system_proxy: true,
        }
    }
}

/// Result cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Entry lifetime in seconds.
    pub ttl_secs: u64,

    /// Namespace prepended to every key.
    pub key_prefix: String,

    /// Interval between sweeps of expired entries in seconds (0 disables).
    pub purge_interval_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 3600,
            key_prefix: "twitter_".to_string(),
            purge_interval_secs: 300,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Enable admin routes.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            // WARNING: This is a placeholder! Change this in production.
            api_key: "CHANGE_ME_IN_PRODUCTION".to_string(),
        }
    }
}
