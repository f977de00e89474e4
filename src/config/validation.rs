//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, fetch count within the remote bound)
//! - Check addresses and URLs parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::timeline::MAX_FETCH_COUNT;

/// Longest accepted cache entry lifetime (one year).
pub const MAX_CACHE_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// Longest accepted interval between expired-entry sweeps (one day).
pub const MAX_PURGE_INTERVAL_SECS: u64 = 24 * 60 * 60;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check every semantic constraint, collecting all failures.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }
    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::new("listener.request_timeout_secs", "must be > 0"));
    }

    if let Err(e) = url::Url::parse(&config.remote.base_url) {
        errors.push(ValidationError::new(
            "remote.base_url",
            format!("'{}' is not a URL: {}", config.remote.base_url, e),
        ));
    }
    for (field, path) in [
        ("remote.timeline_path", &config.remote.timeline_path),
        ("remote.rate_limit_path", &config.remote.rate_limit_path),
    ] {
        if !path.starts_with('/') {
            errors.push(ValidationError::new(field, "must start with '/'"));
        }
    }
    if config.remote.timeout_secs == 0 {
        errors.push(ValidationError::new("remote.timeout_secs", "must be > 0"));
    }
    if config.remote.fetch_count == 0 || config.remote.fetch_count > MAX_FETCH_COUNT {
        errors.push(ValidationError::new(
            "remote.fetch_count",
            format!("must be between 1 and {}", MAX_FETCH_COUNT),
        ));
    }

    if config.cache.ttl_secs == 0 || config.cache.ttl_secs > MAX_CACHE_TTL_SECS {
        errors.push(ValidationError::new(
            "cache.ttl_secs",
            format!("must be between 1 and {}", MAX_CACHE_TTL_SECS),
        ));
    }
    if config.cache.purge_interval_secs > MAX_PURGE_INTERVAL_SECS {
        errors.push(ValidationError::new(
            "cache.purge_interval_secs",
            format!("must be at most {} (0 disables sweeping)", MAX_PURGE_INTERVAL_SECS),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if config.admin.enabled && config.admin.api_key.trim().is_empty() {
        errors.push(ValidationError::new("admin.api_key", "must not be empty when admin is enabled"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = AppConfig::default();
        config.remote.fetch_count = 301;
        config.remote.timeout_secs = 0;
        config.remote.base_url = "not a url".into();
        config.cache.ttl_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["remote.base_url", "remote.timeout_secs", "remote.fetch_count", "cache.ttl_secs"]
        );
    }

    #[test]
    fn test_fetch_count_bounds() {
        let mut config = AppConfig::default();
        config.remote.fetch_count = 300;
        assert!(validate_config(&config).is_ok());
        config.remote.fetch_count = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_cache_bounds() {
        let mut config = AppConfig::default();
        config.cache.ttl_secs = MAX_CACHE_TTL_SECS;
        config.cache.purge_interval_secs = 0;
        assert!(validate_config(&config).is_ok());

        config.cache.ttl_secs = u64::MAX;
        config.cache.purge_interval_secs = u64::MAX;
        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["cache.ttl_secs", "cache.purge_interval_secs"]);
    }

    #[test]
    fn test_admin_requires_key() {
        let mut config = AppConfig::default();
        config.admin.enabled = true;
        config.admin.api_key = " ".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "admin.api_key");
        assert_eq!(errors[0].to_string(), "admin.api_key: must not be empty when admin is enabled");
    }
}
