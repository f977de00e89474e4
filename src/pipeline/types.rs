//! Pipeline view model and failure taxonomy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cache::result::CacheError;
use crate::haiku::types::{DetectorError, Haiku};
use crate::timeline::types::{ParseError, TimelineError, User};

/// What the view layer renders for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub user: User,
    pub haikus: Vec<Haiku>,
    /// Degraded response: treat as "no meaningful timeline".
    pub error: bool,
}

impl PipelineResult {
    /// Successful result.
    pub fn ok(user: User, haikus: Vec<Haiku>) -> Self {
        Self {
            user,
            haikus,
            error: false,
        }
    }

    /// Degraded result for `screen_name`: synthesized user, no haikus.
    pub fn degraded(screen_name: &str) -> Self {
        Self {
            user: User::from_screen_name(screen_name),
            haikus: Vec::new(),
            error: true,
        }
    }
}

/// Every way a pipeline run can fail. None of these escape `Orchestrator::handle`.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Network failure, timeout or non-success status.
    #[error(transparent)]
    Transport(#[from] TimelineError),

    /// Malformed timeline payload.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Unreadable cached blob.
    #[error(transparent)]
    CacheCorruption(#[from] CacheError),

    /// No remaining request budget.
    #[error("rate limited: {remaining} requests remaining")]
    RateLimited { remaining: i64 },

    /// Haiku detector failed.
    #[error(transparent)]
    Detector(#[from] DetectorError),
}

impl PipelineError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Transport(_) => "transport",
            PipelineError::Parse(_) => "parse",
            PipelineError::CacheCorruption(_) => "cache_corruption",
            PipelineError::RateLimited { .. } => "rate_limited",
            PipelineError::Detector(_) => "detector",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degraded_result() {
        let result = PipelineResult::degraded("basho");
        assert!(result.error);
        assert!(result.haikus.is_empty());
        assert_eq!(result.user, User::from_screen_name("basho"));
    }

    #[test]
    fn test_error_kinds() {
        let err = PipelineError::from(TimelineError::Status(500));
        assert_eq!(err.kind(), "transport");
        assert_eq!(err.to_string(), "remote returned status 500");

        let err = PipelineError::RateLimited { remaining: 0 };
        assert_eq!(err.kind(), "rate_limited");

        let err = PipelineError::from(ParseError("eof".into()));
        assert_eq!(err.kind(), "parse");
    }
}
