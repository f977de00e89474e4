//! Timeline domain types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity anchor for a timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Remote numeric identifier.
    pub id: Option<i64>,
    /// Display name.
    pub name: Option<String>,
    /// Handle the timeline is looked up by.
    pub screen_name: String,
}

impl User {
    /// Synthesize a user from a bare screen name when no remote record exists.
    pub fn from_screen_name(screen_name: &str) -> Self {
        Self {
            id: None,
            name: Some(screen_name.to_string()),
            screen_name: screen_name.to_string(),
        }
    }
}

/// One remote post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Remote post identifier.
    pub id: Option<i64>,
    /// Post body.
    pub text: String,
    /// Author of the post.
    pub user: User,
    /// Creation time in seconds since the epoch, if the remote date parsed.
    pub timestamp: Option<i64>,
}

/// Errors raised while talking to the remote timeline service.
#[derive(Debug, Error)]
pub enum TimelineError {
    /// Connection or body read failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// The request did not complete within the configured bound.
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// The remote answered with a non-success status.
    #[error("remote returned status {0}")]
    Status(u16),

    /// The request URL could not be built.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Malformed structured payload.
#[derive(Debug, Error)]
#[error("invalid timeline payload: {0}")]
pub struct ParseError(pub String);

/// Result type for remote timeline operations.
pub type TimelineResult<T> = Result<T, TimelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_from_screen_name() {
        let user = User::from_screen_name("basho");
        assert_eq!(user.id, None);
        assert_eq!(user.name.as_deref(), Some("basho"));
        assert_eq!(user.screen_name, "basho");
    }

    #[test]
    fn test_error_display() {
        assert_eq!(TimelineError::Status(503).to_string(), "remote returned status 503");
        assert_eq!(
            TimelineError::Timeout(10).to_string(),
            "request timed out after 10 seconds"
        );
        assert!(ParseError("expected array".into()).to_string().contains("expected array"));
    }
}
