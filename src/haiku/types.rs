//! Haiku annotation types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::timeline::types::Entry;

/// A haiku found in a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Haiku {
    /// The three lines, in order.
    pub lines: [String; 3],
    /// The post the haiku was found in.
    pub entry: Entry,
    /// UTC calendar date of the post. `None` when the post date was unknown.
    pub date: Option<NaiveDate>,
}

/// Failure reported by a haiku detector.
#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("haiku detection failed: {0}")]
    Failed(String),
}
