//! Haiku detection and annotation.

pub mod annotator;
pub mod detector;
pub mod types;

pub use annotator::annotate;
pub use detector::{HaikuDetector, SyllableHaikuFinder};
pub use types::{DetectorError, Haiku};
