//! Pipeline orchestration.

pub mod orchestrator;
pub mod types;

pub use orchestrator::{derive_user, Orchestrator, DEFAULT_FETCH_COUNT};
pub use types::{PipelineError, PipelineResult};
