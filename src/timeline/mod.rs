//! Remote timeline retrieval subsystem.
//!
//! # Data Flow
//! ```text
//! rate limit endpoint ──▶ client.rs (remaining budget, fails closed)
//! timeline endpoint   ──▶ client.rs (raw bytes, bounded timeout)
//!                          → parser.rs (JSON → User / Entry)
//!                          → types.rs (domain entities)
//! ```

pub mod client;
pub mod parser;
pub mod types;

pub use client::{HttpTimelineClient, TimelineSource, MAX_FETCH_COUNT};
pub use parser::parse_timeline;
pub use types::{Entry, ParseError, TimelineError, User};
