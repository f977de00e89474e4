//! Haiku timeline service library.
//!
//! Fetches a user's recent public posts, finds the haikus hiding in them and
//! caches the annotated result.

pub mod admin;
pub mod cache;
pub mod config;
pub mod haiku;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod pipeline;
pub mod timeline;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use pipeline::{Orchestrator, PipelineResult};
