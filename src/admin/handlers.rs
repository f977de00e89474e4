use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::http::server::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct SystemStatus {
    pub version: String,
    pub status: String,
    pub uptime_secs: u64,
    pub cache_entries: usize,
    pub expired_entries: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CacheEntryStatus {
    pub screen_name: String,
    pub cached_at: DateTime<Utc>,
    pub ttl_secs: u64,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    let (cache_entries, expired_entries) = state.store.get_summary();
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "operational".to_string(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        cache_entries,
        expired_entries,
    })
}

pub async fn get_cache_entry(
    State(state): State<AppState>,
    Path(screen_name): Path<String>,
) -> impl IntoResponse {
    let cache = state.orchestrator.cache();
    match cache.cached_at(&screen_name).await {
        Some(cached_at) => Json(CacheEntryStatus {
            screen_name,
            cached_at,
            ttl_secs: cache.ttl().as_secs(),
        })
        .into_response(),
        None => (StatusCode::NOT_FOUND, "Not cached").into_response(),
    }
}

pub async fn delete_cache_entry(
    State(state): State<AppState>,
    Path(screen_name): Path<String>,
) -> StatusCode {
    if state.orchestrator.cache().invalidate(&screen_name).await {
        tracing::info!(screen_name = %screen_name, "Cache entry invalidated");
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
