//! View-layer handlers.
//!
//! Thin mapping from routes to the pipeline; all timeline logic lives in
//! `pipeline::Orchestrator`.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::http::request::request_id;
use crate::http::server::AppState;

#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    pub u: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HomePage {
    pub service: &'static str,
    pub usage: &'static str,
}

#[derive(Debug, Serialize)]
pub struct AboutPage {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
}

/// Screen names are word characters only.
pub fn is_valid_screen_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Home page. `?u=<name>` redirects to that user's page.
pub async fn home(Query(query): Query<HomeQuery>) -> impl IntoResponse {
    match query.u.as_deref().map(str::trim) {
        Some(user) if !user.is_empty() => {
            if !is_valid_screen_name(user) {
                return (StatusCode::BAD_REQUEST, "Invalid screen name").into_response();
            }
            Redirect::to(&format!("/{}", user)).into_response()
        }
        _ => Json(HomePage {
            service: "haiku-timeline",
            usage: "GET /{screen_name}",
        })
        .into_response(),
    }
}

pub async fn about() -> Json<AboutPage> {
    Json(AboutPage {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        description: "Finds haikus hiding in a user's recent public posts",
    })
}

/// Annotated timeline for one user. Degraded results are still a 200.
pub async fn user_page(
    State(state): State<AppState>,
    Path(screen_name): Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if !is_valid_screen_name(&screen_name) {
        return (StatusCode::NOT_FOUND, "No such page").into_response();
    }

    let result = state.orchestrator.handle(&screen_name).await;
    tracing::debug!(
        request_id = %request_id(&headers),
        screen_name = %screen_name,
        haikus = result.haikus.len(),
        degraded = result.error,
        "Rendered user page"
    );
    Json(result).into_response()
}
