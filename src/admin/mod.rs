pub mod auth;
pub mod handlers;

use axum::{middleware, routing::get, Router};

use crate::admin::auth::admin_auth_middleware;
use crate::admin::handlers::{delete_cache_entry, get_cache_entry, get_status};
use crate::http::server::AppState;

pub fn setup_admin_router(state: AppState) -> Router {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/cache/{screen_name}", get(get_cache_entry).delete(delete_cache_entry))
        .layer(middleware::from_fn_with_state(state.clone(), admin_auth_middleware))
        .with_state(state)
}
