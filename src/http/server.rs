//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the pipeline from configuration
//! - Create Axum Router with view and admin handlers
//! - Wire up middleware (tracing, request timeout, request ID)
//! - Run the cache sweeper alongside the server
//! - Serve until shutdown is signalled

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::admin::setup_admin_router;
use crate::cache::{MemoryCacheStore, ResultCache};
use crate::config::{AdminConfig, AppConfig};
use crate::haiku::SyllableHaikuFinder;
use crate::http::handlers::{about, home, user_page};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::lifecycle::shutdown;
use crate::pipeline::Orchestrator;
use crate::timeline::{HttpTimelineClient, TimelineError};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Orchestrator,
    pub store: MemoryCacheStore,
    pub admin: AdminConfig,
    pub started_at: Instant,
}

/// HTTP front end for the haiku pipeline.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
    store: MemoryCacheStore,
}

impl HttpServer {
    /// Create a server backed by the remote timeline service.
    pub fn new(config: AppConfig) -> Result<Self, TimelineError> {
        let store = MemoryCacheStore::new();
        let source = Arc::new(HttpTimelineClient::new(&config.remote)?);
        let cache = ResultCache::new(Arc::new(store.clone()), &config.cache);
        let orchestrator = Orchestrator::new(source, Arc::new(SyllableHaikuFinder), cache)
            .with_fetch_count(config.remote.fetch_count);

        Ok(Self::with_orchestrator(config, orchestrator, store))
    }

    /// Create a server around an already assembled pipeline.
    ///
    /// `store` must be the store backing the orchestrator's cache; the server
    /// sweeps its expired entries.
    pub fn with_orchestrator(
        config: AppConfig,
        orchestrator: Orchestrator,
        store: MemoryCacheStore,
    ) -> Self {
        let state = AppState {
            orchestrator,
            store: store.clone(),
            admin: config.admin.clone(),
            started_at: Instant::now(),
        };
        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            store,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/", get(home))
            .route("/about", get(about))
            .route("/{screen_name}", get(user_page))
            .with_state(state.clone());

        if config.admin.enabled {
            router = router.merge(setup_admin_router(state));
        }

        router
            .layer(TimeoutLayer::new(Duration::from_secs(config.listener.request_timeout_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// The router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server on `listener` until `shutdown_rx` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let sweeper = spawn_sweeper(
            self.store.clone(),
            self.config.cache.purge_interval_secs,
            shutdown_rx.resubscribe(),
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await?;

        if let Some(handle) = sweeper {
            handle.abort();
        }
        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

/// Periodically drop expired cache entries. Disabled when `interval_secs` is 0.
fn spawn_sweeper(
    store: MemoryCacheStore,
    interval_secs: u64,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Option<tokio::task::JoinHandle<()>> {
    if interval_secs == 0 {
        return None;
    }

    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = store.purge_expired();
                    if removed > 0 {
                        tracing::debug!(removed, remaining = store.len(), "Purged expired cache entries");
                    }
                }
                _ = shutdown_rx.recv() => {
                    tracing::info!("Cache sweeper received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }))
}
