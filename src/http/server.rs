//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the broker routes
//! - Wire up the protocol pipeline on `/v2/`
//! - Serve health, version and static assets
//! - Wire up transport middleware (request id, timeout)
//! - Bind the server to a listener with graceful shutdown

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{any, get, put},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, timeout::TimeoutLayer};

use crate::config::{BrokerSettings, BuildInfo, ConfigSnapshot, ConfigStore, Configuration};
use crate::http::error::ApiError;
use crate::http::handlers::{catalog, provision, system};
use crate::http::middleware::{auth, freshness, identity, logging, version};
use crate::http::request_id;
use crate::lifecycle::ShutdownListener;

/// Application state injected into handlers and pipeline stages.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ConfigStore>,
    pub config_path: Arc<PathBuf>,
    pub build_info: Arc<BuildInfo>,
}

impl AppState {
    pub fn new(store: Arc<ConfigStore>, config_path: PathBuf, build_info: BuildInfo) -> Self {
        Self {
            store,
            config_path: Arc::new(config_path),
            build_info: Arc::new(build_info),
        }
    }

    /// Read the broker definition through the store.
    ///
    /// The store does blocking file IO under its lock, so it runs on the
    /// blocking pool. A reload started here completes even if the request is
    /// abandoned.
    pub async fn snapshot(&self) -> Result<ConfigSnapshot, ApiError> {
        let store = self.store.clone();
        let path = self.config_path.clone();

        let snapshot = tokio::task::spawn_blocking(move || store.snapshot(&path))
            .await
            .map_err(|e| ApiError::Internal(format!("config task failed: {}", e)))??;
        Ok(snapshot)
    }

    /// Independent copy of the current broker definition.
    pub async fn config(&self) -> Result<Configuration, ApiError> {
        self.snapshot().await.map(|snapshot| snapshot.config)
    }
}

/// HTTP server for the service broker.
pub struct BrokerServer {
    router: Router,
    settings: BrokerSettings,
}

impl BrokerServer {
    /// Create a server with a fresh, empty config store.
    pub fn new(settings: BrokerSettings, build_info: BuildInfo) -> Self {
        Self::with_store(settings, build_info, Arc::new(ConfigStore::new()))
    }

    /// Create a server sharing an existing (possibly warmed) store.
    pub fn with_store(settings: BrokerSettings, build_info: BuildInfo, store: Arc<ConfigStore>) -> Self {
        let state = AppState::new(store, settings.config_path.clone(), build_info);
        let router = Self::build_router(&settings, state);
        Self { router, settings }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(settings: &BrokerSettings, state: AppState) -> Router {
        // Layers run bottom-up: the last one added sees the request first.
        let v2 = Router::new()
            .route("/catalog/", get(catalog::get_catalog))
            .route("/service_instances/{instance_id}/", put(provision::provision_instance))
            .route("/catalog", any(system::redirect_with_slash))
            .route("/service_instances/{instance_id}", any(system::redirect_with_slash))
            .layer(from_fn_with_state(state.clone(), freshness::freshness_headers))
            .layer(from_fn(identity::log_request_identity))
            .layer(from_fn(identity::log_originating_identity))
            .layer(from_fn(version::require_api_version))
            .layer(from_fn_with_state(state.clone(), auth::require_basic_auth));

        let static_files = Router::new()
            .nest_service("/static", ServeDir::new(&settings.static_dir))
            .fallback_service(ServeDir::new(&settings.static_dir));
        let static_files = if settings.public_static {
            static_files
        } else {
            static_files.layer(from_fn_with_state(state.clone(), auth::require_basic_auth))
        };

        Router::new()
            .route("/health/", get(system::get_health))
            .route("/version/", get(system::get_version))
            .route("/health", any(system::redirect_with_slash))
            .route("/version", any(system::redirect_with_slash))
            .nest("/v2", v2)
            .merge(static_files)
            .with_state(state)
            .layer(from_fn(logging::log_requests))
            .layer(request_id::propagate_request_id_layer())
            .layer(request_id::set_request_id_layer())
            .layer(TimeoutLayer::new(Duration::from_secs(settings.request_timeout_secs)))
    }

    /// The router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the settings.
    pub fn settings(&self) -> &BrokerSettings {
        &self.settings
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, shutdown: ShutdownListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            config_path = %self.settings.config_path.display(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.recv())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
