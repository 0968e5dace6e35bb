//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate the broker definition once before serving
//! - Start the metrics exporter if configured
//! - Bind the listener last, so traffic only arrives when ready
//!
//! Any startup error is fatal.

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{BrokerSettings, BuildInfo, ConfigError, ConfigStore};
use crate::http::BrokerServer;
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("broker definition unusable: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid metrics address '{address}': {source}")]
    MetricsAddress {
        address: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Prepare a server and its bound listener.
pub async fn prepare(
    settings: BrokerSettings,
    build_info: BuildInfo,
) -> Result<(BrokerServer, TcpListener), StartupError> {
    let store = Arc::new(ConfigStore::new());
    let config = store.get(&settings.config_path)?;

    tracing::info!(
        config_path = %settings.config_path.display(),
        targets = ?config.target_names(),
        hash = store.last_modified_hash(),
        last_modified = ?store.last_modified(),
        static_dir = %settings.static_dir.display(),
        public_static = settings.public_static,
        request_timeout_secs = settings.request_timeout_secs,
        "Broker definition loaded"
    );

    if let Some(address) = &settings.metrics_address {
        let addr: SocketAddr = address.parse().map_err(|source| StartupError::MetricsAddress {
            address: address.clone(),
            source,
        })?;
        metrics::init_metrics(addr);
    }

    let listener = TcpListener::bind(&settings.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: settings.bind_address.clone(),
            source,
        })?;

    Ok((BrokerServer::with_store(settings, build_info, store), listener))
}
