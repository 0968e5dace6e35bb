//! Cloud Foundry Service Broker
//!
//! Publishes configured Cloud Foundry installations as plans of a single
//! service through the Open Service Broker API v2.
//!
//! # Architecture Overview
//!
//! ```text
//!   Platform request
//!   ────────────────▶ request id → log → auth → version → identity → freshness
//!                                                                    │
//!                                                                    ▼
//!                                               handlers (catalog, provision)
//!                                                                    │
//!                                                                    ▼
//!   config.yaml ◀──── ConfigStore (mtime fingerprint, single lock) ◀─┘
//!                           │
//!                           ▼
//!                     catalog builder
//! ```

use clap::Parser;

use service_broker::config::{BrokerSettings, BuildInfo};
use service_broker::lifecycle::{signals, startup, Shutdown};
use service_broker::observability::logging;

#[derive(Parser)]
#[command(name = "service-broker")]
#[command(version, about = "Open Service Broker API for Cloud Foundry targets", long_about = None)]
struct Cli {
    #[command(flatten)]
    settings: BrokerSettings,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.settings.log_json);

    let build_info = BuildInfo::current();
    tracing::info!(
        version = %build_info.version,
        commit = %build_info.commit,
        "service-broker starting"
    );

    let (server, listener) = startup::prepare(cli.settings, build_info).await?;

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
