//! Process settings of the broker binary.
//!
//! These are fixed at startup and come from command-line flags or the
//! environment; the broker definition itself lives in the file read through
//! [`crate::config::ConfigStore`].

use std::path::PathBuf;

use clap::Args;

/// Runtime settings for the HTTP server.
#[derive(Debug, Clone, Args)]
pub struct BrokerSettings {
    /// Address to listen on.
    #[arg(long = "bind", env = "BROKER_BIND", default_value = "0.0.0.0:5000")]
    pub bind_address: String,

    /// Path of the broker definition file (YAML).
    #[arg(long = "config", env = "BROKER_CONFIG", default_value = "./config.yaml")]
    pub config_path: PathBuf,

    /// Directory served under `/static/` and `/`.
    #[arg(long = "static-dir", env = "BROKER_STATIC_DIR", default_value = "./static")]
    pub static_dir: PathBuf,

    /// Serve static files without basic auth.
    #[arg(long, env = "BROKER_PUBLIC_STATIC")]
    pub public_static: bool,

    /// Request timeout in seconds.
    #[arg(long = "request-timeout", env = "BROKER_REQUEST_TIMEOUT", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Expose Prometheus metrics on this address.
    #[arg(long, env = "BROKER_METRICS_ADDRESS")]
    pub metrics_address: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(long, env = "BROKER_LOG_JSON")]
    pub log_json: bool,
}

impl Default for BrokerSettings {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
            config_path: PathBuf::from("./config.yaml"),
            static_dir: PathBuf::from("./static"),
            public_static: false,
            request_timeout_secs: 30,
            metrics_address: None,
            log_json: false,
        }
    }
}

/// Build information reported by `/version/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: String,
    pub commit: String,
}

impl BuildInfo {
    /// Build information of the running binary.
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            commit: option_env!("BROKER_BUILD_COMMIT").unwrap_or("n/a").to_string(),
        }
    }
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: "n/a".to_string(),
            commit: "n/a".to_string(),
        }
    }
}
