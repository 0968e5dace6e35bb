//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::Value;
use service_broker::config::{BrokerSettings, BuildInfo};
use service_broker::BrokerServer;
use tempfile::TempDir;
use tower::ServiceExt;

pub const USERNAME: &str = "username";
pub const PASSWORD: &str = "password";

pub const DEFINITION: &str = r#"
server:
  basicauth:
    username: username
    password: password
cloudfoundries:
  prod:
    apiURL: https://api.prod.example.com
    uaaURL: https://uaa.prod.example.com
    username: admin
    password: prod-secret
    labels: [prod, eu]
  dev:
    apiURL: https://api.dev.example.com
    uaaURL: https://uaa.dev.example.com
    username: admin
    password: dev-secret
"#;

/// A broker backed by a temporary definition file and static dir.
pub struct TestBroker {
    pub dir: TempDir,
    pub config_path: PathBuf,
    pub server: BrokerServer,
}

impl TestBroker {
    pub fn new() -> Self {
        Self::with_settings(|_| {})
    }

    pub fn with_settings(tweak: impl FnOnce(&mut BrokerSettings)) -> Self {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yaml");
        fs::write(&config_path, DEFINITION).unwrap();

        let static_dir = dir.path().join("static");
        fs::create_dir(&static_dir).unwrap();
        fs::write(static_dir.join("index.html"), "<html>broker home</html>").unwrap();
        fs::write(static_dir.join("app.css"), "body {}").unwrap();

        let mut settings = BrokerSettings {
            config_path: config_path.clone(),
            static_dir,
            bind_address: "127.0.0.1:0".into(),
            ..Default::default()
        };
        tweak(&mut settings);

        let build_info = BuildInfo {
            version: "1.2.3".into(),
            commit: "abc123".into(),
        };

        Self {
            dir,
            config_path,
            server: BrokerServer::new(settings, build_info),
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.server.router().oneshot(request).await.unwrap()
    }
}

pub fn basic_auth(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", username, password)))
}

/// Request carrying valid credentials and a compatible API version.
pub fn broker_request(method: Method, uri: &str) -> axum::http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, basic_auth(USERNAME, PASSWORD))
        .header("X-Broker-API-Version", "2.2")
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
