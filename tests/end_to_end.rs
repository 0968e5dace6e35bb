//! End-to-end tests over a real TCP listener.

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;
use service_broker::lifecycle::Shutdown;

mod common;

use common::{TestBroker, PASSWORD, USERNAME};

#[tokio::test]
async fn test_catalog_over_tcp_and_graceful_shutdown() {
    let broker = TestBroker::new();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let TestBroker { dir, server, .. } = broker;

    let handle = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    let res = client
        .get(format!("http://{}/v2/catalog/", addr))
        .basic_auth(USERNAME, Some(PASSWORD))
        .header("X-Broker-API-Version", "2.14")
        .send()
        .await
        .expect("broker unreachable");

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("etag"));
    assert!(res.headers().contains_key("x-request-id"));

    let catalog: Value = res.json().await.unwrap();
    assert_eq!(catalog["services"][0]["plans"].as_array().unwrap().len(), 2);

    let res = client
        .get(format!("http://{}/health/", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    shutdown.trigger();
    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server did not stop")
        .unwrap();
    assert!(result.is_ok());

    drop(dir);
}

#[tokio::test]
async fn test_concurrent_requests_share_one_definition() {
    let broker = TestBroker::new();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let TestBroker { dir, server, .. } = broker;
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let requests = (0..16).map(|_| {
        let client = client.clone();
        async move {
            client
                .get(format!("http://{}/v2/catalog/", addr))
                .basic_auth(USERNAME, Some(PASSWORD))
                .header("X-Broker-API-Version", "2.2")
                .send()
                .await
                .unwrap()
        }
    });

    let mut etags = Vec::new();
    for handle in requests.map(tokio::spawn).collect::<Vec<_>>() {
        let res = handle.await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        etags.push(res.headers()["etag"].to_str().unwrap().to_string());
    }
    assert!(etags.windows(2).all(|pair| pair[0] == pair[1]));

    shutdown.trigger();
    drop(dir);
}
