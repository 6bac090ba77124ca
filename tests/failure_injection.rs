//! Failure injection tests: broken proxy binaries, unwritable site
//! directories, hung scripts and missing interpreters.

use std::time::{Duration, Instant};

use reqwest::StatusCode;
use serde_json::{json, Value};

mod common;

use common::start_api;

fn route_body() -> Value {
    json!({ "name": "alice", "domain": "alice.example.com", "gateway_port": 3005 })
}

#[tokio::test]
async fn test_reload_failure_keeps_written_file() {
    let api = start_api(|c| c.proxy.binary = "false".to_string()).await;

    let res = api.post("/caddy/add-route", route_body()).await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    let file = api.sites_dir().join("alice.caddy");
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Caddy config written but reload failed"));
    assert_eq!(body["file"], file.display().to_string());
    assert!(file.exists());
}

#[tokio::test]
async fn test_missing_proxy_binary() {
    let api = start_api(|c| c.proxy.binary = "/nonexistent/caddy".to_string()).await;

    let res = api.post("/caddy/add-route", route_body()).await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("failed to launch command"));
    assert!(body["file"].is_string());
}

#[tokio::test]
async fn test_write_failure_has_no_file() {
    let api = start_api(|_| {}).await;
    // A regular file where the sites directory should be.
    std::fs::write(api.sites_dir(), "not a directory").unwrap();

    let res = api.post("/caddy/add-route", route_body()).await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to write Caddy config"));
    assert!(body.get("file").is_none());
}

#[tokio::test]
async fn test_hung_script_times_out() {
    let api = start_api(|c| c.lifecycle.default_timeout_ms = 300).await;

    let started = Instant::now();
    let res = api.post("/pa/stop", json!({ "name": "slow" })).await;

    assert!(started.elapsed() < Duration::from_secs(4));
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "command timed out after 300ms");
}

#[tokio::test]
async fn test_create_uses_extended_timeout() {
    let api = start_api(|c| {
        c.lifecycle.default_timeout_ms = 100;
        c.lifecycle.create_timeout_ms = 400;
    })
    .await;

    let res = api.post("/pa/create", json!({ "name": "slow" })).await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "command timed out after 400ms");
}

#[tokio::test]
async fn test_missing_interpreter() {
    let api = start_api(|c| c.lifecycle.interpreter = "/nonexistent/bash".to_string()).await;

    let res = api.get("/pa/list").await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("failed to launch command"));
}

#[tokio::test]
async fn test_service_survives_failures() {
    let api = start_api(|c| c.lifecycle.default_timeout_ms = 300).await;

    let res = api.post("/pa/start", json!({ "name": "broken" })).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let res = api.post("/pa/start", json!({ "name": "slow" })).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let res = api.post("/pa/start", json!({ "name": "alice" })).await;
    assert_eq!(res.status(), StatusCode::OK);
    let res = api.client.get(api.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}
