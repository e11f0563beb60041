//! End-to-end capture tests over a real socket.

use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use rq_gateway::config::GatewayConfig;
use rq_gateway::records::RecordStore;
use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn test_get_capture() {
    let (gateway, records, _) = common::spawn_in_memory(GatewayConfig::default()).await;
    let client = reqwest::Client::new();

    let response = client
        .get(gateway.capture_url("url=http://x&likes=a&likes=b"))
        .header("X-Trace", "t1")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let rq_id = common::rq_id(&response);
    let body: Value = response.json().await.unwrap();

    assert_eq!(body["id"], rq_id.as_str());
    assert_eq!(body["record"]["method"], "GET");
    assert_eq!(body["record"]["status"], "PENDING");
    assert_eq!(body["record"]["payload"], json!({ "likes": ["a", "b"] }));
    assert_eq!(body["record"]["headers"]["x-trace"], json!(["t1"]));
    assert!(body["record"]["headers"].get("user-agent").is_none());

    let stored = records.get(&rq_id).await.unwrap();
    assert_eq!(stored.url, "http://x");

    gateway.stop().await;
}

#[tokio::test]
async fn test_get_without_url() {
    let (gateway, records, _) = common::spawn_in_memory(GatewayConfig::default()).await;

    let response = reqwest::get(gateway.capture_url("likes=a")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(!common::rq_id(&response).is_empty());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "no url supplied" }));
    assert!(records.is_empty());

    gateway.stop().await;
}

#[tokio::test]
async fn test_urlencoded_capture() {
    let (gateway, records, _) = common::spawn_in_memory(GatewayConfig::default()).await;

    let response = reqwest::Client::new()
        .post(gateway.capture_url(""))
        .form(&[("url", "http://x"), ("mode", "test")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let rq_id = common::rq_id(&response);
    let stored = records.get(&rq_id).await.unwrap();
    assert_eq!(stored.url, "http://x");
    assert_eq!(stored.payload, r#"{"mode":["test"]}"#);
    assert_eq!(stored.content_type, "application/x-www-form-urlencoded");

    gateway.stop().await;
}

#[tokio::test]
async fn test_multipart_capture() {
    let (gateway, records, files) = common::spawn_in_memory(GatewayConfig::default()).await;

    let form = Form::new()
        .text("caption", "holiday")
        .part("file", Part::bytes(b"jpeg bytes".to_vec()).file_name("image.JPG"));

    let response = reqwest::Client::new()
        .post(gateway.capture_url("url=http://x"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let rq_id = common::rq_id(&response);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["record"]["file_keys"], json!(["file"]));
    assert_eq!(body["record"]["payload"], json!({ "caption": ["holiday"] }));

    let key = format!("{rq_id}-file.jpg");
    assert_eq!(files.get(&key).unwrap().as_ref(), b"jpeg bytes");
    assert_eq!(records.get(&rq_id).await.unwrap().file_keys, vec!["file"]);

    gateway.stop().await;
}

#[tokio::test]
async fn test_multipart_rejected_extension() {
    let (gateway, records, files) = common::spawn_in_memory(GatewayConfig::default()).await;

    let form = Form::new()
        .text("url", "http://x")
        .part("payload", Part::bytes(b"MZ".to_vec()).file_name("virus.exe"));

    let response = reqwest::Client::new()
        .post(gateway.capture_url(""))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("payload"));
    assert!(files.is_empty());
    assert!(records.is_empty());

    gateway.stop().await;
}

#[tokio::test]
async fn test_json_capture() {
    let (gateway, records, _) = common::spawn_in_memory(GatewayConfig::default()).await;

    let response = reqwest::Client::new()
        .put(gateway.capture_url("url=http://x"))
        .json(&json!({ "event": "signup", "tags": [1, 2] }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let stored = records.get(&common::rq_id(&response)).await.unwrap();
    let payload: Value = serde_json::from_str(&stored.payload).unwrap();
    assert_eq!(payload, json!({ "event": "signup", "tags": [1, 2] }));
    assert_eq!(stored.method, "PUT");

    gateway.stop().await;
}

#[tokio::test]
async fn test_disallowed_content_type() {
    let mut config = GatewayConfig::default();
    config.server.allowed_content_types = vec!["application/json".into()];
    let (gateway, records, _) = common::spawn_in_memory(config).await;

    let response = reqwest::Client::new()
        .post(gateway.capture_url("url=http://x"))
        .header("Content-Type", "text/plain")
        .body("hello")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(records.is_empty());

    gateway.stop().await;
}

#[tokio::test]
async fn test_unsupported_method() {
    let (gateway, records, _) = common::spawn_in_memory(GatewayConfig::default()).await;

    let response = reqwest::Client::new()
        .delete(gateway.capture_url("url=http://x"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    assert!(!common::rq_id(&response).is_empty());
    assert!(records.is_empty());

    gateway.stop().await;
}

#[tokio::test]
async fn test_ids_are_unique_per_request() {
    let (gateway, records, _) = common::spawn_in_memory(GatewayConfig::default()).await;
    let client = reqwest::Client::new();

    let mut ids = Vec::new();
    for _ in 0..5 {
        let response = client
            .get(gateway.capture_url("url=http://x"))
            .header("RqId", "client-chosen")
            .send()
            .await
            .unwrap();
        ids.push(common::rq_id(&response));
    }

    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 5);
    assert!(!ids.contains(&"client-chosen".to_string()));
    assert_eq!(records.len(), 5);

    gateway.stop().await;
}
