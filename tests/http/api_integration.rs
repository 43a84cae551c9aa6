//! Integration tests for the passage REST API
//!
//! Tests the complete workflow including upload indexing, searching
//! the active collection, and collection management.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use passage::core::config::Config;
use passage::core::services::Services;
use passage::core::types::*;
use passage::http::{build_router, AppState};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt as TowerServiceExt;

use crate::common::{lettered_document, FACTS};

const BOUNDARY: &str = "passage-test-boundary";

/// Create a test application with temporary storage
fn create_test_app_with(config: impl FnOnce(&mut Config)) -> (Router, TempDir) {
    let temp_dir = TempDir::new().unwrap();

    let mut cfg = Config::default();
    cfg.storage.data_dir = temp_dir.path().to_path_buf();
    config(&mut cfg);

    let services = Arc::new(Services::new(cfg).unwrap());
    (build_router(AppState::new(services)), temp_dir)
}

fn create_test_app() -> (Router, TempDir) {
    create_test_app_with(|_| {})
}

/// Build a multipart/form-data body by hand
fn multipart_body(file: Option<(&str, &[u8])>, name: Option<&str>) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some((filename, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    if let Some(name) = name {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\n{name}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(file: Option<(&str, &[u8])>, name: Option<&str>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/index")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(file, name)))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn method(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 100_000)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _temp) = create_test_app();

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), 10_000)
        .await
        .unwrap();
    let health: HealthResponse = serde_json::from_slice(&body).unwrap();

    assert_eq!(health.status, "ok");
    assert!(!health.version.is_empty());
}

#[tokio::test]
async fn test_index_then_search() {
    let (app, _temp) = create_test_app();

    let (status, body) = send(
        &app,
        upload_request(Some(("facts.txt", FACTS.as_bytes())), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Document indexed");

    let (status, body) = send(&app, get("/v1/search?query=Saturn")).await;
    assert_eq!(status, StatusCode::OK);

    let result: ResultResponse = serde_json::from_value(body).unwrap();
    assert_eq!(result.result.len(), 1);
    assert!(result.result[0].contains("Saturn has prominent rings"));
    // One sentence before the hit, three after
    assert!(result.result[0].contains("Bamboo grows very quickly"));
    assert!(result.result[0].contains("Glaciers carve deep valleys"));
    assert!(!result.result[0].contains("Owls hunt"));
}

#[tokio::test]
async fn test_reindex_reports_already_indexed() {
    let (app, _temp) = create_test_app();
    let request = || upload_request(Some(("facts.txt", FACTS.as_bytes())), None);

    send(&app, request()).await;
    let (status, body) = send(&app, request()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Already indexed");
}

#[tokio::test]
async fn test_name_field_overrides_filename() {
    let (app, _temp) = create_test_app();

    send(
        &app,
        upload_request(Some(("facts.txt", FACTS.as_bytes())), Some("Science Facts")),
    )
    .await;

    let (status, body) = send(&app, get("/v1/collections")).await;
    assert_eq!(status, StatusCode::OK);

    let listed: CollectionsResponse = serde_json::from_value(body).unwrap();
    assert_eq!(listed.active, "ScienceFacts");
    assert_eq!(listed.collections.len(), 1);
    assert_eq!(listed.collections[0].name, "ScienceFacts");
    assert_eq!(listed.collections[0].chunks, 10);
}

#[tokio::test]
async fn test_index_error_statuses() {
    let (app, _temp) = create_test_app();

    let (status, body) = send(&app, upload_request(None, Some("nofile"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("file"));

    let (status, _) = send(
        &app,
        upload_request(Some(("slides.pptx", b"binary")), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let (status, _) = send(&app, upload_request(Some(("blank.txt", b"   ")), None)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        upload_request(Some(("facts.txt", FACTS.as_bytes())), Some("???")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Failed uploads leave nothing behind
    let (_, body) = send(&app, get("/v1/collections")).await;
    assert_eq!(body["collections"], serde_json::json!([]));
}

#[tokio::test]
async fn test_upload_over_limit_is_rejected() {
    let (app, _temp) = create_test_app_with(|c| c.indexing.max_upload_mb = 1);
    let big = "word. ".repeat(400_000);

    let (status, body) = send(&app, upload_request(Some(("big.txt", big.as_bytes())), None)).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_search_validation() {
    let (app, _temp) = create_test_app_with(|c| c.search.max_query_length = 10);

    let (status, body) = send(&app, get("/v1/search?query=%20%20")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("empty"));

    let (status, _) = send(&app, get("/v1/search?query=far%20too%20long%20a%20query")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_search_params_are_json_errors() {
    let (app, _temp) = create_test_app();

    for uri in ["/v1/search", "/v1/search?query=x&k=abc", "/v1/search?k=3"] {
        let (status, body) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(body["error"].is_string(), "{uri}: {body}");
    }
}

#[tokio::test]
async fn test_non_multipart_upload_is_json_error() {
    let (app, _temp) = create_test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/v1/index")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(FACTS))
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string(), "{body}");
}

#[tokio::test]
async fn test_list_collections_marks_active() {
    let (app, _temp) = create_test_app();

    let (status, body) = send(&app, get("/v1/collections")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["collections"], serde_json::json!([]));

    send(&app, upload_request(Some(("letters.txt", lettered_document(5).as_bytes())), None)).await;
    send(&app, upload_request(Some(("facts.txt", FACTS.as_bytes())), None)).await;

    let (status, body) = send(&app, get("/v1/collections")).await;
    assert_eq!(status, StatusCode::OK);
    let response: CollectionsResponse = serde_json::from_value(body).unwrap();
    let names: Vec<&str> = response.collections.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["factstxt", "letterstxt"]);
    assert_eq!(response.active, "factstxt");
    assert_eq!(response.collections[0].source.as_deref(), Some("facts.txt"));
}

#[tokio::test]
async fn test_search_without_collection_is_empty() {
    let (app, _temp) = create_test_app();

    let (status, body) = send(&app, get("/v1/search?query=anything")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "result": [] }));
}

#[tokio::test]
async fn test_select_routes_searches() {
    let (app, _temp) = create_test_app();
    let letters = lettered_document(20);

    send(&app, upload_request(Some(("facts.txt", FACTS.as_bytes())), None)).await;
    send(&app, upload_request(Some(("letters.txt", letters.as_bytes())), None)).await;

    // Most recent upload is active
    let (_, body) = send(&app, get("/v1/search?query=w10&k=5")).await;
    assert_eq!(body["result"], serde_json::json!(["w9.w10.w11.w12.w13"]));

    let (status, body) = send(&app, method("POST", "/v1/collections/factstxt/select")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("factstxt"));

    let (_, body) = send(&app, get("/v1/search?query=w10")).await;
    assert_eq!(body["result"], serde_json::json!([]));

    let (status, _) = send(&app, method("POST", "/v1/collections/missing/select")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_resets_active_collection() {
    let (app, _temp) = create_test_app();

    send(&app, upload_request(Some(("facts.txt", FACTS.as_bytes())), None)).await;

    let (status, body) = send(&app, method("DELETE", "/v1/collections/factstxt")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("factstxt"));

    let (_, body) = send(&app, get("/v1/collections")).await;
    assert_eq!(body["active"], "alldocs");
    assert_eq!(body["collections"], serde_json::json!([]));

    let (status, body) = send(&app, method("DELETE", "/v1/collections/factstxt")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("not found"));
}
