//! Integration tests for the anchor HTTP service

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use origin_domain::ContentFingerprint;
use origin_server::{
    config::ServerConfig,
    conversions::RecordView,
    handlers::{create_router, AppState, CountResponse, ErrorResponse, ExistsResponse},
};
use origin_store::Registry;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tower::ServiceExt; // for oneshot

fn hex(byte: u8) -> String {
    ContentFingerprint::from_bytes([byte; 64]).to_hex()
}

/// Helper to create test application state
fn create_test_state() -> AppState {
    AppState {
        registry: Arc::new(Registry::in_memory().unwrap()),
        default_page_size: 2,
        max_page_size: 10,
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

fn parse<T: DeserializeOwned>(body: &[u8]) -> T {
    serde_json::from_slice(body).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, json: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

async fn anchor(app: &Router, byte: u8, creator: &str) -> (StatusCode, Vec<u8>) {
    send(
        app,
        post_json(
            "/anchors",
            serde_json::json!({
                "fingerprint": hex(byte),
                "storage_locator": format!("cid-{}", byte),
                "location_tag": "40.7N,74.0W",
                "organization_tag": "AP",
                "creator": creator,
            }),
        ),
    )
    .await
}

#[tokio::test]
async fn test_anchor_then_lookup() {
    let app = create_router(create_test_state());

    let (status, body) = anchor(&app, 0xAA, "alice").await;
    assert_eq!(status, StatusCode::CREATED);
    let created: RecordView = parse(&body);
    assert!(created.is_original);
    assert_eq!(created.fingerprint, hex(0xAA));
    assert_eq!(created.organization_tag, "AP");

    let (status, body) = send(&app, get(&format!("/anchors/{}", hex(0xAA)))).await;
    assert_eq!(status, StatusCode::OK);
    let fetched: RecordView = parse(&body);
    assert_eq!(fetched, created);

    // Upper-case hex addresses the same record.
    let upper = hex(0xAA).to_uppercase();
    let (status, _) = send(&app, get(&format!("/anchors/{}", upper))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_duplicate_anchor_conflicts() {
    let app = create_router(create_test_state());

    anchor(&app, 0xAA, "alice").await;
    let (status, body) = anchor(&app, 0xAA, "bob").await;
    assert_eq!(status, StatusCode::CONFLICT);
    let err: ErrorResponse = parse(&body);
    assert_eq!(err.code, "duplicate_fingerprint");

    let (_, body) = send(&app, get("/count")).await;
    let count: CountResponse = parse(&body);
    assert_eq!(count.count, 1);
}

#[tokio::test]
async fn test_not_found_is_distinct() {
    let app = create_router(create_test_state());

    let (status, body) = send(&app, get(&format!("/anchors/{}", hex(0xCC)))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let err: ErrorResponse = parse(&body);
    assert_eq!(err.code, "not_found");

    let (status, body) = send(&app, get(&format!("/anchors/{}/exists", hex(0xCC)))).await;
    assert_eq!(status, StatusCode::OK);
    let exists: ExistsResponse = parse(&body);
    assert!(!exists.exists);
}

#[tokio::test]
async fn test_derivative_flow() {
    let app = create_router(create_test_state());
    let (_, body) = anchor(&app, 0xAA, "alice").await;
    let parent: RecordView = parse(&body);

    let (status, body) = send(
        &app,
        post_json(
            &format!("/anchors/{}/derivatives", hex(0xAA)),
            serde_json::json!({
                "fingerprint": hex(0xBB),
                "storage_locator": "cid-bb",
                "edit_type": "cropped 20%",
                "creator": "alice",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let child: RecordView = parse(&body);
    assert_eq!(child.parent_id.as_deref(), Some(parent.record_id.as_str()));
    assert!(!child.is_original);
    assert_eq!(child.location_tag, "40.7N,74.0W");

    let (_, body) = send(&app, get(&format!("/anchors/{}/lineage", hex(0xBB)))).await;
    let chain: Vec<RecordView> = parse(&body);
    assert_eq!(chain.len(), 2);
    assert_eq!(chain[1].record_id, parent.record_id);

    let (_, body) = send(&app, get(&format!("/anchors/{}/derivatives", hex(0xAA)))).await;
    let children: Vec<RecordView> = parse(&body);
    assert_eq!(children, vec![child]);
}

#[tokio::test]
async fn test_derivative_of_unknown_parent() {
    let app = create_router(create_test_state());

    let (status, _) = send(
        &app,
        post_json(
            &format!("/anchors/{}/derivatives", hex(0x01)),
            serde_json::json!({
                "fingerprint": hex(0x02),
                "storage_locator": "cid",
                "edit_type": "cropped",
                "creator": "alice",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_pagination_endpoint() {
    let app = create_router(create_test_state());
    for b in 1..=3 {
        anchor(&app, b, "alice").await;
    }

    // default_page_size is 2
    let (_, body) = send(&app, get("/anchors")).await;
    let page: Vec<RecordView> = parse(&body);
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].fingerprint, hex(1));

    let (_, body) = send(&app, get("/anchors?start=2&limit=10")).await;
    let page: Vec<RecordView> = parse(&body);
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].fingerprint, hex(3));

    let (status, body) = send(&app, get("/anchors?start=3&limit=10")).await;
    assert_eq!(status, StatusCode::OK);
    let page: Vec<RecordView> = parse(&body);
    assert!(page.is_empty());

    let (status, body) = send(&app, get("/anchors?start=-1&limit=10")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let err: ErrorResponse = parse(&body);
    assert_eq!(err.code, "invalid_range");

    // max_page_size is 10
    let (status, body) = send(&app, get("/anchors?start=0&limit=11")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let err: ErrorResponse = parse(&body);
    assert_eq!(err.code, "invalid_range");
}

#[tokio::test]
async fn test_malformed_query_has_error_body() {
    let app = create_router(create_test_state());

    let (status, body) = send(&app, get("/anchors?start=abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let err: ErrorResponse = parse(&body);
    assert_eq!(err.code, "malformed_request");
}

#[tokio::test]
async fn test_malformed_json_has_error_body() {
    let app = create_router(create_test_state());

    let request = Request::builder()
        .method("POST")
        .uri("/anchors")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let err: ErrorResponse = parse(&body);
    assert_eq!(err.code, "malformed_request");
}

#[tokio::test]
async fn test_empty_locator_passes_through() {
    let app = create_router(create_test_state());

    let (status, body) = send(
        &app,
        post_json(
            "/anchors",
            serde_json::json!({
                "fingerprint": hex(7),
                "storage_locator": "",
                "creator": "alice",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let created: RecordView = parse(&body);
    assert_eq!(created.storage_locator, "");
}

#[tokio::test]
async fn test_fingerprints_and_creator_listing() {
    let app = create_router(create_test_state());
    anchor(&app, 3, "alice").await;
    anchor(&app, 1, "bob").await;
    anchor(&app, 2, "alice").await;

    let (_, body) = send(&app, get("/fingerprints")).await;
    let fps: Vec<String> = parse(&body);
    assert_eq!(fps, vec![hex(3), hex(1), hex(2)]);

    let (_, body) = send(&app, get("/creators/alice/anchors")).await;
    let records: Vec<RecordView> = parse(&body);
    let fps: Vec<_> = records.iter().map(|r| r.fingerprint.clone()).collect();
    assert_eq!(fps, vec![hex(3), hex(2)]);
}

#[tokio::test]
async fn test_client_cannot_supply_timestamp() {
    let app = create_router(create_test_state());

    let (status, body) = send(
        &app,
        post_json(
            "/anchors",
            serde_json::json!({
                "fingerprint": hex(1),
                "storage_locator": "cid",
                "creator": "alice",
                "created_at": 0,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let err: ErrorResponse = parse(&body);
    assert_eq!(err.code, "malformed_request");
    assert!(err.error.contains("created_at"));

    let (_, body) = send(&app, get("/count")).await;
    let count: CountResponse = parse(&body);
    assert_eq!(count.count, 0);
}

#[test]
fn test_server_config_from_toml() {
    let toml = r#"
        bind_address = "0.0.0.0"
        bind_port = 9000
        database_path = "anchors.db"
    "#;

    let config: ServerConfig = toml::from_str(toml).unwrap();
    assert_eq!(config.bind_port, 9000);
    assert_eq!(config.default_page_size, 50);
    assert_eq!(config.max_page_size, 1000);
    assert_eq!(config.log_level, "info");
}
