//! Integration tests for the HTTP API

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use evsolve::core::{create_router, EngineConfig};
use serde_json::{json, Value};
use tower::ServiceExt;

fn create_test_router() -> axum::Router {
    create_router(EngineConfig::default())
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = create_test_router().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let (status, json) = send(get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], evsolve::VERSION);
    assert_eq!(json["cached_tables"], 0);
}

#[tokio::test]
async fn test_solve_shutter() {
    let (status, json) = send(post_json(
        "/solve",
        json!({
            "base": { "shutter": "1/125", "aperture": "f/8", "iso": "100" },
            "solve_for": "shutter",
            "aperture": "f/2.8",
            "iso": "100",
            "increment": "full"
        }),
    ))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["solve_for"], "shutter");
    assert_eq!(json["value"], "1/1000");
    assert_eq!(json["shutter"], "1/1000");
    assert_eq!(json["aperture"], "f/2.8");
    assert_eq!(json["iso"], "100");
    assert_eq!(json["increment"], "full");
    assert!(json["timestamp"].is_string());
    assert!((json["stops_applied"].as_f64().unwrap() + 3.03).abs() < 0.01);
}

#[tokio::test]
async fn test_solve_iso_with_compensation() {
    let (status, json) = send(post_json(
        "/solve",
        json!({
            "base": { "shutter": "1/125", "aperture": "f/8", "iso": "100" },
            "solve_for": "iso",
            "shutter": "1/500",
            "aperture": "f/8",
            "ev_compensation": 1.0
        }),
    ))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["value"], "800");
    assert_eq!(json["increment"], "third");
}

#[tokio::test]
async fn test_solve_malformed_input_is_bad_request() {
    let (status, json) = send(post_json(
        "/solve",
        json!({
            "base": { "shutter": "1/125", "aperture": "f/8", "iso": "100" },
            "solve_for": "shutter",
            "aperture": "f/2.8",
            "iso": "ISO100"
        }),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "E001_MALFORMED");
    assert_eq!(json["details"]["parameter"], "iso");
    assert_eq!(json["details"]["input"], "ISO100");
}

#[tokio::test]
async fn test_solve_missing_target_is_bad_request() {
    let (status, json) = send(post_json(
        "/solve",
        json!({
            "base": { "shutter": "1/125", "aperture": "f/8", "iso": "100" },
            "solve_for": "aperture",
            "shutter": "1/250"
        }),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "E003_MISSING");
}

#[tokio::test]
async fn test_solve_overexposed_is_unprocessable() {
    let (status, json) = send(post_json(
        "/solve",
        json!({
            "base": { "shutter": "30\"", "aperture": "f/1.4", "iso": "100" },
            "solve_for": "shutter",
            "aperture": "f/22",
            "iso": "25",
            "increment": "third"
        }),
    ))
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "E010_OVEREXPOSED");
    assert_eq!(json["message"], "Image will be overexposed by approximately 9.9 stops");
    assert!(json["details"]["stops_overexposed"].as_f64().unwrap() > 9.9);
}

#[tokio::test]
async fn test_solve_parameter_limit_is_unprocessable() {
    let (status, json) = send(post_json(
        "/solve",
        json!({
            "base": { "shutter": "1/125", "aperture": "f/8", "iso": "100" },
            "solve_for": "iso",
            "shutter": "60\"",
            "aperture": "f/8"
        }),
    ))
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "E020_PARAMETER_LIMIT");
    assert_eq!(json["details"]["available_limit"], "30\"");
}

#[tokio::test]
async fn test_values_endpoint() {
    let (status, json) = send(get("/values/aperture/full")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["kind"], "aperture");
    assert_eq!(json["increment"], "full");
    let values = json["values"].as_array().unwrap();
    assert_eq!(values.len(), 13);
    assert_eq!(values[0], "f/1");
    assert_eq!(values[12], "f/64");
}

#[tokio::test]
async fn test_values_endpoint_rejects_unknown_kind() {
    let (status, json) = send(get("/values/focal/full")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "E005_INVALID_QUERY");
}

#[tokio::test]
async fn test_ev_endpoint() {
    let (status, json) = send(post_json(
        "/ev",
        json!({ "shutter": "1/125", "aperture": "f/8", "iso": "100" }),
    ))
    .await;

    assert_eq!(status, StatusCode::OK);
    let ev100 = json["ev100"].as_f64().unwrap();
    assert!((ev100 - (64.0f64 * 125.0).log2()).abs() < 1e-9);
}

#[tokio::test]
async fn test_solve_unknown_kind_in_body_is_bad_request() {
    let (status, json) = send(post_json(
        "/solve",
        json!({
            "base": { "shutter": "1/125", "aperture": "f/8", "iso": "100" },
            "solve_for": "focal",
            "aperture": "f/2.8",
            "iso": "100"
        }),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "E005_INVALID_QUERY");
    assert!(json["message"].as_str().unwrap().starts_with("Invalid query:"));
}

#[tokio::test]
async fn test_ev_rejects_incomplete_body() {
    let (status, json) = send(post_json("/ev", json!({ "shutter": "1/125" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "E005_INVALID_QUERY");
}
