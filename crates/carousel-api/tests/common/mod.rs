//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use carousel_core::config::CarouselConfig;
use carousel_test_support::{ManualClock, fixed_now};
use http_body_util::BodyExt;
use tower::ServiceExt;

use carousel_api::state::AppState;

/// Build the full app router over a manual clock the test can move forward.
/// Uses the same route structure as `main.rs`.
pub fn build_test_app() -> (Router, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(fixed_now()));
    let app_state = AppState::new(clock.clone(), CarouselConfig::default());
    (carousel_api::app(app_state), clock)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Create a carousel and return its session id.
pub async fn create_carousel(app: Router, body: &serde_json::Value) -> String {
    let (status, json) = post_json(app, "/api/v1/carousels", body).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {json}");
    json["session_id"].as_str().unwrap().to_owned()
}

/// Send a DELETE request and return the status.
pub async fn delete(app: Router, uri: &str) -> StatusCode {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    app.oneshot(request).await.unwrap().status()
}
