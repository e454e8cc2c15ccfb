#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use dispatch_api::{create_app, AppState};
use dispatch_core::{ApiConfig, LatencyConfig};
use dispatch_testing_utils::TestEnv;

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn content_range(&self) -> &str {
        self.headers
            .get("content-range")
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
    }

    pub fn ids(&self) -> Vec<String> {
        self.body
            .as_array()
            .expect("response body is not an array")
            .iter()
            .map(|row| row["id"].as_str().unwrap_or_default().to_string())
            .collect()
    }
}

pub fn app(env: &TestEnv) -> Router {
    let state = AppState::from_store(env.store.clone(), LatencyConfig::default());
    create_app(state, &ApiConfig::default())
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    TestResponse {
        status,
        headers,
        body,
    }
}

pub async fn get(app: &Router, uri: &str) -> TestResponse {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn get_range(app: &Router, uri: &str, range: &str) -> TestResponse {
    let request = Request::get(uri)
        .header("range", range)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn with_body(app: &Router, method: &str, uri: &str, body: Value) -> TestResponse {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: &Router, uri: &str) -> TestResponse {
    send(app, Request::delete(uri).body(Body::empty()).unwrap()).await
}
