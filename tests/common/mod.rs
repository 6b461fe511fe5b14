//! Shared harness: the full router over a fresh in-memory store, driven
//! in-process. No live database or listening socket required.

#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use service_booking_api::config::AppConfig;
use service_booking_api::store::MemoryStore;
use service_booking_api::{app, AppState};

pub fn test_app() -> Router {
    let mut config = AppConfig::default();
    config.security.token_secret = "integration-test-secret".to_string();

    app(AppState {
        config: Arc::new(config),
        store: Arc::new(MemoryStore::new()),
    })
}

/// Log in through /jwt and return the `token=...` cookie pair for reuse.
pub async fn login(app: &Router, email: &str) -> Result<String> {
    let response = app
        .clone()
        .oneshot(post_json("/jwt", json!({ "email": email }), None))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .context("missing Set-Cookie header")?
        .to_str()?
        .to_string();
    let cookie = set_cookie
        .split(';')
        .next()
        .context("empty Set-Cookie header")?
        .to_string();
    Ok(cookie)
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    request("GET", uri, None, cookie)
}

pub fn delete(uri: &str, cookie: Option<&str>) -> Request<Body> {
    request("DELETE", uri, None, cookie)
}

pub fn post_json(uri: &str, body: Value, cookie: Option<&str>) -> Request<Body> {
    request("POST", uri, Some(body), cookie)
}

pub fn put_json(uri: &str, body: Value, cookie: Option<&str>) -> Request<Body> {
    request("PUT", uri, Some(body), cookie)
}

/// POST a raw body with a JSON content type, for exercising malformed input.
pub fn post_raw(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn request(method: &str, uri: &str, body: Option<Value>, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

pub async fn body_json(response: Response<Body>) -> Result<Value> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

pub async fn body_text(response: Response<Body>) -> Result<String> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(String::from_utf8(bytes.to_vec())?)
}
