// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test harness for the commission intake service.
//!
//! Provides payload and address generators, a local webhook sink that
//! records what the relay posts, and helpers for driving the router.

#![allow(dead_code)]

pub mod generators;
pub mod metrics;
pub mod webhook;

use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use commission_intake::{
    config::{RateLimitConfig, RelayConfig},
    handlers::{router, AppState},
    limiter::RateLimiter,
    metrics::Metrics,
    relay::WebhookRelay,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use url::Url;

/// Build application state posting to `webhook_url`.
pub fn app_state(webhook_url: Url, max_requests: u32) -> Arc<AppState> {
    app_state_with_timeout(webhook_url, max_requests, 5)
}

/// Build application state whose relay gives up after `timeout_secs`.
pub fn app_state_with_timeout(
    webhook_url: Url,
    max_requests: u32,
    timeout_secs: u64,
) -> Arc<AppState> {
    let relay_config = RelayConfig {
        timeout_secs,
        ..RelayConfig::new(webhook_url)
    };
    Arc::new(AppState {
        limiter: RateLimiter::new(RateLimitConfig {
            max_requests,
            ..Default::default()
        }),
        relay: tokio_test::assert_ok!(WebhookRelay::new(&relay_config)),
        metrics: Metrics::new().unwrap(),
    })
}

/// Router over `state` with no CORS origins.
pub fn app(state: Arc<AppState>) -> Router {
    router(state, &[])
}

/// `POST /api/commission` with a raw body, optionally forwarded for `source`.
pub fn post_raw(source: Option<&str>, body: impl Into<Body>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/commission")
        .header("content-type", "application/json");
    if let Some(source) = source {
        builder = builder.header("x-forwarded-for", source);
    }
    builder.body(body.into()).unwrap()
}

/// `POST /api/commission` with a JSON payload forwarded for `source`.
pub fn post_commission(source: &str, payload: &Value) -> Request<Body> {
    post_raw(Some(source), payload.to_string())
}

/// A received response, split into its parts.
pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Send one request through the router.
pub async fn send(app: &Router, request: Request<Body>) -> Reply {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    Reply {
        status,
        headers,
        body,
    }
}
