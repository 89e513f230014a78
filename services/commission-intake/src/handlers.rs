// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the commission intake service.
//!
//! `POST /api/commission` runs one request through rate limiting, payload
//! parsing, validation and relay, stopping at the first step that rejects.

use crate::error::{IntakeError, MessageResponse, MSG_SUBMITTED};
use crate::limiter::{RateLimitResult, RateLimiter, UNKNOWN_SOURCE};
use crate::metrics::{Metrics, Outcome};
use crate::relay::WebhookRelay;
use crate::validator;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, ConnectInfo, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

/// Shared application state.
pub struct AppState {
    pub limiter: RateLimiter,
    pub relay: WebhookRelay,
    pub metrics: Metrics,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Build the service router.
pub fn router(state: Arc<AppState>, allowed_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/metrics", get(metrics))
        .route("/api/commission", post(submit_commission))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "commission-intake",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Prometheus scrape endpoint.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    match state.metrics.render() {
        Ok(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(err) => IntakeError::Unexpected(format!("metrics encoding failed: {err}")).into_response(),
    }
}

/// Accept a keyboard commission request.
pub async fn submit_commission(
    State(state): State<Arc<AppState>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let peer = connect_info.map(|ConnectInfo(addr)| addr.ip());
    let source = client_source(
        &headers,
        peer,
        state.limiter.config().trust_forwarded_for,
    );

    match process(&state, &source, body).await {
        Ok(()) => {
            info!(%source, "Commission request submitted");
            state.metrics.record(Outcome::Submitted);
            (StatusCode::OK, Json(MessageResponse::new(MSG_SUBMITTED))).into_response()
        }
        Err(err) => {
            state.metrics.record(err.outcome());
            err.into_response()
        }
    }
}

async fn process(
    state: &AppState,
    source: &str,
    body: Result<Bytes, BytesRejection>,
) -> Result<(), IntakeError> {
    if let RateLimitResult::Limited { retry_after_secs } = state.limiter.check(source).await {
        info!(%source, retry_after_secs, "Commission request rate limited");
        return Err(IntakeError::RateLimited { retry_after_secs });
    }

    let body = body.map_err(|e| IntakeError::Unexpected(format!("unreadable body: {e}")))?;
    let payload: serde_json::Value = serde_json::from_slice(&body)
        .map_err(|e| IntakeError::Unexpected(format!("malformed JSON body: {e}")))?;

    let request = validator::validate(&payload).map_err(|violations| {
        let summary = violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        info!(%source, violations = %summary, "Commission request failed validation");
        IntakeError::Validation(violations)
    })?;

    // Delivery runs detached so a client hang-up cannot abandon a request
    // that has already consumed a rate limit slot.
    let relay = state.relay.clone();
    let started = Instant::now();
    let delivery = tokio::spawn(async move { relay.deliver(&request).await });
    let result = delivery
        .await
        .map_err(|e| IntakeError::Unexpected(format!("relay task failed: {e}")))?;
    state.metrics.observe_relay(started.elapsed().as_secs_f64());
    debug!(%source, ok = result.is_ok(), "Relay finished");

    result.map_err(IntakeError::from)
}

/// Resolve the rate limit key for a request.
///
/// Prefers the first `X-Forwarded-For` entry (when trusted), then the peer
/// address, then [`UNKNOWN_SOURCE`].
pub fn client_source(headers: &HeaderMap, peer: Option<IpAddr>, trust_forwarded_for: bool) -> String {
    let forwarded = trust_forwarded_for
        .then(|| headers.get("x-forwarded-for"))
        .flatten()
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    if let Some(first) = forwarded {
        return first
            .parse::<IpAddr>()
            .map(|ip| ip.to_string())
            .unwrap_or_else(|_| first.to_string());
    }

    peer.map(|ip| ip.to_string())
        .unwrap_or_else(|| UNKNOWN_SOURCE.to_string())
}
