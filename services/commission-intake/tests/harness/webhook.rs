// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Local webhook sink that records every message it receives.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use url::Url;

type Received = Arc<Mutex<Vec<Value>>>;

/// A running fake webhook.
pub struct FakeWebhook {
    pub url: Url,
    received: Received,
}

impl FakeWebhook {
    /// Start a sink answering every message with `status`.
    pub async fn start(status: StatusCode) -> Self {
        Self::start_with_delay(status, Duration::ZERO).await
    }

    /// Start a sink that holds each message for `delay` before recording
    /// and answering it.
    pub async fn start_with_delay(status: StatusCode, delay: Duration) -> Self {
        let received: Received = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route("/api/webhooks/1/token", post(record))
            .with_state((received.clone(), status, delay));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: Url::parse(&format!("http://{addr}/api/webhooks/1/token")).unwrap(),
            received,
        }
    }

    /// A sink that accepts everything.
    pub async fn accepting() -> Self {
        Self::start(StatusCode::NO_CONTENT).await
    }

    /// A sink that accepts everything after `delay`.
    pub async fn slow(delay: Duration) -> Self {
        Self::start_with_delay(StatusCode::NO_CONTENT, delay).await
    }

    /// Messages received so far.
    pub fn messages(&self) -> Vec<Value> {
        self.received.lock().unwrap().clone()
    }
}

async fn record(
    State((received, status, delay)): State<(Received, StatusCode, Duration)>,
    Json(message): Json<Value>,
) -> StatusCode {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    received.lock().unwrap().push(message);
    status
}

/// A URL on loopback where nothing listens.
pub async fn closed_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{addr}/api/webhooks/1/token")).unwrap()
}
