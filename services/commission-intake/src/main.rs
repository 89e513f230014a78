// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Commission Intake Service
//!
//! Serves `POST /api/commission` for the keyboard commission form, plus
//! `/health`, `/healthz` and `/metrics`.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables, after an optional
//! `.env` file:
//!
//! - `COMMISSION_WEBHOOK_URL`: Webhook receiving accepted requests (required)
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `RATE_LIMIT_MAX_REQUESTS`: Requests per IP per window (default: 3)
//! - `RATE_LIMIT_WINDOW_SECS`: Window length (default: 3600)
//! - `RATE_LIMIT_CLEANUP_SECS`: Expired record sweep interval (default: 60)
//! - `TRUST_FORWARDED_FOR`: Key on `X-Forwarded-For` (default: true)
//! - `RELAY_TIMEOUT_SECS`: Outbound webhook timeout (default: 10)
//! - `ALLOWED_ORIGINS`: Comma-separated CORS origins (default: https://localhost)

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commission_intake::{
    config::Config,
    handlers::{router, AppState},
    limiter::RateLimiter,
    metrics::Metrics,
    relay::WebhookRelay,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = Config::from_env()?;
    info!(
        bind_addr = %config.bind_addr,
        max_requests = config.rate_limit.max_requests,
        window_secs = config.rate_limit.window_secs,
        trust_forwarded_for = config.rate_limit.trust_forwarded_for,
        relay_timeout_secs = config.relay.timeout_secs,
        "Starting commission intake service"
    );

    let state = Arc::new(AppState {
        limiter: RateLimiter::new(config.rate_limit.clone()),
        relay: WebhookRelay::new(&config.relay)?,
        metrics: Metrics::new()?,
    });

    // Spawn cleanup task
    let cleanup_state = state.clone();
    let cleanup_every = config.rate_limit.cleanup_interval();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(cleanup_every);
        loop {
            interval.tick().await;
            cleanup_state.limiter.cleanup().await;
        }
    });

    let app = router(state, &config.allowed_origins);

    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
