// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Fixed-window rate limiter for the commission endpoint.
//!
//! Each source address gets a counter that resets entirely once its window
//! has elapsed. The check and the increment happen under one write guard, so
//! concurrent requests from the same address can never over-admit.

use crate::config::RateLimitConfig;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

/// Key used when no source address can be resolved.
pub const UNKNOWN_SOURCE: &str = "unknown";

/// Result of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitResult {
    /// Request is allowed
    Allowed {
        /// Remaining requests in current window
        remaining: u32,
        /// Time until window resets
        reset_in: Duration,
    },
    /// Request is rate limited
    Limited {
        /// Whole seconds until the window resets, never zero
        retry_after_secs: u64,
    },
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed { .. })
    }
}

/// Counter state for one source address.
#[derive(Debug, Clone, Copy)]
struct WindowRecord {
    /// Requests observed in the current window
    count: u32,
    /// End of the current window
    reset_at: Instant,
}

/// Thread-safe fixed-window rate limiter.
pub struct RateLimiter {
    config: RateLimitConfig,
    records: RwLock<HashMap<String, WindowRecord>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given configuration.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Configuration this limiter was built with.
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Check and record one request from `source`.
    pub async fn check(&self, source: &str) -> RateLimitResult {
        let now = Instant::now();
        let window = self.config.window_duration();
        let max = self.config.max_requests;

        let mut records = self.records.write().await;
        let record = records
            .entry(source.to_string())
            .or_insert(WindowRecord {
                count: 0,
                reset_at: now + window,
            });

        if now > record.reset_at {
            debug!(%source, "Rate limit window expired, starting a new one");
            *record = WindowRecord {
                count: 0,
                reset_at: now + window,
            };
        }

        if record.count >= max {
            let retry_after_secs = ceil_secs(record.reset_at.saturating_duration_since(now));
            debug!(%source, retry_after_secs, "Source rate limit exceeded");
            return RateLimitResult::Limited { retry_after_secs };
        }

        record.count += 1;
        RateLimitResult::Allowed {
            remaining: max - record.count,
            reset_in: record.reset_at.saturating_duration_since(now),
        }
    }

    /// Drop records whose window has already ended.
    pub async fn cleanup(&self) -> usize {
        let now = Instant::now();
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, record| now <= record.reset_at);
        let evicted = before - records.len();
        if evicted > 0 {
            debug!(evicted, remaining = records.len(), "Evicted expired rate limit records");
        }
        evicted
    }

    /// Number of source addresses currently tracked.
    pub async fn tracked_sources(&self) -> usize {
        self.records.read().await.len()
    }
}

/// Round a remaining duration up to whole seconds, with a floor of one.
fn ceil_secs(remaining: Duration) -> u64 {
    let millis = u64::try_from(remaining.as_millis()).unwrap_or(u64::MAX);
    millis.div_ceil(1000).max(1)
}
