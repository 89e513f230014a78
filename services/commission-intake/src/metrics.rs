// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus metrics for the intake endpoint.

use prometheus::{Encoder, Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder};

/// Terminal outcome of one intake request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Submitted,
    RateLimited,
    Invalid,
    RelayFailed,
    Error,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::RateLimited => "rate_limited",
            Self::Invalid => "invalid",
            Self::RelayFailed => "relay_failed",
            Self::Error => "error",
        }
    }
}

/// Metric handles registered on a private registry.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    requests: IntCounterVec,
    relay_duration: Histogram,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let requests = IntCounterVec::new(
            Opts::new(
                "commission_requests_total",
                "Commission intake requests by outcome",
            ),
            &["outcome"],
        )?;
        let relay_duration = Histogram::with_opts(
            HistogramOpts::new(
                "commission_relay_duration_seconds",
                "Time spent delivering commission messages to the webhook",
            )
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        )?;

        registry.register(Box::new(requests.clone()))?;
        registry.register(Box::new(relay_duration.clone()))?;

        Ok(Self {
            registry,
            requests,
            relay_duration,
        })
    }

    pub fn record(&self, outcome: Outcome) {
        self.requests.with_label_values(&[outcome.as_str()]).inc();
    }

    pub fn observe_relay(&self, seconds: f64) {
        self.relay_duration.observe(seconds);
    }

    /// Requests counted so far for `outcome`.
    pub fn count(&self, outcome: Outcome) -> u64 {
        self.requests.with_label_values(&[outcome.as_str()]).get()
    }

    /// Render all metrics in the Prometheus text format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
