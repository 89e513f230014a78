// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the commission intake service.
//!
//! Values come from the environment (optionally seeded from a `.env` file by
//! the binary). The webhook destination is the only required setting.

use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Configuration for the commission intake service.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    pub bind_addr: String,

    /// Rate limiting configuration
    pub rate_limit: RateLimitConfig,

    /// Outbound webhook configuration
    pub relay: RelayConfig,

    /// Origins allowed to call the endpoint from a browser
    pub allowed_origins: Vec<String>,
}

/// Fixed-window rate limiting configuration.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Accepted requests per source address per window (default: 3)
    pub max_requests: u32,

    /// Window length in seconds (default: 3600)
    pub window_secs: u64,

    /// Interval between sweeps of expired records in seconds (default: 60)
    pub cleanup_interval_secs: u64,

    /// Key requests on the first `X-Forwarded-For` entry when present (default: true)
    pub trust_forwarded_for: bool,
}

/// Webhook relay configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Destination webhook URL
    pub webhook_url: Url,

    /// Timeout for the outbound call in seconds (default: 10)
    pub timeout_secs: u64,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_max_requests() -> u32 {
    3
}

fn default_window_secs() -> u64 {
    3600
}

fn default_cleanup_interval_secs() -> u64 {
    60
}

fn default_relay_timeout_secs() -> u64 {
    10
}

fn default_allowed_origins() -> Vec<String> {
    vec!["https://localhost".to_string()]
}

fn default_true() -> bool {
    true
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
            trust_forwarded_for: default_true(),
        }
    }
}

impl RateLimitConfig {
    /// Get the rate window duration
    pub fn window_duration(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    /// Get the cleanup sweep interval
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }
}

impl RelayConfig {
    /// Build a relay config with the default timeout.
    pub fn new(webhook_url: Url) -> Self {
        Self {
            webhook_url,
            timeout_secs: default_relay_timeout_secs(),
        }
    }

    /// Get the outbound call timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Recognised keys: `BIND_ADDR`, `COMMISSION_WEBHOOK_URL`,
    /// `RATE_LIMIT_MAX_REQUESTS`, `RATE_LIMIT_WINDOW_SECS`,
    /// `RATE_LIMIT_CLEANUP_SECS`, `TRUST_FORWARDED_FOR`,
    /// `RELAY_TIMEOUT_SECS` and `ALLOWED_ORIGINS`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let webhook_url = lookup("COMMISSION_WEBHOOK_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("COMMISSION_WEBHOOK_URL"))?;
        let webhook_url = parse_webhook_url(&webhook_url)?;

        let rate_limit = RateLimitConfig {
            max_requests: parse_or(&lookup, "RATE_LIMIT_MAX_REQUESTS", default_max_requests())?,
            window_secs: parse_or(&lookup, "RATE_LIMIT_WINDOW_SECS", default_window_secs())?,
            cleanup_interval_secs: parse_or(
                &lookup,
                "RATE_LIMIT_CLEANUP_SECS",
                default_cleanup_interval_secs(),
            )?,
            trust_forwarded_for: parse_or(&lookup, "TRUST_FORWARDED_FOR", default_true())?,
        };

        let relay = RelayConfig {
            webhook_url,
            timeout_secs: parse_or(&lookup, "RELAY_TIMEOUT_SECS", default_relay_timeout_secs())?,
        };

        // Zero would disable limiting, panic the sweep interval or time out every relay.
        for (key, value) in [
            ("RATE_LIMIT_MAX_REQUESTS", u64::from(rate_limit.max_requests)),
            ("RATE_LIMIT_WINDOW_SECS", rate_limit.window_secs),
            ("RATE_LIMIT_CLEANUP_SECS", rate_limit.cleanup_interval_secs),
            ("RELAY_TIMEOUT_SECS", relay.timeout_secs),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    key,
                    value: "0".to_string(),
                });
            }
        }

        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_else(default_allowed_origins);

        Ok(Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(default_bind_addr),
            rate_limit,
            relay,
            allowed_origins,
        })
    }
}

/// Parse an optional variable, falling back to `default` when unset.
fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            key,
            value: raw.clone(),
        }),
        None => Ok(default),
    }
}

/// Only http(s) URLs with a host are accepted as webhook destinations.
fn parse_webhook_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = || ConfigError::Invalid {
        key: "COMMISSION_WEBHOOK_URL",
        // Webhook URLs embed a token; keep it out of error output.
        value: "<redacted>".to_string(),
    };

    let url = Url::parse(raw.trim()).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(invalid());
    }
    Ok(url)
}
