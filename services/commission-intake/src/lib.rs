// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Commission Intake
//!
//! Backend for the keyboard commission form:
//!
//! - Field-level validation of the submitted request
//! - Per-IP fixed-window rate limiting (3 per hour default)
//! - Relay of accepted requests to a chat webhook as a single embed
//! - Structured JSON responses that never leak internal detail

pub mod config;
pub mod error;
pub mod handlers;
pub mod limiter;
pub mod metrics;
pub mod relay;
pub mod validator;

pub use config::Config;
pub use error::IntakeError;
pub use handlers::{router, AppState};
pub use limiter::{RateLimitResult, RateLimiter};
pub use relay::WebhookRelay;
pub use validator::{validate, CommissionRequest, FieldViolation};
