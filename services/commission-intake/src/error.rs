// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for the commission endpoint and their HTTP mapping.

use crate::metrics::Outcome;
use crate::relay::RelayError;
use crate::validator::FieldViolation;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

pub const MSG_SUBMITTED: &str = "Commission request submitted successfully";
pub const MSG_INVALID: &str = "Invalid request data";
pub const MSG_RATE_LIMITED: &str = "Too many requests. Please try again later.";
pub const MSG_RELAY_FAILED: &str = "Failed to process commission request";
pub const MSG_UNEXPECTED: &str = "An error occurred processing your request";

/// Ways a commission submission can end without success.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Invalid request data ({} violations)", .0.len())]
    Validation(Vec<FieldViolation>),

    #[error("Relay failed: {0}")]
    Relay(#[from] RelayError),

    #[error("Unexpected failure: {0}")]
    Unexpected(String),
}

impl IntakeError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Relay(_) | Self::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn outcome(&self) -> Outcome {
        match self {
            Self::RateLimited { .. } => Outcome::RateLimited,
            Self::Validation(_) => Outcome::Invalid,
            Self::Relay(_) => Outcome::RelayFailed,
            Self::Unexpected(_) => Outcome::Error,
        }
    }
}

/// JSON body returned for every response of the endpoint.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldViolation>>,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Self {
        Self {
            message,
            errors: None,
        }
    }
}

impl IntoResponse for IntakeError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::RateLimited { retry_after_secs } => (
                status,
                [(header::RETRY_AFTER, retry_after_secs.to_string())],
                Json(MessageResponse::new(MSG_RATE_LIMITED)),
            )
                .into_response(),
            Self::Validation(errors) => (
                status,
                Json(MessageResponse {
                    message: MSG_INVALID,
                    errors: Some(errors),
                }),
            )
                .into_response(),
            Self::Relay(err) => {
                warn!(error = %err, "Commission relay failed");
                (status, Json(MessageResponse::new(MSG_RELAY_FAILED))).into_response()
            }
            Self::Unexpected(detail) => {
                error!(error = %detail, "Commission API error");
                (status, Json(MessageResponse::new(MSG_UNEXPECTED))).into_response()
            }
        }
    }
}
