// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Webhook relay for accepted commission requests.
//!
//! Formats a request as a single chat embed and posts it once to the
//! configured webhook. There is no retry or queue; the caller learns whether
//! the sink accepted the message and nothing more.

use crate::config::RelayConfig;
use crate::validator::{Choice, CommissionRequest};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// Embed accent colour.
pub const EMBED_COLOR: u32 = 0x5865F2;

/// Maximum length of one embed field value accepted by the sink.
pub const FIELD_VALUE_LIMIT: usize = 1024;

const EMBED_TITLE: &str = "🎹 New Keyboard Commission Request";

/// Relay delivery errors.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("HTTP client setup failed: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Webhook request timed out")]
    Timeout,

    #[error("Webhook request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Webhook rejected message with status {0}")]
    Status(u16),
}

/// Webhook request body.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookPayload {
    pub embeds: Vec<Embed>,
}

/// One rich embed.
#[derive(Debug, Clone, Serialize)]
pub struct Embed {
    pub title: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    pub timestamp: String,
}

/// Labelled block of text inside an embed.
#[derive(Debug, Clone, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    fn section(name: &str, value: String) -> Self {
        Self {
            name: name.to_string(),
            value: truncate(value, FIELD_VALUE_LIMIT),
            inline: false,
        }
    }
}

/// Build the webhook message for a request.
pub fn build_payload(request: &CommissionRequest, timestamp: DateTime<Utc>) -> WebhookPayload {
    let mut fields = vec![
        EmbedField::section(
            "👤 Personal Information",
            format!(
                "**Name:** {}\n**Country:** {}\n**Email:** {}\n**Discord:** {}",
                request.name, request.country, request.email, request.discord_username
            ),
        ),
        EmbedField::section(
            "⌨️ Keyboard Specifications",
            format!(
                "**Kit Name:** {}\n**Layout:** {}\n**Plate:** {}\n**Stabilizers:** {}\n**Switches:** {}",
                request.keyboard_kit_name,
                request.layout,
                request.plate_choice,
                request.stabilizers,
                request.switches
            ),
        ),
        EmbedField::section(
            "🔧 Services",
            format!(
                "**Lubing:** {}\n**Providing Keycaps:** {}\n**Return Shipping Insurance:** {}",
                request.switches_lubing.label(),
                request.providing_keycaps.label(),
                request.return_shipping_insurance.label()
            ),
        ),
    ];

    if let Some(notes) = request.additional_notes.as_deref().filter(|n| !n.is_empty()) {
        fields.push(EmbedField::section("📝 Additional Notes", notes.to_string()));
    }

    WebhookPayload {
        embeds: vec![Embed {
            title: EMBED_TITLE.to_string(),
            color: EMBED_COLOR,
            fields,
            timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        }],
    }
}

/// Cut `value` to at most `limit` characters, marking the cut with an ellipsis.
fn truncate(value: String, limit: usize) -> String {
    if value.chars().count() <= limit {
        return value;
    }
    let mut cut: String = value.chars().take(limit.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

/// Posts commission requests to a fixed webhook.
#[derive(Clone)]
pub struct WebhookRelay {
    client: reqwest::Client,
    webhook_url: Url,
}

impl WebhookRelay {
    /// Create a relay for the configured destination.
    pub fn new(config: &RelayConfig) -> Result<Self, RelayError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("commission-intake/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(RelayError::Client)?;

        Ok(Self {
            client,
            webhook_url: config.webhook_url.clone(),
        })
    }

    /// Deliver one request. Succeeds only on a 2xx answer from the sink.
    pub async fn deliver(&self, request: &CommissionRequest) -> Result<(), RelayError> {
        let payload = build_payload(request, Utc::now());

        let response = self
            .client
            .post(self.webhook_url.clone())
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                // The webhook URL carries its token; never let it reach logs.
                let e = e.without_url();
                if e.is_timeout() {
                    RelayError::Timeout
                } else {
                    RelayError::Transport(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Webhook rejected commission message");
            return Err(RelayError::Status(status.as_u16()));
        }

        debug!(status = status.as_u16(), "Commission message delivered");
        Ok(())
    }
}
