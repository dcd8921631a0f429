//! Outbound delivery through the Fonnte WhatsApp relay.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use tracing::{info, warn};

use crate::config::RelayConfig;
use crate::error::NotifyError;

/// Delivers a rendered reminder and returns the relay's raw JSON reply.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &str) -> Result<serde_json::Value, NotifyError>;
}

/// Fonnte `send` endpoint client.
pub struct FonnteNotifier {
    config: RelayConfig,
    client: reqwest::Client,
}

impl FonnteNotifier {
    pub fn new(config: RelayConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }
}

#[async_trait]
impl Notifier for FonnteNotifier {
    async fn send(&self, message: &str) -> Result<serde_json::Value, NotifyError> {
        let form = [
            ("target", self.config.target.as_str()),
            ("message", message),
            ("countryCode", self.config.country_code.as_str()),
        ];

        let resp = self
            .client
            .post(&self.config.api_url)
            .header(reqwest::header::AUTHORIZATION, self.config.token.expose_secret())
            .form(&form)
            .send()
            .await
            .map_err(|e| NotifyError::Request(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Relay returned non-success status");
        }

        // The relay reports its own failures in the body; it is passed on as-is.
        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| NotifyError::InvalidResponse(e.to_string()))?;

        if body.get("status").and_then(|s| s.as_bool()) == Some(false) {
            warn!(
                reason = %body.get("reason").map(|r| r.to_string()).unwrap_or_default(),
                "Relay accepted the request but reported a failure"
            );
        } else {
            info!(destination = %self.config.target, "Reminder handed to relay");
        }

        Ok(body)
    }
}
