//! Slack incoming webhook client.

use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error, instrument};

use super::error::SlackError;
use super::types::WebhookMessage;
use crate::config::SlackConfig;

/// Upper bound for one webhook request, connect included.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts messages to a Slack incoming webhook.
///
/// The webhook URL embeds its own credential and is never logged.
#[derive(Clone)]
pub struct SlackWebhook {
    /// HTTP client.
    client: Client,
    /// Incoming webhook URL.
    url: SecretString,
}

impl std::fmt::Debug for SlackWebhook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackWebhook")
            .field("url", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl SlackWebhook {
    /// Create a new webhook client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: &SlackConfig) -> Result<Self, SlackError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SlackError::Request(e.to_string()))?;
        Ok(Self::with_client(client, config.webhook_url.clone()))
    }

    /// Create a webhook client with an existing HTTP client.
    #[must_use]
    pub const fn with_client(client: Client, url: SecretString) -> Self {
        Self { client, url }
    }

    /// Post a message.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or Slack answers with a non-2xx status.
    #[instrument(skip_all)]
    pub async fn post(&self, message: &WebhookMessage) -> Result<(), SlackError> {
        let response = self
            .client
            .post(self.url.expose_secret())
            .json(message)
            .send()
            .await
            .map_err(|e| SlackError::Request(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body = %body, "Slack webhook rejected message");
            return Err(SlackError::Api {
                status: status.as_u16(),
                body,
            });
        }

        debug!("Message posted to Slack");
        Ok(())
    }
}
