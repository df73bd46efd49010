//! Slack-related errors.

use thiserror::Error;

/// Errors that can occur when posting to a Slack webhook.
#[derive(Debug, Error)]
pub enum SlackError {
    /// HTTP request failed.
    #[error("Slack request failed: {0}")]
    Request(String),

    /// Slack rejected the message.
    #[error("Slack webhook error ({status}): {body}")]
    Api { status: u16, body: String },
}
