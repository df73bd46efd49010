//! Slack incoming-webhook notifications.
//!
//! This module provides:
//! - [`SlackWebhook`] for posting messages to one channel's webhook
//! - Block Kit types for building rich messages
//! - The new-booking message builder

mod client;
mod error;
mod messages;
mod types;

pub use client::SlackWebhook;
pub use error::SlackError;
pub use messages::build_booking_created_message;
pub use types::{Block, ContextElement, PlainText, Text, WebhookMessage};
