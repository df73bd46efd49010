//! Message builders for booking notifications.

use super::types::{Block, ContextElement, PlainText, Text, WebhookMessage};
use crate::models::Booking;

/// Escape `&`, `<` and `>` so caller text cannot form mrkdwn links or mentions.
fn escape_mrkdwn(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Build the "New Booking Created" message.
///
/// Caller-supplied fields are escaped; Slack renders `text` as mrkdwn too.
#[must_use]
pub fn build_booking_created_message(booking: &Booking) -> WebhookMessage {
    let guest_name = escape_mrkdwn(&booking.guest_name);
    let guest_email = escape_mrkdwn(booking.guest_email.as_str());
    let room_number = escape_mrkdwn(&booking.room_number);
    let created_by = escape_mrkdwn(booking.created_by.as_str());

    let text = format!(
        ":hotel: *New Booking Created*\n\
         Hotel ID: {}\n\
         Guest: {} ({})\n\
         Room: {}\n\
         Check-in: {}\n\
         Check-out: {}\n\
         Status: {}",
        booking.hotel_id,
        guest_name,
        guest_email,
        room_number,
        booking.stay.check_in(),
        booking.stay.check_out(),
        booking.status,
    );

    let blocks = vec![
        Block::Header {
            text: PlainText::new(":hotel: New Booking Created"),
        },
        Block::Section {
            text: Some(Text::mrkdwn(format!(
                "*Guest:* {guest_name} ({guest_email})"
            ))),
            fields: vec![
                Text::mrkdwn(format!("*Room:*\n{room_number}")),
                Text::mrkdwn(format!("*Status:*\n{}", booking.status)),
                Text::mrkdwn(format!("*Check-in:*\n{}", booking.stay.check_in())),
                Text::mrkdwn(format!("*Check-out:*\n{}", booking.stay.check_out())),
            ],
        },
        Block::Divider,
        Block::Context {
            elements: vec![ContextElement::Mrkdwn {
                text: format!(
                    "Hotel `{}` | Booking `{}` | Created by {created_by}",
                    booking.hotel_id, booking.id
                ),
            }],
        },
    ];

    WebhookMessage { text, blocks }
}
