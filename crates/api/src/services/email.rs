//! Email service for booking notifications.
//!
//! Uses SMTP via lettre for delivery with Askama templates.

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::EmailConfig;
use crate::models::Booking;

const BOOKING_CREATED_SUBJECT: &str = "New Hotel Booking Created";

/// Fields shown in the booking-created email.
struct BookingFields {
    hotel_id: String,
    guest_name: String,
    guest_email: String,
    room_number: String,
    check_in: String,
    check_out: String,
    status: String,
    created_by: String,
}

impl From<&Booking> for BookingFields {
    fn from(booking: &Booking) -> Self {
        Self {
            hotel_id: booking.hotel_id.to_string(),
            guest_name: booking.guest_name.clone(),
            guest_email: booking.guest_email.to_string(),
            room_number: booking.room_number.clone(),
            check_in: booking.stay.check_in().to_string(),
            check_out: booking.stay.check_out().to_string(),
            status: booking.status.to_string(),
            created_by: booking.created_by.to_string(),
        }
    }
}

/// HTML template for the booking-created email.
#[derive(Template)]
#[template(path = "email/booking_created.html")]
struct BookingCreatedEmailHtml<'a> {
    hotel_id: &'a str,
    guest_name: &'a str,
    guest_email: &'a str,
    room_number: &'a str,
    check_in: &'a str,
    check_out: &'a str,
    status: &'a str,
    created_by: &'a str,
}

/// Plain text template for the booking-created email.
#[derive(Template)]
#[template(path = "email/booking_created.txt")]
struct BookingCreatedEmailText<'a> {
    hotel_id: &'a str,
    guest_name: &'a str,
    guest_email: &'a str,
    room_number: &'a str,
    check_in: &'a str,
    check_out: &'a str,
    status: &'a str,
    created_by: &'a str,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Render the booking-created email as `(text, html)`.
///
/// # Errors
///
/// Returns error if a template fails to render.
pub fn render_booking_created(booking: &Booking) -> Result<(String, String), EmailError> {
    let f = BookingFields::from(booking);

    let text = BookingCreatedEmailText {
        hotel_id: &f.hotel_id,
        guest_name: &f.guest_name,
        guest_email: &f.guest_email,
        room_number: &f.room_number,
        check_in: &f.check_in,
        check_out: &f.check_out,
        status: &f.status,
        created_by: &f.created_by,
    }
    .render()?;

    let html = BookingCreatedEmailHtml {
        hotel_id: &f.hotel_id,
        guest_name: &f.guest_name,
        guest_email: &f.guest_email,
        room_number: &f.room_number,
        check_in: &f.check_in,
        check_out: &f.check_out,
        status: &f.status,
        created_by: &f.created_by,
    }
    .render()?;

    Ok((text, html))
}

/// Email service for sending booking notifications to the support inbox.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
    support_address: String,
}

impl std::fmt::Debug for EmailService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailService")
            .field("from_address", &self.from_address)
            .field("support_address", &self.support_address)
            .finish_non_exhaustive()
    }
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay cannot be configured.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
            support_address: config.support_address.clone(),
        })
    }

    /// Send the booking-created email to the support address.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or template fails to render.
    pub async fn send_booking_created(&self, booking: &Booking) -> Result<(), EmailError> {
        let (text, html) = render_booking_created(booking)?;

        self.send_multipart_email(&self.support_address, BOOKING_CREATED_SUBJECT, &text, &html)
            .await?;

        tracing::info!(booking_id = %booking.id, "Booking email sent");
        Ok(())
    }

    /// Send a multipart email with both plain text and HTML versions.
    async fn send_multipart_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), EmailError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )?;

        self.mailer.send(email).await?;

        tracing::info!(to = %to, subject = %subject, "Email sent successfully");
        Ok(())
    }
}
