//! Business logic services.

pub mod authorization;
pub mod booking;
pub mod email;
pub mod notification;

pub use authorization::{AccessPolicy, AuthorizationService, HotelAccess};
pub use booking::{BookingService, CreateBooking};
pub use email::{EmailError, EmailService};
pub use notification::{NotificationDispatcher, Notifier, NotifyError};
