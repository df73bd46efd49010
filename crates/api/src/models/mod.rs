//! Domain models for the booking API.
//!
//! These are validated domain objects. Database row types live in
//! [`crate::db`]; JSON request and response bodies live next to their
//! handlers in [`crate::routes`].

pub mod assignment;
pub mod booking;
pub mod employee;
pub mod hotel;

pub use assignment::{HotelAssignment, NewAssignment};
pub use booking::{Booking, BookingFilter, NewBooking};
pub use employee::Employee;
pub use hotel::{Hotel, NewHotel};
