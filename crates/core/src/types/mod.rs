//! Core types for Otelier.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod role;
pub mod status;
pub mod stay;

pub use email::{Email, EmailError};
pub use id::*;
pub use role::{HotelRole, TokenRole};
pub use status::BookingStatus;
pub use stay::{StayDates, StayError};
