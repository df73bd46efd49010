//! Booking domain types.

use chrono::{DateTime, NaiveDate, Utc};

use otelier_core::{BookingId, BookingStatus, Email, HotelId, StayDates, UserId};

/// A room booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub id: BookingId,
    pub hotel_id: HotelId,
    /// The user who owns the booking (the creator).
    pub user_id: UserId,
    pub guest_name: String,
    pub guest_email: Email,
    pub room_number: String,
    /// Validated check-in/check-out range.
    pub stay: StayDates,
    pub status: BookingStatus,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Returns `true` if this booking blocks `room_number` for `stay`.
    #[must_use]
    pub fn conflicts_with(&self, hotel_id: HotelId, room_number: &str, stay: &StayDates) -> bool {
        self.status.holds_room()
            && self.hotel_id == hotel_id
            && self.room_number == room_number
            && self.stay.overlaps(stay)
    }
}

/// A validated booking about to be inserted.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub hotel_id: HotelId,
    pub guest_name: String,
    pub guest_email: Email,
    pub room_number: String,
    pub stay: StayDates,
    pub created_by: UserId,
}

impl NewBooking {
    /// Materialize the booking as `CONFIRMED` with a fresh ID.
    #[must_use]
    pub fn into_booking(self, created_at: DateTime<Utc>) -> Booking {
        Booking {
            id: BookingId::generate(),
            hotel_id: self.hotel_id,
            user_id: self.created_by.clone(),
            guest_name: self.guest_name,
            guest_email: self.guest_email,
            room_number: self.room_number,
            stay: self.stay,
            status: BookingStatus::Confirmed,
            created_by: self.created_by,
            created_at,
        }
    }
}

/// Date window for listing a hotel's bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookingFilter {
    /// Every booking of the hotel.
    #[default]
    All,
    /// Bookings checking in on or after `start` and out on or before `end`.
    Within { start: NaiveDate, end: NaiveDate },
}

impl BookingFilter {
    /// Build a filter from optional query bounds.
    ///
    /// Both bounds must be present; a lone bound means no filtering.
    #[must_use]
    pub const fn from_bounds(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        match (start, end) {
            (Some(start), Some(end)) => Self::Within { start, end },
            _ => Self::All,
        }
    }

    /// Returns `true` if `booking` passes the filter.
    #[must_use]
    pub fn matches(&self, booking: &Booking) -> bool {
        match self {
            Self::All => true,
            Self::Within { start, end } => booking.stay.within(*start, *end),
        }
    }
}
