//! Legacy employee record.

use otelier_core::{HotelId, UserId};

/// Binds a user to exactly one hotel.
///
/// Only consulted by the `employee` access policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    /// The user ID (also the record's primary key).
    pub id: UserId,
    /// The hotel this employee works at.
    pub hotel_id: HotelId,
}
