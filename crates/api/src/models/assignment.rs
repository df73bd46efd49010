//! Hotel assignment domain types.
//!
//! An assignment grants a user a [`HotelRole`] at one hotel. A user holds at
//! most one assignment per hotel.

use chrono::{DateTime, Utc};

use otelier_core::{AssignmentId, HotelId, HotelRole, UserId};

/// A user's role at a hotel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotelAssignment {
    pub id: AssignmentId,
    pub user_id: UserId,
    pub hotel_id: HotelId,
    pub role: HotelRole,
    /// The administrator who created the assignment.
    pub assigned_by: UserId,
    pub created_at: DateTime<Utc>,
}

/// Fields for an assignment about to be inserted.
#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub user_id: UserId,
    pub hotel_id: HotelId,
    pub role: HotelRole,
    pub assigned_by: UserId,
}

impl NewAssignment {
    /// Materialize the assignment with a fresh ID.
    #[must_use]
    pub fn into_assignment(self, created_at: DateTime<Utc>) -> HotelAssignment {
        HotelAssignment {
            id: AssignmentId::generate(),
            user_id: self.user_id,
            hotel_id: self.hotel_id,
            role: self.role,
            assigned_by: self.assigned_by,
            created_at,
        }
    }
}
