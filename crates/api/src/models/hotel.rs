//! Hotel domain types.

use chrono::{DateTime, Utc};

use otelier_core::HotelId;

/// A hotel (tenant). Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hotel {
    /// Unique hotel ID.
    pub id: HotelId,
    /// Display name (never blank).
    pub name: String,
    /// Postal address, free-form.
    pub address: String,
    /// When the hotel was created.
    pub created_at: DateTime<Utc>,
}

/// Fields for a hotel about to be inserted.
#[derive(Debug, Clone)]
pub struct NewHotel {
    pub name: String,
    pub address: String,
}

impl NewHotel {
    /// Build a new hotel record, trimming both fields.
    ///
    /// Returns `None` if the name is blank.
    #[must_use]
    pub fn new(name: &str, address: &str) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_owned(),
            address: address.trim().to_owned(),
        })
    }

    /// Materialize the hotel with a fresh ID.
    #[must_use]
    pub fn into_hotel(self, created_at: DateTime<Utc>) -> Hotel {
        Hotel {
            id: HotelId::generate(),
            name: self.name,
            address: self.address,
            created_at,
        }
    }
}
