//! Status enums for various entities.

use serde::{Deserialize, Serialize};

/// Booking lifecycle status.
///
/// Only `Confirmed` bookings take part in room conflict detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    #[default]
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    /// Returns the stored representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Returns `true` if a booking in this status holds its room.
    #[must_use]
    pub const fn holds_room(&self) -> bool {
        matches!(self, Self::Confirmed)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CONFIRMED" => Ok(Self::Confirmed),
            "CANCELLED" => Ok(Self::Cancelled),
            _ => Err(format!("invalid booking status: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_confirmed() {
        assert_eq!(BookingStatus::default(), BookingStatus::Confirmed);
    }

    #[test]
    fn test_only_confirmed_holds_room() {
        assert!(BookingStatus::Confirmed.holds_room());
        assert!(!BookingStatus::Cancelled.holds_room());
    }

    #[test]
    fn test_serde_uses_screaming_case() {
        let json = serde_json::to_string(&BookingStatus::Confirmed).unwrap();
        assert_eq!(json, "\"CONFIRMED\"");
    }

    #[test]
    fn test_from_str_matches_display() {
        for status in [BookingStatus::Confirmed, BookingStatus::Cancelled] {
            assert_eq!(status.to_string().parse::<BookingStatus>().unwrap(), status);
        }
        assert!("confirmed".parse::<BookingStatus>().is_err());
    }
}
