//! Stay date ranges and the room overlap rule.
//!
//! A stay is the closed range `[check_in, check_out]`. Two stays of the same
//! room conflict when their closed ranges intersect, so a guest checking out
//! on day X and another checking in on day X are treated as overlapping.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Errors raised when validating stay dates.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StayError {
    /// Check-out is on or before check-in.
    #[error("Check-out date must be after check-in date")]
    CheckOutNotAfterCheckIn,
    /// Check-in is before today.
    #[error("Check-in date cannot be in the past")]
    CheckInInPast,
}

/// A validated stay: `check_out` is strictly after `check_in`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawStay")]
pub struct StayDates {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

#[derive(Deserialize)]
struct RawStay {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl TryFrom<RawStay> for StayDates {
    type Error = StayError;

    fn try_from(raw: RawStay) -> Result<Self, Self::Error> {
        Self::new(raw.check_in, raw.check_out)
    }
}

impl StayDates {
    /// Create a stay.
    ///
    /// # Errors
    ///
    /// Returns [`StayError::CheckOutNotAfterCheckIn`] if `check_out <= check_in`.
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self, StayError> {
        if check_out <= check_in {
            return Err(StayError::CheckOutNotAfterCheckIn);
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    /// Create a stay for a new booking, which must also not start before `today`.
    ///
    /// The ordering check runs first, so a reversed range in the past reports
    /// the ordering error.
    ///
    /// # Errors
    ///
    /// Returns [`StayError::CheckOutNotAfterCheckIn`] or [`StayError::CheckInInPast`].
    pub fn for_new_booking(
        check_in: NaiveDate,
        check_out: NaiveDate,
        today: NaiveDate,
    ) -> Result<Self, StayError> {
        let stay = Self::new(check_in, check_out)?;
        if stay.check_in < today {
            return Err(StayError::CheckInInPast);
        }
        Ok(stay)
    }

    /// First night of the stay.
    #[must_use]
    pub const fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    /// Departure day.
    #[must_use]
    pub const fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    /// Number of nights.
    #[must_use]
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Closed-range intersection. Touching endpoints overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.check_in <= other.check_out && self.check_out >= other.check_in
    }

    /// Returns `true` if this stay lies entirely inside `[start, end]`.
    ///
    /// This is the booking list filter: check-in on or after `start` and
    /// check-out on or before `end`.
    #[must_use]
    pub fn within(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.check_in >= start && self.check_out <= end
    }
}
