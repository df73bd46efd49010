//! Source of "today" for date validation.

use chrono::{NaiveDate, Utc};

/// Application clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
    /// The system date in UTC.
    #[default]
    System,
    /// A pinned date.
    Fixed(NaiveDate),
}

impl Clock {
    /// The current date.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        match self {
            Self::System => Utc::now().date_naive(),
            Self::Fixed(date) => *date,
        }
    }
}
