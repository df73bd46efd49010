//! Role types.
//!
//! Two kinds of role exist:
//! - [`HotelRole`] - the per-hotel role stored on a hotel assignment
//! - [`TokenRole`] - the global role carried by the caller's access token
//!
//! Both compare case-insensitively; values are normalized to lowercase.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role a user holds at one hotel.
///
/// Unknown role strings are preserved as [`HotelRole::Other`] so that an
/// assignment created with e.g. `"guest"` round-trips, but such roles never
/// satisfy a role check for the named variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HotelRole {
    /// Housekeeping and general staff.
    Staff,
    /// Front desk.
    Reception,
    /// Hotel manager.
    Admin,
    /// Any other role name (lowercased).
    Other(String),
}

impl HotelRole {
    /// Roles allowed to create bookings.
    pub const BOOKING_WRITERS: &'static [Self] = &[Self::Staff, Self::Reception, Self::Admin];

    /// Returns the canonical lowercase name of the role.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Staff => "staff",
            Self::Reception => "reception",
            Self::Admin => "admin",
            Self::Other(name) => name,
        }
    }

    /// Returns `true` if this role is one of `allowed`.
    #[must_use]
    pub fn is_one_of(&self, allowed: &[Self]) -> bool {
        allowed.contains(self)
    }
}

impl fmt::Display for HotelRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HotelRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "" => Err("role cannot be empty".to_string()),
            "staff" => Ok(Self::Staff),
            "reception" => Ok(Self::Reception),
            "admin" => Ok(Self::Admin),
            _ => Ok(Self::Other(normalized)),
        }
    }
}

impl TryFrom<String> for HotelRole {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HotelRole> for String {
    fn from(role: HotelRole) -> Self {
        role.as_str().to_string()
    }
}

/// Global role resolved from the caller's access token.
///
/// Defaults to `user` when the token carries no role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenRole(String);

impl TokenRole {
    /// Role assigned when a token carries none.
    pub const DEFAULT: &'static str = "user";

    /// The global administrator role.
    pub const ADMIN: &'static str = "admin";

    /// Create a token role, normalizing case. Blank input yields the default.
    #[must_use]
    pub fn new(role: &str) -> Self {
        let normalized = role.trim().to_lowercase();
        if normalized.is_empty() {
            Self::default()
        } else {
            Self(normalized)
        }
    }

    /// Returns the role name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the role matches `name`, ignoring case.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.0.eq_ignore_ascii_case(name)
    }

    /// Returns `true` if the role matches any of `names`, ignoring case.
    #[must_use]
    pub fn is_any(&self, names: &[&str]) -> bool {
        names.iter().any(|name| self.is(name))
    }

    /// Returns `true` for the global administrator role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.is(Self::ADMIN)
    }
}

impl Default for TokenRole {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for TokenRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hotel_role_parse_is_case_insensitive() {
        assert_eq!("Reception".parse::<HotelRole>().unwrap(), HotelRole::Reception);
        assert_eq!(" STAFF ".parse::<HotelRole>().unwrap(), HotelRole::Staff);
        assert_eq!("admin".parse::<HotelRole>().unwrap(), HotelRole::Admin);
    }

    #[test]
    fn test_hotel_role_keeps_unknown_names() {
        let role: HotelRole = "Guest".parse().unwrap();
        assert_eq!(role, HotelRole::Other("guest".to_string()));
        assert_eq!(role.to_string(), "guest");
        assert!(!role.is_one_of(HotelRole::BOOKING_WRITERS));
    }

    #[test]
    fn test_hotel_role_rejects_blank() {
        assert!("  ".parse::<HotelRole>().is_err());
    }

    #[test]
    fn test_hotel_role_serde() {
        let json = serde_json::to_string(&HotelRole::Reception).unwrap();
        assert_eq!(json, "\"reception\"");
        let parsed: HotelRole = serde_json::from_str("\"RECEPTION\"").unwrap();
        assert_eq!(parsed, HotelRole::Reception);
    }

    #[test]
    fn test_booking_writers() {
        assert!(HotelRole::Staff.is_one_of(HotelRole::BOOKING_WRITERS));
        assert!(HotelRole::Reception.is_one_of(HotelRole::BOOKING_WRITERS));
        assert!(HotelRole::Admin.is_one_of(HotelRole::BOOKING_WRITERS));
    }

    #[test]
    fn test_token_role_defaults_to_user() {
        assert_eq!(TokenRole::default().as_str(), "user");
        assert_eq!(TokenRole::new("").as_str(), "user");
    }

    #[test]
    fn test_token_role_matching() {
        let role = TokenRole::new("Admin");
        assert!(role.is_admin());
        assert!(role.is_any(&["staff", "ADMIN"]));
        assert!(!TokenRole::new("reception").is_admin());
    }
}
