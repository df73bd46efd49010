//! Request-scoped authentication context.

use otelier_core::{TokenRole, UserId};

/// A caller with a verified access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// The token's `sub` claim.
    pub user_id: UserId,
    /// Global role resolved from the token.
    pub role: TokenRole,
}

impl Principal {
    #[must_use]
    pub const fn new(user_id: UserId, role: TokenRole) -> Self {
        Self { user_id, role }
    }

    /// Returns `true` for the global administrator role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Identity attached to every request by the auth layer.
///
/// Inserted into request extensions; handlers read it through
/// [`crate::middleware::CurrentUser`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthContext {
    /// No token, or a token that failed verification.
    #[default]
    Anonymous,
    /// A verified caller.
    Authenticated(Principal),
}

impl AuthContext {
    /// Returns the principal, if authenticated.
    #[must_use]
    pub const fn principal(&self) -> Option<&Principal> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(principal) => Some(principal),
        }
    }
}
