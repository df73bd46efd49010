//! Role claim strategies.
//!
//! Identity providers put the caller's role in different places. Auth0
//! rules often emit a flat `role`, Keycloak-style tokens carry a `roles`
//! list, and Supabase keeps it under `app_metadata.roles`. A
//! [`RoleClaimStrategy`] knows one such layout; [`RoleClaimMode`] picks
//! the strategy from configuration.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::{Map, Value};

use otelier_core::TokenRole;

/// Reads a role name out of decoded token claims.
pub trait RoleClaimStrategy: fmt::Debug + Send + Sync {
    /// Returns the raw role name, or `None` if this layout has no role.
    fn extract(&self, claims: &Map<String, Value>) -> Option<String>;

    /// Resolve the caller's role, defaulting to `user`.
    fn resolve(&self, claims: &Map<String, Value>) -> TokenRole {
        self.extract(claims)
            .map_or_else(TokenRole::default, |role| TokenRole::new(&role))
    }
}

/// A string, or the first string in a list. Blank values count as absent.
fn first_role(value: &Value) -> Option<String> {
    let role = match value {
        Value::String(s) => s.as_str(),
        Value::Array(items) => items.first()?.as_str()?,
        _ => return None,
    };
    let role = role.trim();
    (!role.is_empty()).then(|| role.to_owned())
}

/// Flat `role` claim, falling back to `user_role`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatRoleClaim;

impl RoleClaimStrategy for FlatRoleClaim {
    fn extract(&self, claims: &Map<String, Value>) -> Option<String> {
        ["role", "user_role"]
            .iter()
            .find_map(|key| claims.get(*key).and_then(first_role))
    }
}

/// First entry of the top-level `roles` list.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleListClaim;

impl RoleClaimStrategy for RoleListClaim {
    fn extract(&self, claims: &Map<String, Value>) -> Option<String> {
        claims.get("roles").and_then(first_role)
    }
}

/// First entry of `app_metadata.roles`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppMetadataRoles;

impl RoleClaimStrategy for AppMetadataRoles {
    fn extract(&self, claims: &Map<String, Value>) -> Option<String> {
        claims
            .get("app_metadata")?
            .as_object()?
            .get("roles")
            .and_then(first_role)
    }
}

/// Tries each strategy in order and takes the first role found.
#[derive(Debug)]
pub struct FirstMatch(Vec<Arc<dyn RoleClaimStrategy>>);

impl RoleClaimStrategy for FirstMatch {
    fn extract(&self, claims: &Map<String, Value>) -> Option<String> {
        self.0.iter().find_map(|strategy| strategy.extract(claims))
    }
}

/// Configured role claim layout (`JWT_ROLE_CLAIM`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoleClaimMode {
    /// `role`, then `roles`, then `app_metadata.roles`.
    #[default]
    Auto,
    Role,
    Roles,
    AppMetadata,
}

impl RoleClaimMode {
    /// Build the strategy for this mode.
    #[must_use]
    pub fn strategy(self) -> Arc<dyn RoleClaimStrategy> {
        match self {
            Self::Auto => Arc::new(FirstMatch(vec![
                Arc::new(FlatRoleClaim),
                Arc::new(RoleListClaim),
                Arc::new(AppMetadataRoles),
            ])),
            Self::Role => Arc::new(FlatRoleClaim),
            Self::Roles => Arc::new(RoleListClaim),
            Self::AppMetadata => Arc::new(AppMetadataRoles),
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Role => "role",
            Self::Roles => "roles",
            Self::AppMetadata => "app_metadata",
        }
    }
}

impl fmt::Display for RoleClaimMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleClaimMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "role" => Ok(Self::Role),
            "roles" => Ok(Self::Roles),
            "app_metadata" => Ok(Self::AppMetadata),
            other => Err(format!(
                "expected one of auto, role, roles, app_metadata; got '{other}'"
            )),
        }
    }
}
