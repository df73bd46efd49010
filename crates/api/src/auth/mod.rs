//! Bearer token authentication.
//!
//! - [`JwtVerifier`] checks HS256 access tokens and builds a [`Principal`]
//! - [`TokenIssuer`] mints tokens for the CLI and tests
//! - [`RoleClaimStrategy`] implementations read the role claim
//! - [`AuthContext`] carries the result through the request

mod claims;
mod context;
mod token;

pub use claims::{
    AppMetadataRoles, FirstMatch, FlatRoleClaim, RoleClaimMode, RoleClaimStrategy, RoleListClaim,
};
pub use context::{AuthContext, Principal};
pub use token::{JwtVerifier, TokenClaims, TokenError, TokenIssuer};
