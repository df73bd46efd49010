//! Development access tokens.
//!
//! Signs with `JWT_SECRET` and `JWT_ISSUER`, the same settings the API
//! verifies with. The token is printed to stdout.

use otelier_api::auth::{TokenError, TokenIssuer};
use otelier_api::config::{ConfigError, JwtConfig};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenCommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Issue and print a token for `sub`.
pub fn issue(sub: &str, role: Option<&str>, ttl_secs: i64) -> Result<(), TokenCommandError> {
    let config = JwtConfig::load()?;
    let token = TokenIssuer::new(&config).issue(sub, role, ttl_secs)?;

    tracing::info!(sub, role = role.unwrap_or("-"), ttl_secs, "Token issued");

    #[allow(clippy::print_stdout)]
    {
        println!("{token}");
    }
    Ok(())
}
