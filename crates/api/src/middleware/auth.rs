//! Authentication middleware and extractors.
//!
//! [`authenticate`] runs on every request and stores an [`AuthContext`] in
//! the request extensions. Protected handlers take [`CurrentUser`], which
//! rejects anonymous callers; public handlers ignore the context.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::auth::{AuthContext, Principal, TokenError};
use crate::error::{AppError, set_sentry_user};
use crate::state::AppState;

/// Returns the bearer token, if the header carries one.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Resolve the caller from the `Authorization` header.
///
/// Verification failures are logged and the request continues anonymously.
pub async fn authenticate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let context = match bearer_token(req.headers()) {
        None => AuthContext::Anonymous,
        Some(token) => match state.verifier().verify(token) {
            Ok(principal) => {
                set_sentry_user(principal.user_id.as_str());
                tracing::debug!(
                    user_id = %principal.user_id,
                    role = %principal.role,
                    "Authenticated request"
                );
                AuthContext::Authenticated(principal)
            }
            Err(TokenError::Expired) => {
                tracing::debug!("Expired access token, continuing anonymously");
                AuthContext::Anonymous
            }
            Err(e) => {
                tracing::warn!(error = %e, "Rejected access token, continuing anonymously");
                AuthContext::Anonymous
            }
        },
    };

    req.extensions_mut().insert(context);
    next.run(req).await
}

/// Extractor that requires an authenticated caller.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     CurrentUser(principal): CurrentUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", principal.user_id)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Principal);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .and_then(AuthContext::principal)
            .cloned()
            .map(Self)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}
