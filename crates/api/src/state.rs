//! Application state shared across handlers.

use std::sync::Arc;

use crate::auth::JwtVerifier;
use crate::clock::Clock;
use crate::config::JwtConfig;
use crate::db::Repositories;
use crate::services::{AccessPolicy, AuthorizationService, BookingService, NotificationDispatcher};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// storage backend, the token verifier and the services built on them.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    repos: Repositories,
    verifier: JwtVerifier,
    authorization: AuthorizationService,
    bookings: BookingService,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `jwt` - Access token settings
    /// * `policy` - Hotel access policy
    /// * `repos` - Storage backend
    /// * `notifications` - Booking notification queue
    /// * `clock` - Source of today's date
    #[must_use]
    pub fn new(
        jwt: &JwtConfig,
        policy: AccessPolicy,
        repos: Repositories,
        notifications: NotificationDispatcher,
        clock: Clock,
    ) -> Self {
        let authorization = AuthorizationService::new(repos.clone(), policy);
        let bookings = BookingService::new(repos.clone(), notifications, clock);

        Self {
            inner: Arc::new(AppStateInner {
                repos,
                verifier: JwtVerifier::new(jwt),
                authorization,
                bookings,
            }),
        }
    }

    /// Get a reference to the storage backend.
    #[must_use]
    pub fn repos(&self) -> &Repositories {
        &self.inner.repos
    }

    /// Get a reference to the access token verifier.
    #[must_use]
    pub fn verifier(&self) -> &JwtVerifier {
        &self.inner.verifier
    }

    /// Get a reference to the authorization service.
    #[must_use]
    pub fn authorization(&self) -> &AuthorizationService {
        &self.inner.authorization
    }

    /// Get a reference to the booking service.
    #[must_use]
    pub fn bookings(&self) -> &BookingService {
        &self.inner.bookings
    }
}
