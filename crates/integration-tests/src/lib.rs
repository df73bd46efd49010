//! Integration tests for Otelier.
//!
//! Tests drive the full router (authentication middleware, extractors,
//! services) in process over the in-memory store. No database or network
//! is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p otelier-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use chrono::{NaiveDate, Utc};
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

use otelier_api::auth::{RoleClaimMode, TokenIssuer};
use otelier_api::clock::Clock;
use otelier_api::config::JwtConfig;
use otelier_api::db::{MemoryStore, Repositories};
use otelier_api::models::{Employee, NewAssignment, NewHotel};
use otelier_api::services::{AccessPolicy, NotificationDispatcher};
use otelier_api::state::AppState;
use otelier_core::{HotelId, HotelRole, UserId};

/// Signing secret shared by the test issuer and verifier.
pub const TEST_SECRET: &str = "q8Vt2LmZ4rXc9NbK7wPy3HsJ6dFgA1eU";

/// Issuer claim the test verifier expects.
pub const TEST_ISSUER: &str = "https://auth.otelier.test/";

/// "Today" for every test app.
pub const TODAY: &str = "2025-05-01";

/// JWT settings used by [`TestApp`].
#[must_use]
pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: SecretString::from(TEST_SECRET),
        issuer: TEST_ISSUER.to_string(),
        audience: None,
        role_claim: RoleClaimMode::Auto,
    }
}

/// Parse a `YYYY-MM-DD` date.
#[must_use]
pub fn date(s: &str) -> NaiveDate {
    s.parse().expect("valid date")
}

/// A user ID from a literal.
#[must_use]
pub fn user(s: &str) -> UserId {
    UserId::parse(s).expect("non-blank user id")
}

/// The router plus direct access to its storage.
pub struct TestApp {
    router: Router,
    repos: Repositories,
    issuer: TokenIssuer,
}

impl TestApp {
    /// Assignment policy, no notification channels.
    #[must_use]
    pub fn new() -> Self {
        Self::with(AccessPolicy::Assignment, NotificationDispatcher::disabled())
    }

    /// Custom access policy and notification dispatcher.
    #[must_use]
    pub fn with(policy: AccessPolicy, notifications: NotificationDispatcher) -> Self {
        let repos = Repositories::memory(&MemoryStore::new());
        let jwt = jwt_config();
        let state = AppState::new(
            &jwt,
            policy,
            repos.clone(),
            notifications,
            Clock::Fixed(date(TODAY)),
        );

        Self {
            router: otelier_api::app(state),
            repos,
            issuer: TokenIssuer::new(&jwt),
        }
    }

    /// A valid one-hour token for `sub`.
    #[must_use]
    pub fn token(&self, sub: &str, role: Option<&str>) -> String {
        self.issuer.issue(sub, role, 3600).expect("token encodes")
    }

    /// A token that expired an hour ago.
    #[must_use]
    pub fn expired_token(&self, sub: &str) -> String {
        self.issuer.issue(sub, None, -3600).expect("token encodes")
    }

    /// Storage shared with the router.
    #[must_use]
    pub const fn repos(&self) -> &Repositories {
        &self.repos
    }

    /// Send a request and return the status and JSON body (`Null` if empty).
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request builds");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, json)
    }

    /// Insert a hotel directly.
    pub async fn seed_hotel(&self, name: &str) -> HotelId {
        let hotel = NewHotel::new(name, "1 Test Street")
            .expect("non-blank name")
            .into_hotel(Utc::now());
        self.repos.hotels.insert(&hotel).await.expect("hotel inserts");
        hotel.id
    }

    /// Assign `user_id` to `hotel_id` directly.
    pub async fn seed_assignment(&self, user_id: &str, hotel_id: HotelId, role: &str) {
        let assignment = NewAssignment {
            user_id: user(user_id),
            hotel_id,
            role: role.parse().unwrap_or(HotelRole::Staff),
            assigned_by: user("seed"),
        }
        .into_assignment(Utc::now());
        self.repos
            .assignments
            .insert(&assignment)
            .await
            .expect("assignment inserts");
    }

    /// Bind `user_id` to `hotel_id` through an employee record.
    pub async fn seed_employee(&self, user_id: &str, hotel_id: HotelId) {
        let employee = Employee {
            id: user(user_id),
            hotel_id,
        };
        self.repos
            .employees
            .insert(&employee)
            .await
            .expect("employee inserts");
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// A booking request body.
#[must_use]
pub fn booking_body(room: &str, check_in: &str, check_out: &str) -> Value {
    serde_json::json!({
        "guestName": "Grace Hopper",
        "guestEmail": "grace@example.com",
        "roomNumber": room,
        "checkInDate": check_in,
        "checkOutDate": check_out,
    })
}
