//! HTTP route handlers.
//!
//! # Route table
//!
//! | Method | Path                                  | Auth                      |
//! |--------|---------------------------------------|---------------------------|
//! | GET    | `/`                                   | none                      |
//! | GET    | `/health`                             | none                      |
//! | GET    | `/health/ready`                       | none                      |
//! | POST   | `/api/hotels`                         | global admin              |
//! | GET    | `/api/hotels/{hotel_id}/bookings`     | access to the hotel       |
//! | POST   | `/api/hotels/{hotel_id}/bookings`     | staff, reception or admin |
//! | GET    | `/api/hotel-assignments/my-hotels`    | any authenticated user    |
//! | POST   | `/api/hotel-assignments`              | global admin              |

pub mod assignments;
pub mod bookings;
pub mod extract;
pub mod health;
pub mod hotels;

use axum::Router;

use crate::state::AppState;

/// Build the combined router for every endpoint.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(hotels::router())
        .merge(bookings::router())
        .merge(assignments::router())
}
