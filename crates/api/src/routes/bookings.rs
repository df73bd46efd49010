//! Booking endpoints, scoped to one hotel.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use otelier_core::{BookingId, BookingStatus, Email, HotelId, HotelRole};

use super::extract::{ApiJson, ApiPath, ApiQuery};
use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::models::Booking;
use crate::services::CreateBooking;
use crate::state::AppState;

/// Build the bookings router.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/hotels/{hotel_id}/bookings",
        get(list_bookings).post(create_booking),
    )
}

/// Optional date window for listing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBookingsQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Request body for creating a booking.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub guest_name: String,
    pub guest_email: String,
    pub room_number: String,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
}

impl From<CreateBookingRequest> for CreateBooking {
    fn from(body: CreateBookingRequest) -> Self {
        Self {
            guest_name: body.guest_name,
            guest_email: body.guest_email,
            room_number: body.room_number,
            check_in: body.check_in_date,
            check_out: body.check_out_date,
        }
    }
}

/// A booking as returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: BookingId,
    pub hotel_id: HotelId,
    pub guest_name: String,
    pub guest_email: Email,
    pub room_number: String,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            hotel_id: b.hotel_id,
            guest_name: b.guest_name,
            guest_email: b.guest_email,
            room_number: b.room_number,
            check_in_date: b.stay.check_in(),
            check_out_date: b.stay.check_out(),
            status: b.status,
            created_at: b.created_at,
        }
    }
}

/// List a hotel's bookings.
///
/// Any role with access to the hotel may list. `startDate` and `endDate`
/// filter only when both are present.
///
/// # Errors
///
/// Returns 401 if anonymous and 403 without access to the hotel.
pub async fn list_bookings(
    CurrentUser(principal): CurrentUser,
    State(state): State<AppState>,
    ApiPath(hotel_id): ApiPath<HotelId>,
    ApiQuery(query): ApiQuery<ListBookingsQuery>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    state
        .authorization()
        .check_hotel_access(&principal, hotel_id)
        .await?;

    let bookings = state
        .bookings()
        .list_bookings(hotel_id, query.start_date, query.end_date)
        .await?;

    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}

/// Create a booking.
///
/// Requires a staff, reception or admin assignment at the hotel.
///
/// # Errors
///
/// Returns 400 for invalid input, 403 without a writer role and 409 when
/// the room is already booked for an overlapping stay.
pub async fn create_booking(
    CurrentUser(principal): CurrentUser,
    State(state): State<AppState>,
    ApiPath(hotel_id): ApiPath<HotelId>,
    ApiJson(body): ApiJson<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    state
        .authorization()
        .check_hotel_role(&principal, hotel_id, HotelRole::BOOKING_WRITERS)
        .await?;

    let booking = state
        .bookings()
        .create_booking(hotel_id, body.into(), &principal.user_id)
        .await?;

    Ok((StatusCode::CREATED, Json(booking.into())))
}
