//! Hotel endpoints.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::post,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use otelier_core::HotelId;

use super::extract::ApiJson;
use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::models::{Hotel, NewHotel};
use crate::services::AuthorizationService;
use crate::state::AppState;

/// Build the hotels router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/hotels", post(create_hotel))
}

/// Request body for creating a hotel.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHotelRequest {
    pub name: String,
    #[serde(default)]
    pub address: String,
}

/// A hotel as returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelResponse {
    pub id: HotelId,
    pub name: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

impl From<Hotel> for HotelResponse {
    fn from(hotel: Hotel) -> Self {
        Self {
            id: hotel.id,
            name: hotel.name,
            address: hotel.address,
            created_at: hotel.created_at,
        }
    }
}

/// Create a hotel. Global admins only.
///
/// # Errors
///
/// Returns 403 for non-admins and 400 for a blank name.
pub async fn create_hotel(
    CurrentUser(principal): CurrentUser,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateHotelRequest>,
) -> Result<(StatusCode, Json<HotelResponse>), AppError> {
    AuthorizationService::require_admin(&principal)?;

    let hotel = NewHotel::new(&body.name, &body.address)
        .ok_or_else(|| AppError::Validation("Hotel name is required".to_string()))?
        .into_hotel(Utc::now());

    state.repos().hotels.insert(&hotel).await?;
    tracing::info!(hotel_id = %hotel.id, created_by = %principal.user_id, "Hotel created");

    Ok((StatusCode::CREATED, Json(hotel.into())))
}
