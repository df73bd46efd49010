//! Hotel assignment endpoints.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use otelier_core::{AssignmentId, HotelId, HotelRole, UserId};

use super::extract::ApiJson;
use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::models::HotelAssignment;
use crate::services::AuthorizationService;
use crate::state::AppState;

/// Build the assignments router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/hotel-assignments", post(create_assignment))
        .route("/api/hotel-assignments/my-hotels", get(my_hotels))
}

/// Request body for assigning a user to a hotel.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignmentRequest {
    pub user_id: String,
    pub hotel_id: HotelId,
    pub role: String,
}

/// An assignment as returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentResponse {
    pub id: AssignmentId,
    pub user_id: UserId,
    pub hotel_id: HotelId,
    pub role: HotelRole,
    pub assigned_by: UserId,
    pub created_at: DateTime<Utc>,
}

impl From<HotelAssignment> for AssignmentResponse {
    fn from(a: HotelAssignment) -> Self {
        Self {
            id: a.id,
            user_id: a.user_id,
            hotel_id: a.hotel_id,
            role: a.role,
            assigned_by: a.assigned_by,
            created_at: a.created_at,
        }
    }
}

/// List the caller's hotel assignments.
///
/// # Errors
///
/// Returns 401 if anonymous.
pub async fn my_hotels(
    CurrentUser(principal): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<AssignmentResponse>>, AppError> {
    let assignments = state.authorization().user_hotels(&principal.user_id).await?;
    Ok(Json(assignments.into_iter().map(Into::into).collect()))
}

/// Assign a user to a hotel. Global admins only.
///
/// # Errors
///
/// Returns 403 for non-admins, 400 for blank fields, 404 for an unknown
/// hotel and 409 if the user is already assigned.
pub async fn create_assignment(
    CurrentUser(principal): CurrentUser,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateAssignmentRequest>,
) -> Result<(StatusCode, Json<AssignmentResponse>), AppError> {
    AuthorizationService::require_admin(&principal)?;

    let user_id = UserId::parse(&body.user_id)
        .ok_or_else(|| AppError::Validation("userId is required".to_string()))?;
    let role: HotelRole = body.role.parse().map_err(AppError::Validation)?;

    let assignment = state
        .authorization()
        .assign_user(&principal.user_id, user_id, body.hotel_id, role)
        .await?;

    Ok((StatusCode::CREATED, Json(assignment.into())))
}
