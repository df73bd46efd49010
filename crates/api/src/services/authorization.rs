//! Hotel access and role checks.
//!
//! Under the default [`AccessPolicy::Assignment`] a caller reaches a hotel
//! only through a [`HotelAssignment`], and the assignment's role decides
//! what they may do there. [`AccessPolicy::Employee`] keeps the older
//! single-hotel model where staff are bound to one hotel by an employee
//! record and the token role is the only role.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use tracing::{info, instrument, warn};

use otelier_core::{HotelId, HotelRole, UserId};

use crate::auth::Principal;
use crate::db::{Repositories, RepositoryError};
use crate::error::AppError;
use crate::models::{Employee, HotelAssignment, NewAssignment};

const NO_HOTEL_ACCESS: &str = "You don't have access to this hotel";

/// Token roles bound to a single hotel under [`AccessPolicy::Employee`].
const EMPLOYEE_TOKEN_ROLES: &[&str] = &["staff", "reception", "employee"];

/// How hotel access is decided (`HOTEL_ACCESS_POLICY`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessPolicy {
    /// Per-hotel assignments with per-hotel roles.
    #[default]
    Assignment,
    /// Legacy employee records; token role governs.
    Employee,
}

impl fmt::Display for AccessPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Assignment => "assignment",
            Self::Employee => "employee",
        })
    }
}

impl FromStr for AccessPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "assignment" => Ok(Self::Assignment),
            "employee" => Ok(Self::Employee),
            other => Err(format!("expected 'assignment' or 'employee', got '{other}'")),
        }
    }
}

/// Why a caller was let into a hotel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HotelAccess {
    /// Through an assignment (default policy).
    Assigned(HotelAssignment),
    /// Through an employee record (legacy policy).
    Employee(Employee),
    /// Token role not bound to one hotel (legacy policy).
    Unbound,
}

impl HotelAccess {
    /// The assignment, when access came from one.
    #[must_use]
    pub const fn assignment(&self) -> Option<&HotelAssignment> {
        match self {
            Self::Assigned(assignment) => Some(assignment),
            Self::Employee(_) | Self::Unbound => None,
        }
    }
}

/// Hotel access and role checks over a storage backend.
#[derive(Debug, Clone)]
pub struct AuthorizationService {
    repos: Repositories,
    policy: AccessPolicy,
}

impl AuthorizationService {
    #[must_use]
    pub const fn new(repos: Repositories, policy: AccessPolicy) -> Self {
        Self { repos, policy }
    }

    /// Check that `principal` may access `hotel_id` at all.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] without access, and
    /// [`AppError::Database`] if the lookup fails.
    #[instrument(skip_all, fields(user_id = %principal.user_id, hotel_id = %hotel_id))]
    pub async fn check_hotel_access(
        &self,
        principal: &Principal,
        hotel_id: HotelId,
    ) -> Result<HotelAccess, AppError> {
        match self.policy {
            AccessPolicy::Assignment => self
                .find_assignment(principal, hotel_id)
                .await
                .map(HotelAccess::Assigned),
            AccessPolicy::Employee => self.check_employee_access(principal, hotel_id).await,
        }
    }

    /// Check that `principal` holds one of `allowed` at `hotel_id`.
    ///
    /// Roles compare case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] without access or with a role outside
    /// `allowed`; the message names the required roles and the caller's role.
    #[instrument(skip_all, fields(user_id = %principal.user_id, hotel_id = %hotel_id))]
    pub async fn check_hotel_role(
        &self,
        principal: &Principal,
        hotel_id: HotelId,
        allowed: &[HotelRole],
    ) -> Result<HotelAccess, AppError> {
        let access = self.check_hotel_access(principal, hotel_id).await?;

        let held = match &access {
            HotelAccess::Assigned(assignment) => assignment.role.as_str().to_owned(),
            HotelAccess::Employee(_) | HotelAccess::Unbound => {
                principal.role.as_str().to_owned()
            }
        };

        let permitted = match &access {
            HotelAccess::Assigned(assignment) => assignment.role.is_one_of(allowed),
            HotelAccess::Employee(_) | HotelAccess::Unbound => allowed
                .iter()
                .any(|role| principal.role.is(role.as_str())),
        };

        if permitted {
            return Ok(access);
        }

        warn!(role = %held, "Insufficient hotel role");
        let required: Vec<&str> = allowed.iter().map(HotelRole::as_str).collect();
        Err(AppError::Forbidden(format!(
            "Insufficient permissions. Required: {}. Your role: {held}",
            required.join(" or ")
        )))
    }

    /// List the hotels `user_id` is assigned to.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Database`] if the query fails.
    pub async fn user_hotels(&self, user_id: &UserId) -> Result<Vec<HotelAssignment>, AppError> {
        Ok(self.repos.assignments.list_for_user(user_id).await?)
    }

    /// Assign `user_id` to `hotel_id` with `role`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the user is already assigned to the
    /// hotel and [`AppError::NotFound`] if the hotel does not exist.
    #[instrument(skip_all, fields(assigned_by = %assigned_by, user_id = %user_id, hotel_id = %hotel_id, role = %role))]
    pub async fn assign_user(
        &self,
        assigned_by: &UserId,
        user_id: UserId,
        hotel_id: HotelId,
        role: HotelRole,
    ) -> Result<HotelAssignment, AppError> {
        if self.repos.assignments.find(&user_id, hotel_id).await?.is_some() {
            return Err(AppError::Conflict(
                "User already assigned to this hotel".to_string(),
            ));
        }

        if self.repos.hotels.get(hotel_id).await?.is_none() {
            return Err(AppError::NotFound("Hotel does not exist".to_string()));
        }

        let assignment = NewAssignment {
            user_id,
            hotel_id,
            role,
            assigned_by: assigned_by.clone(),
        }
        .into_assignment(Utc::now());

        match self.repos.assignments.insert(&assignment).await {
            Ok(()) => {}
            // Lost a race with a concurrent assignment
            Err(RepositoryError::Conflict(_)) => {
                return Err(AppError::Conflict(
                    "User already assigned to this hotel".to_string(),
                ));
            }
            Err(RepositoryError::NotFound) => {
                return Err(AppError::NotFound("Hotel does not exist".to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        info!(assignment_id = %assignment.id, "User assigned to hotel");
        Ok(assignment)
    }

    /// Require the global `admin` token role.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] for any other role.
    pub fn require_admin(principal: &Principal) -> Result<(), AppError> {
        if principal.is_admin() {
            Ok(())
        } else {
            warn!(user_id = %principal.user_id, role = %principal.role, "Admin access denied");
            Err(AppError::Forbidden("Admin access required".to_string()))
        }
    }

    async fn find_assignment(
        &self,
        principal: &Principal,
        hotel_id: HotelId,
    ) -> Result<HotelAssignment, AppError> {
        self.repos
            .assignments
            .find(&principal.user_id, hotel_id)
            .await?
            .ok_or_else(|| {
                warn!("User attempted to access hotel without assignment");
                AppError::Forbidden(NO_HOTEL_ACCESS.to_string())
            })
    }

    async fn check_employee_access(
        &self,
        principal: &Principal,
        hotel_id: HotelId,
    ) -> Result<HotelAccess, AppError> {
        // Only hotel-bound token roles are restricted
        if !principal.role.is_any(EMPLOYEE_TOKEN_ROLES) {
            return Ok(HotelAccess::Unbound);
        }

        let employee = self
            .repos
            .employees
            .get(&principal.user_id)
            .await?
            .ok_or_else(|| {
                warn!("Employee record not found");
                AppError::Forbidden(format!(
                    "Employee record not found for user: {}",
                    principal.user_id
                ))
            })?;

        if employee.hotel_id != hotel_id {
            warn!(employee_hotel = %employee.hotel_id, "Employee tried to access another hotel");
            return Err(AppError::Forbidden(
                "You are not authorized to access this hotel's bookings".to_string(),
            ));
        }

        Ok(HotelAccess::Employee(employee))
    }
}
