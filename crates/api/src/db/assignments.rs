//! Hotel assignment repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use otelier_core::{AssignmentId, HotelId, HotelRole, UserId};

use super::RepositoryError;
use crate::models::HotelAssignment;

/// Hotel assignment storage operations.
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// Insert an assignment.
    ///
    /// Fails with [`RepositoryError::Conflict`] if the user is already
    /// assigned to the hotel.
    async fn insert(&self, assignment: &HotelAssignment) -> Result<(), RepositoryError>;

    /// Find the assignment of `user_id` at `hotel_id`.
    async fn find(
        &self,
        user_id: &UserId,
        hotel_id: HotelId,
    ) -> Result<Option<HotelAssignment>, RepositoryError>;

    /// List every assignment of `user_id`, oldest first.
    async fn list_for_user(&self, user_id: &UserId)
    -> Result<Vec<HotelAssignment>, RepositoryError>;
}

#[derive(Debug, sqlx::FromRow)]
struct AssignmentRow {
    id: Uuid,
    user_id: String,
    hotel_id: Uuid,
    role: String,
    assigned_by: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<AssignmentRow> for HotelAssignment {
    type Error = RepositoryError;

    fn try_from(row: AssignmentRow) -> Result<Self, Self::Error> {
        let user_id = UserId::parse(&row.user_id).ok_or_else(|| {
            RepositoryError::DataCorruption("blank user_id in hotel_assignment".to_string())
        })?;
        let assigned_by = UserId::parse(&row.assigned_by).ok_or_else(|| {
            RepositoryError::DataCorruption("blank assigned_by in hotel_assignment".to_string())
        })?;
        let role: HotelRole = row.role.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid role in database: {e}"))
        })?;

        Ok(Self {
            id: AssignmentId::new(row.id),
            user_id,
            hotel_id: HotelId::new(row.hotel_id),
            role,
            assigned_by,
            created_at: row.created_at,
        })
    }
}

/// `PostgreSQL` hotel assignment repository.
#[derive(Debug, Clone)]
pub struct PgAssignmentRepository {
    pool: PgPool,
}

impl PgAssignmentRepository {
    /// Create a new assignment repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssignmentRepository for PgAssignmentRepository {
    async fn insert(&self, assignment: &HotelAssignment) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO otelier.hotel_assignment
                (id, user_id, hotel_id, role, assigned_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(assignment.id)
        .bind(&assignment.user_id)
        .bind(assignment.hotel_id)
        .bind(assignment.role.as_str())
        .bind(&assignment.assigned_by)
        .bind(assignment.created_at)
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from_insert)?;

        Ok(())
    }

    async fn find(
        &self,
        user_id: &UserId,
        hotel_id: HotelId,
    ) -> Result<Option<HotelAssignment>, RepositoryError> {
        let row = sqlx::query_as::<_, AssignmentRow>(
            r"
            SELECT id, user_id, hotel_id, role, assigned_by, created_at
            FROM otelier.hotel_assignment
            WHERE user_id = $1 AND hotel_id = $2
            ",
        )
        .bind(user_id)
        .bind(hotel_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<HotelAssignment>, RepositoryError> {
        let rows = sqlx::query_as::<_, AssignmentRow>(
            r"
            SELECT id, user_id, hotel_id, role, assigned_by, created_at
            FROM otelier.hotel_assignment
            WHERE user_id = $1
            ORDER BY created_at
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}
