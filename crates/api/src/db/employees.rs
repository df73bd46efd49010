//! Employee repository (legacy access policy).

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use otelier_core::{HotelId, UserId};

use super::RepositoryError;
use crate::models::Employee;

/// Employee storage operations.
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Insert an employee record. A user can only work at one hotel.
    async fn insert(&self, employee: &Employee) -> Result<(), RepositoryError>;

    /// Get the employee record for a user.
    async fn get(&self, user_id: &UserId) -> Result<Option<Employee>, RepositoryError>;
}

#[derive(Debug, sqlx::FromRow)]
struct EmployeeRow {
    id: String,
    hotel_id: Uuid,
}

impl TryFrom<EmployeeRow> for Employee {
    type Error = RepositoryError;

    fn try_from(row: EmployeeRow) -> Result<Self, Self::Error> {
        let id = UserId::parse(&row.id).ok_or_else(|| {
            RepositoryError::DataCorruption("blank employee id in database".to_string())
        })?;

        Ok(Self {
            id,
            hotel_id: HotelId::new(row.hotel_id),
        })
    }
}

/// `PostgreSQL` employee repository.
#[derive(Debug, Clone)]
pub struct PgEmployeeRepository {
    pool: PgPool,
}

impl PgEmployeeRepository {
    /// Create a new employee repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeRepository for PgEmployeeRepository {
    async fn insert(&self, employee: &Employee) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO otelier.employee (id, hotel_id) VALUES ($1, $2)")
            .bind(&employee.id)
            .bind(employee.hotel_id)
            .execute(&self.pool)
            .await
            .map_err(RepositoryError::from_insert)?;

        Ok(())
    }

    async fn get(&self, user_id: &UserId) -> Result<Option<Employee>, RepositoryError> {
        let row = sqlx::query_as::<_, EmployeeRow>(
            "SELECT id, hotel_id FROM otelier.employee WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }
}
