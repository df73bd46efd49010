//! Hotel repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use otelier_core::HotelId;

use super::RepositoryError;
use crate::models::Hotel;

/// Hotel storage operations.
#[async_trait]
pub trait HotelRepository: Send + Sync {
    /// Insert a new hotel.
    async fn insert(&self, hotel: &Hotel) -> Result<(), RepositoryError>;

    /// Get a hotel by ID.
    async fn get(&self, id: HotelId) -> Result<Option<Hotel>, RepositoryError>;
}

// =============================================================================
// PostgreSQL
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct HotelRow {
    id: Uuid,
    name: String,
    address: String,
    created_at: DateTime<Utc>,
}

impl From<HotelRow> for Hotel {
    fn from(row: HotelRow) -> Self {
        Self {
            id: HotelId::new(row.id),
            name: row.name,
            address: row.address,
            created_at: row.created_at,
        }
    }
}

/// `PostgreSQL` hotel repository.
#[derive(Debug, Clone)]
pub struct PgHotelRepository {
    pool: PgPool,
}

impl PgHotelRepository {
    /// Create a new hotel repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HotelRepository for PgHotelRepository {
    async fn insert(&self, hotel: &Hotel) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO otelier.hotel (id, name, address, created_at)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(hotel.id)
        .bind(&hotel.name)
        .bind(&hotel.address)
        .bind(hotel.created_at)
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from_insert)?;

        Ok(())
    }

    async fn get(&self, id: HotelId) -> Result<Option<Hotel>, RepositoryError> {
        let row = sqlx::query_as::<_, HotelRow>(
            r"
            SELECT id, name, address, created_at
            FROM otelier.hotel
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }
}
