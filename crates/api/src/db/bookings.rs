//! Booking repository and the room conflict query.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use otelier_core::{BookingId, BookingStatus, Email, HotelId, StayDates, UserId};

use super::RepositoryError;
use crate::models::{Booking, BookingFilter};

/// Booking storage operations.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Find `CONFIRMED` bookings of `room_number` whose closed date range
    /// intersects `stay`.
    async fn find_conflicts(
        &self,
        hotel_id: HotelId,
        room_number: &str,
        stay: &StayDates,
    ) -> Result<Vec<Booking>, RepositoryError>;

    /// Insert a booking.
    ///
    /// Fails with [`RepositoryError::Conflict`] if a `CONFIRMED` booking of
    /// the same room overlaps it, and [`RepositoryError::NotFound`] if the
    /// hotel does not exist.
    async fn insert(&self, booking: &Booking) -> Result<(), RepositoryError>;

    /// List a hotel's bookings by check-in date, then creation time.
    async fn list(
        &self,
        hotel_id: HotelId,
        filter: BookingFilter,
    ) -> Result<Vec<Booking>, RepositoryError>;
}

#[derive(Debug, sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    hotel_id: Uuid,
    user_id: String,
    guest_name: String,
    guest_email: String,
    room_number: String,
    check_in_date: NaiveDate,
    check_out_date: NaiveDate,
    status: String,
    created_by: String,
    created_at: DateTime<Utc>,
}

fn corrupt(field: &str, err: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::DataCorruption(format!("invalid {field} in database: {err}"))
}

impl TryFrom<BookingRow> for Booking {
    type Error = RepositoryError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let user_id = UserId::parse(&row.user_id).ok_or_else(|| corrupt("user_id", "blank"))?;
        let created_by =
            UserId::parse(&row.created_by).ok_or_else(|| corrupt("created_by", "blank"))?;
        let guest_email = Email::parse(&row.guest_email).map_err(|e| corrupt("guest_email", e))?;
        let stay = StayDates::new(row.check_in_date, row.check_out_date)
            .map_err(|e| corrupt("stay dates", e))?;
        let status: BookingStatus = row.status.parse().map_err(|e| corrupt("status", e))?;

        Ok(Self {
            id: BookingId::new(row.id),
            hotel_id: HotelId::new(row.hotel_id),
            user_id,
            guest_name: row.guest_name,
            guest_email,
            room_number: row.room_number,
            stay,
            status,
            created_by,
            created_at: row.created_at,
        })
    }
}

const BOOKING_COLUMNS: &str = "id, hotel_id, user_id, guest_name, guest_email, room_number, \
     check_in_date, check_out_date, status, created_by, created_at";

/// `PostgreSQL` booking repository.
#[derive(Debug, Clone)]
pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    /// Create a new booking repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn find_conflicts(
        &self,
        hotel_id: HotelId,
        room_number: &str,
        stay: &StayDates,
    ) -> Result<Vec<Booking>, RepositoryError> {
        let sql = format!(
            r"
            SELECT {BOOKING_COLUMNS}
            FROM otelier.booking
            WHERE hotel_id = $1
              AND room_number = $2
              AND status = $3
              AND check_in_date <= $4
              AND check_out_date >= $5
            ORDER BY check_in_date
            "
        );

        let rows = sqlx::query_as::<_, BookingRow>(&sql)
            .bind(hotel_id)
            .bind(room_number)
            .bind(BookingStatus::Confirmed.as_str())
            .bind(stay.check_out())
            .bind(stay.check_in())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn insert(&self, booking: &Booking) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO otelier.booking
                (id, hotel_id, user_id, guest_name, guest_email, room_number,
                 check_in_date, check_out_date, status, created_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ",
        )
        .bind(booking.id)
        .bind(booking.hotel_id)
        .bind(&booking.user_id)
        .bind(&booking.guest_name)
        .bind(&booking.guest_email)
        .bind(&booking.room_number)
        .bind(booking.stay.check_in())
        .bind(booking.stay.check_out())
        .bind(booking.status.as_str())
        .bind(&booking.created_by)
        .bind(booking.created_at)
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from_insert)?;

        Ok(())
    }

    async fn list(
        &self,
        hotel_id: HotelId,
        filter: BookingFilter,
    ) -> Result<Vec<Booking>, RepositoryError> {
        let rows = match filter {
            BookingFilter::All => {
                let sql = format!(
                    r"
                    SELECT {BOOKING_COLUMNS}
                    FROM otelier.booking
                    WHERE hotel_id = $1
                    ORDER BY check_in_date, created_at
                    "
                );
                sqlx::query_as::<_, BookingRow>(&sql)
                    .bind(hotel_id)
                    .fetch_all(&self.pool)
                    .await?
            }
            BookingFilter::Within { start, end } => {
                let sql = format!(
                    r"
                    SELECT {BOOKING_COLUMNS}
                    FROM otelier.booking
                    WHERE hotel_id = $1
                      AND check_in_date >= $2
                      AND check_out_date <= $3
                    ORDER BY check_in_date, created_at
                    "
                );
                sqlx::query_as::<_, BookingRow>(&sql)
                    .bind(hotel_id)
                    .bind(start)
                    .bind(end)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        rows.into_iter().map(TryInto::try_into).collect()
    }
}
