//! Storage for hotels, assignments, bookings and employees.
//!
//! # Database: `PostgreSQL`, schema `otelier`
//!
//! ## Tables
//!
//! - `hotel` - Tenants, immutable after creation
//! - `employee` - Legacy single-hotel staff records
//! - `hotel_assignment` - Per-hotel user roles, unique per `(user_id, hotel_id)`
//! - `booking` - Room bookings; an exclusion constraint rejects overlapping
//!   `CONFIRMED` stays of the same room
//!
//! # Backends
//!
//! Each table sits behind a repository trait so handlers and services work
//! against either [`Repositories::postgres`] or the process-local
//! [`MemoryStore`].
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p otelier-cli -- migrate
//! ```

pub mod assignments;
pub mod bookings;
pub mod employees;
pub mod hotels;
pub mod memory;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use assignments::{AssignmentRepository, PgAssignmentRepository};
pub use bookings::{BookingRepository, PgBookingRepository};
pub use employees::{EmployeeRepository, PgEmployeeRepository};
pub use hotels::{HotelRepository, PgHotelRepository};
pub use memory::MemoryStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity (or a referenced parent) was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (duplicate assignment, overlapping stay).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Classify an error raised by an `INSERT`.
    ///
    /// Unique (`23505`) and exclusion (`23P01`) violations become
    /// [`RepositoryError::Conflict`]; foreign key violations (`23503`) become
    /// [`RepositoryError::NotFound`].
    pub(crate) fn from_insert(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.code().as_deref() {
                Some("23505" | "23P01") => {
                    let constraint = db_err.constraint().unwrap_or("unknown").to_string();
                    return Self::Conflict(constraint);
                }
                Some("23503") => return Self::NotFound,
                _ => {}
            }
        }
        Self::Database(err)
    }
}

/// Storage liveness probe used by the readiness endpoint.
#[async_trait]
pub trait StorageHealth: Send + Sync {
    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

#[async_trait]
impl StorageHealth for PgPool {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(self).await?;
        Ok(())
    }
}

/// The repositories of one storage backend.
///
/// Cheap to clone; every field is reference counted.
#[derive(Clone)]
pub struct Repositories {
    pub hotels: Arc<dyn HotelRepository>,
    pub assignments: Arc<dyn AssignmentRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub employees: Arc<dyn EmployeeRepository>,
    health: Arc<dyn StorageHealth>,
}

impl Repositories {
    /// Repositories backed by a `PostgreSQL` pool.
    #[must_use]
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            hotels: Arc::new(PgHotelRepository::new(pool.clone())),
            assignments: Arc::new(PgAssignmentRepository::new(pool.clone())),
            bookings: Arc::new(PgBookingRepository::new(pool.clone())),
            employees: Arc::new(PgEmployeeRepository::new(pool.clone())),
            health: Arc::new(pool),
        }
    }

    /// Repositories backed by a shared in-memory store.
    #[must_use]
    pub fn memory(store: &MemoryStore) -> Self {
        Self {
            hotels: Arc::new(store.clone()),
            assignments: Arc::new(store.clone()),
            bookings: Arc::new(store.clone()),
            employees: Arc::new(store.clone()),
            health: Arc::new(store.clone()),
        }
    }

    /// Check that the backend is reachable.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if it cannot be reached.
    pub async fn ping(&self) -> Result<(), RepositoryError> {
        self.health.ping().await
    }
}

impl std::fmt::Debug for Repositories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repositories").finish_non_exhaustive()
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
