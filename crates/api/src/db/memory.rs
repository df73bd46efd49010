//! Process-local storage backend.
//!
//! Used by tests and by `OTELIER_STORAGE=memory` for local development.
//! It enforces the same constraints as the `PostgreSQL` schema: unique
//! assignments per `(user, hotel)`, hotel foreign keys, and no overlapping
//! `CONFIRMED` stays of one room. The overlap check and the insert happen
//! under one write lock.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use otelier_core::{HotelId, StayDates, UserId};

use super::{
    AssignmentRepository, BookingRepository, EmployeeRepository, HotelRepository, RepositoryError,
    StorageHealth,
};
use crate::models::{Booking, BookingFilter, Employee, Hotel, HotelAssignment};

#[derive(Debug, Default)]
struct Tables {
    hotels: HashMap<HotelId, Hotel>,
    employees: HashMap<UserId, Employee>,
    assignments: Vec<HotelAssignment>,
    bookings: Vec<Booking>,
}

/// In-memory store implementing every repository trait.
///
/// Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageHealth for MemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[async_trait]
impl HotelRepository for MemoryStore {
    async fn insert(&self, hotel: &Hotel) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.hotels.contains_key(&hotel.id) {
            return Err(RepositoryError::Conflict("hotel_pkey".to_string()));
        }
        tables.hotels.insert(hotel.id, hotel.clone());
        Ok(())
    }

    async fn get(&self, id: HotelId) -> Result<Option<Hotel>, RepositoryError> {
        Ok(self.tables.read().await.hotels.get(&id).cloned())
    }
}

#[async_trait]
impl EmployeeRepository for MemoryStore {
    async fn insert(&self, employee: &Employee) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.hotels.contains_key(&employee.hotel_id) {
            return Err(RepositoryError::NotFound);
        }
        if tables.employees.contains_key(&employee.id) {
            return Err(RepositoryError::Conflict("employee_pkey".to_string()));
        }
        tables.employees.insert(employee.id.clone(), employee.clone());
        Ok(())
    }

    async fn get(&self, user_id: &UserId) -> Result<Option<Employee>, RepositoryError> {
        Ok(self.tables.read().await.employees.get(user_id).cloned())
    }
}

#[async_trait]
impl AssignmentRepository for MemoryStore {
    async fn insert(&self, assignment: &HotelAssignment) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.hotels.contains_key(&assignment.hotel_id) {
            return Err(RepositoryError::NotFound);
        }
        let duplicate = tables
            .assignments
            .iter()
            .any(|a| a.user_id == assignment.user_id && a.hotel_id == assignment.hotel_id);
        if duplicate {
            return Err(RepositoryError::Conflict(
                "hotel_assignment_user_hotel_key".to_string(),
            ));
        }
        tables.assignments.push(assignment.clone());
        Ok(())
    }

    async fn find(
        &self,
        user_id: &UserId,
        hotel_id: HotelId,
    ) -> Result<Option<HotelAssignment>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .assignments
            .iter()
            .find(|a| &a.user_id == user_id && a.hotel_id == hotel_id)
            .cloned())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<HotelAssignment>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .assignments
            .iter()
            .filter(|a| &a.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn find_conflicts(
        &self,
        hotel_id: HotelId,
        room_number: &str,
        stay: &StayDates,
    ) -> Result<Vec<Booking>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .bookings
            .iter()
            .filter(|b| b.conflicts_with(hotel_id, room_number, stay))
            .cloned()
            .collect())
    }

    async fn insert(&self, booking: &Booking) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.hotels.contains_key(&booking.hotel_id) {
            return Err(RepositoryError::NotFound);
        }
        if booking.status.holds_room() {
            let overlapping = tables
                .bookings
                .iter()
                .any(|b| b.conflicts_with(booking.hotel_id, &booking.room_number, &booking.stay));
            if overlapping {
                return Err(RepositoryError::Conflict(
                    "booking_room_no_overlap".to_string(),
                ));
            }
        }
        tables.bookings.push(booking.clone());
        Ok(())
    }

    async fn list(
        &self,
        hotel_id: HotelId,
        filter: BookingFilter,
    ) -> Result<Vec<Booking>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut bookings: Vec<Booking> = tables
            .bookings
            .iter()
            .filter(|b| b.hotel_id == hotel_id && filter.matches(b))
            .cloned()
            .collect();
        bookings.sort_by_key(|b| (b.stay.check_in(), b.created_at));
        Ok(bookings)
    }
}
