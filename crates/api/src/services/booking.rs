//! Booking creation and listing.
//!
//! Creation runs its checks in a fixed order: required fields, date
//! ordering, past check-in, room conflicts. Only then is the booking stored
//! and the notification queued.

use chrono::{NaiveDate, Utc};
use tracing::{info, instrument, warn};

use otelier_core::{Email, HotelId, StayDates, UserId};

use super::notification::NotificationDispatcher;
use crate::clock::Clock;
use crate::db::{Repositories, RepositoryError};
use crate::error::AppError;
use crate::models::{Booking, BookingFilter, NewBooking};

/// Unvalidated booking input.
#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub guest_name: String,
    pub guest_email: String,
    pub room_number: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

fn room_taken(room_number: &str) -> AppError {
    AppError::Conflict(format!(
        "Room {room_number} is already booked for the selected dates"
    ))
}

fn required(value: &str, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_owned())
}

/// Booking operations over a storage backend.
#[derive(Debug, Clone)]
pub struct BookingService {
    repos: Repositories,
    notifications: NotificationDispatcher,
    clock: Clock,
}

impl BookingService {
    #[must_use]
    pub const fn new(
        repos: Repositories,
        notifications: NotificationDispatcher,
        clock: Clock,
    ) -> Self {
        Self {
            repos,
            notifications,
            clock,
        }
    }

    /// Validate and store a booking, then queue notifications.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for blank fields, a bad email, an empty or
    ///   reversed stay, or a check-in before today
    /// - [`AppError::Conflict`] if a confirmed booking of the room overlaps
    /// - [`AppError::NotFound`] if the hotel does not exist
    #[instrument(skip_all, fields(hotel_id = %hotel_id, room = %input.room_number, created_by = %created_by))]
    pub async fn create_booking(
        &self,
        hotel_id: HotelId,
        input: CreateBooking,
        created_by: &UserId,
    ) -> Result<Booking, AppError> {
        let guest_name = required(&input.guest_name, "Guest name")?;
        let room_number = required(&input.room_number, "Room number")?;
        let guest_email = Email::parse(&input.guest_email)?;

        let stay = StayDates::for_new_booking(input.check_in, input.check_out, self.clock.today())?;

        let conflicts = self
            .repos
            .bookings
            .find_conflicts(hotel_id, &room_number, &stay)
            .await?;
        if !conflicts.is_empty() {
            warn!(
                existing = conflicts.len(),
                check_in = %stay.check_in(),
                check_out = %stay.check_out(),
                "Room already booked"
            );
            return Err(room_taken(&room_number));
        }

        let booking = NewBooking {
            hotel_id,
            guest_name,
            guest_email,
            room_number,
            stay,
            created_by: created_by.clone(),
        }
        .into_booking(Utc::now());

        match self.repos.bookings.insert(&booking).await {
            Ok(()) => {}
            // A concurrent insert won the room
            Err(RepositoryError::Conflict(_)) => {
                warn!("Overlapping booking rejected by storage");
                return Err(room_taken(&booking.room_number));
            }
            Err(RepositoryError::NotFound) => {
                return Err(AppError::NotFound("Hotel not found".to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        info!(booking_id = %booking.id, nights = booking.stay.nights(), "Booking created");

        self.notifications.booking_created(&booking);

        Ok(booking)
    }

    /// List a hotel's bookings.
    ///
    /// Filters to stays inside `[start, end]` only when both bounds are given.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Database`] if the query fails.
    pub async fn list_bookings(
        &self,
        hotel_id: HotelId,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Booking>, AppError> {
        let filter = BookingFilter::from_bounds(start, end);
        Ok(self.repos.bookings.list(hotel_id, filter).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::NewHotel;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn clerk() -> UserId {
        UserId::parse("auth0|clerk").unwrap()
    }

    async fn setup() -> (BookingService, HotelId) {
        let repos = Repositories::memory(&MemoryStore::new());
        let hotel = NewHotel::new("Grand", "").unwrap().into_hotel(Utc::now());
        repos.hotels.insert(&hotel).await.unwrap();
        let service = BookingService::new(
            repos,
            NotificationDispatcher::disabled(),
            Clock::Fixed(d("2025-05-01")),
        );
        (service, hotel.id)
    }

    fn input(room: &str, check_in: &str, check_out: &str) -> CreateBooking {
        CreateBooking {
            guest_name: "Ada Lovelace".to_string(),
            guest_email: "ada@example.com".to_string(),
            room_number: room.to_string(),
            check_in: d(check_in),
            check_out: d(check_out),
        }
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let (service, hotel_id) = setup().await;
        let created = service
            .create_booking(hotel_id, input("101", "2025-06-01", "2025-06-05"), &clerk())
            .await
            .unwrap();
        assert_eq!(created.created_by, clerk());

        let listed = service.list_bookings(hotel_id, None, None).await.unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn test_overlap_and_touching_boundary_conflict() {
        let (service, hotel_id) = setup().await;
        service
            .create_booking(hotel_id, input("101", "2025-06-01", "2025-06-05"), &clerk())
            .await
            .unwrap();

        for (a, b) in [("2025-06-03", "2025-06-07"), ("2025-06-05", "2025-06-08")] {
            let err = service
                .create_booking(hotel_id, input("101", a, b), &clerk())
                .await
                .unwrap_err();
            assert_eq!(
                err.to_string(),
                "Room 101 is already booked for the selected dates"
            );
        }

        assert!(service
            .create_booking(hotel_id, input("102", "2025-06-03", "2025-06-07"), &clerk())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_date_validation_order() {
        let (service, hotel_id) = setup().await;

        let err = service
            .create_booking(hotel_id, input("101", "2025-06-05", "2025-06-05"), &clerk())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Check-out date must be after check-in date");

        let err = service
            .create_booking(hotel_id, input("101", "2025-04-20", "2025-04-22"), &clerk())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Check-in date cannot be in the past");

        // Check-in today is allowed
        assert!(service
            .create_booking(hotel_id, input("101", "2025-05-01", "2025-05-02"), &clerk())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_field_validation() {
        let (service, hotel_id) = setup().await;

        let mut blank_name = input("101", "2025-06-01", "2025-06-02");
        blank_name.guest_name = "  ".to_string();
        assert!(matches!(
            service.create_booking(hotel_id, blank_name, &clerk()).await,
            Err(AppError::Validation(_))
        ));

        let mut bad_email = input("101", "2025-06-01", "2025-06-02");
        bad_email.guest_email = "not-an-email".to_string();
        assert!(matches!(
            service.create_booking(hotel_id, bad_email, &clerk()).await,
            Err(AppError::Validation(_))
        ));

        let blank_room = input(" ", "2025-06-01", "2025-06-02");
        let err = service
            .create_booking(hotel_id, blank_room, &clerk())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Room number is required");
    }

    #[tokio::test]
    async fn test_unknown_hotel_is_not_found() {
        let (service, _) = setup().await;
        let err = service
            .create_booking(
                HotelId::generate(),
                input("101", "2025-06-01", "2025-06-02"),
                &clerk(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_filter_needs_both_bounds() {
        let (service, hotel_id) = setup().await;
        service
            .create_booking(hotel_id, input("101", "2025-06-01", "2025-06-05"), &clerk())
            .await
            .unwrap();
        service
            .create_booking(hotel_id, input("102", "2025-07-01", "2025-07-05"), &clerk())
            .await
            .unwrap();

        let june = service
            .list_bookings(hotel_id, Some(d("2025-06-01")), Some(d("2025-06-30")))
            .await
            .unwrap();
        assert_eq!(june.len(), 1);

        let start_only = service
            .list_bookings(hotel_id, Some(d("2025-06-01")), None)
            .await
            .unwrap();
        assert_eq!(start_only.len(), 2);
    }
}
