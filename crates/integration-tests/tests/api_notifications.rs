//! Integration tests for booking notifications.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::http::{Method, StatusCode};

use otelier_api::config::NotificationConfig;
use otelier_api::models::Booking;
use otelier_api::services::{AccessPolicy, NotificationDispatcher, Notifier, NotifyError};
use otelier_integration_tests::{TestApp, booking_body};

/// Always fails; counts attempts.
#[derive(Default)]
struct Broken {
    attempts: AtomicU32,
}

#[async_trait]
impl Notifier for Broken {
    fn channel(&self) -> &'static str {
        "broken"
    }

    async fn booking_created(&self, _booking: &Booking) -> Result<(), NotifyError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(NotifyError::Other("webhook unreachable".to_string()))
    }
}

/// Accepts the job and never answers, like a webhook that stops responding.
#[derive(Default)]
struct Unresponsive {
    attempts: AtomicU32,
}

#[async_trait]
impl Notifier for Unresponsive {
    fn channel(&self) -> &'static str {
        "unresponsive"
    }

    async fn booking_created(&self, _booking: &Booking) -> Result<(), NotifyError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }
}

/// Records the room of each delivered booking.
#[derive(Default)]
struct Recorder {
    rooms: std::sync::Mutex<Vec<String>>,
}

#[async_trait]
impl Notifier for Recorder {
    fn channel(&self) -> &'static str {
        "recorder"
    }

    async fn booking_created(&self, booking: &Booking) -> Result<(), NotifyError> {
        self.rooms
            .lock()
            .map_err(|e| NotifyError::Other(e.to_string()))?
            .push(booking.room_number.clone());
        Ok(())
    }
}

fn config() -> NotificationConfig {
    NotificationConfig {
        queue_capacity: 16,
        max_attempts: 3,
        base_backoff: Duration::from_millis(1),
        attempt_timeout: Duration::from_millis(100),
    }
}

#[tokio::test]
async fn test_failing_channel_does_not_affect_response() {
    let broken = Arc::new(Broken::default());
    let recorder = Arc::new(Recorder::default());
    let (dispatcher, worker) = NotificationDispatcher::spawn(
        vec![broken.clone() as Arc<dyn Notifier>, recorder.clone()],
        config(),
    );
    let app = TestApp::with(AccessPolicy::Assignment, dispatcher);
    let hotel = app.seed_hotel("Harbour View").await;
    app.seed_assignment("auth0|desk", hotel, "staff").await;
    let token = app.token("auth0|desk", None);

    let (status, body) = app
        .request(
            Method::POST,
            &format!("/api/hotels/{hotel}/bookings"),
            Some(&token),
            Some(booking_body("301", "2025-06-01", "2025-06-04")),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["roomNumber"], "301");

    // Dropping the app closes the queue; the worker drains and exits
    drop(app);
    tokio::time::timeout(Duration::from_secs(5), worker.expect("worker spawned"))
        .await
        .expect("worker drains")
        .expect("worker does not panic");

    assert_eq!(broken.attempts.load(Ordering::SeqCst), 3);
    assert_eq!(
        *recorder.rooms.lock().expect("lock"),
        vec!["301".to_string()]
    );
}

#[tokio::test]
async fn test_unresponsive_channel_does_not_stall_later_jobs() {
    let unresponsive = Arc::new(Unresponsive::default());
    let recorder = Arc::new(Recorder::default());
    let (dispatcher, worker) = NotificationDispatcher::spawn(
        vec![unresponsive.clone() as Arc<dyn Notifier>, recorder.clone()],
        config(),
    );
    let app = TestApp::with(AccessPolicy::Assignment, dispatcher);
    let hotel = app.seed_hotel("Harbour View").await;
    app.seed_assignment("auth0|desk", hotel, "staff").await;
    let token = app.token("auth0|desk", None);

    for room in ["301", "302"] {
        let (status, _) = app
            .request(
                Method::POST,
                &format!("/api/hotels/{hotel}/bookings"),
                Some(&token),
                Some(booking_body(room, "2025-06-01", "2025-06-04")),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    drop(app);
    tokio::time::timeout(Duration::from_secs(10), worker.expect("worker spawned"))
        .await
        .expect("worker drains")
        .expect("worker does not panic");

    assert_eq!(unresponsive.attempts.load(Ordering::SeqCst), 6);
    assert_eq!(
        *recorder.rooms.lock().expect("lock"),
        vec!["301".to_string(), "302".to_string()]
    );
}

#[tokio::test]
async fn test_rejected_booking_sends_nothing() {
    let recorder = Arc::new(Recorder::default());
    let (dispatcher, worker) =
        NotificationDispatcher::spawn(vec![recorder.clone() as Arc<dyn Notifier>], config());
    let app = TestApp::with(AccessPolicy::Assignment, dispatcher);
    let hotel = app.seed_hotel("Harbour View").await;
    app.seed_assignment("auth0|desk", hotel, "staff").await;
    let token = app.token("auth0|desk", None);

    let (status, _) = app
        .request(
            Method::POST,
            &format!("/api/hotels/{hotel}/bookings"),
            Some(&token),
            Some(booking_body("301", "2025-06-04", "2025-06-01")),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    drop(app);
    tokio::time::timeout(Duration::from_secs(5), worker.expect("worker spawned"))
        .await
        .expect("worker drains")
        .expect("worker does not panic");

    assert!(recorder.rooms.lock().expect("lock").is_empty());
}
