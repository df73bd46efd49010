//! Integration tests for the booking endpoints.

use axum::http::{Method, StatusCode};
use serde_json::Value;

use otelier_integration_tests::{TestApp, booking_body};

fn bookings_uri(hotel_id: impl std::fmt::Display) -> String {
    format!("/api/hotels/{hotel_id}/bookings")
}

async fn create(app: &TestApp, token: &str, hotel: &str, body: Value) -> (StatusCode, Value) {
    app.request(Method::POST, hotel, Some(token), Some(body)).await
}

// =============================================================================
// Create & List
// =============================================================================

#[tokio::test]
async fn test_create_then_list_returns_booking() {
    let app = TestApp::new();
    let hotel = app.seed_hotel("Harbour View").await;
    app.seed_assignment("auth0|desk", hotel, "reception").await;
    let token = app.token("auth0|desk", None);
    let uri = bookings_uri(hotel);

    let (status, created) =
        create(&app, &token, &uri, booking_body("101", "2025-06-01", "2025-06-05")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["hotelId"], hotel.to_string());
    assert_eq!(created["roomNumber"], "101");
    assert_eq!(created["guestEmail"], "grace@example.com");
    assert_eq!(created["checkInDate"], "2025-06-01");
    assert_eq!(created["checkOutDate"], "2025-06-05");
    assert_eq!(created["status"], "CONFIRMED");
    assert!(created["id"].is_string());
    assert!(created["createdAt"].is_string());

    let (status, listed) = app.request(Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let listed = listed.as_array().expect("array body");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed.first().map(|b| &b["id"]), Some(&created["id"]));
}

#[tokio::test]
async fn test_list_is_scoped_to_hotel() {
    let app = TestApp::new();
    let north = app.seed_hotel("North").await;
    let south = app.seed_hotel("South").await;
    app.seed_assignment("auth0|both", north, "staff").await;
    app.seed_assignment("auth0|both", south, "staff").await;
    let token = app.token("auth0|both", None);

    let (status, _) = create(
        &app,
        &token,
        &bookings_uri(north),
        booking_body("1", "2025-06-01", "2025-06-02"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, south_list) = app
        .request(Method::GET, &bookings_uri(south), Some(&token), None)
        .await;
    assert_eq!(south_list, Value::Array(vec![]));
}

#[tokio::test]
async fn test_list_filter_applies_only_with_both_bounds() {
    let app = TestApp::new();
    let hotel = app.seed_hotel("Harbour View").await;
    app.seed_assignment("auth0|desk", hotel, "staff").await;
    let token = app.token("auth0|desk", None);
    let uri = bookings_uri(hotel);

    for (room, a, b) in [
        ("101", "2025-06-01", "2025-06-05"),
        ("102", "2025-07-10", "2025-07-12"),
    ] {
        let (status, _) = create(&app, &token, &uri, booking_body(room, a, b)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, june) = app
        .request(
            Method::GET,
            &format!("{uri}?startDate=2025-06-01&endDate=2025-06-30"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(june.as_array().map(Vec::len), Some(1));

    let (_, start_only) = app
        .request(
            Method::GET,
            &format!("{uri}?startDate=2025-06-01"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(start_only.as_array().map(Vec::len), Some(2));
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn test_reversed_or_equal_dates_rejected() {
    let app = TestApp::new();
    let hotel = app.seed_hotel("Harbour View").await;
    app.seed_assignment("auth0|desk", hotel, "staff").await;
    let token = app.token("auth0|desk", None);
    let uri = bookings_uri(hotel);

    for (a, b) in [("2025-06-05", "2025-06-01"), ("2025-06-05", "2025-06-05")] {
        let (status, body) = create(&app, &token, &uri, booking_body("101", a, b)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Check-out date must be after check-in date");
    }
}

#[tokio::test]
async fn test_past_check_in_rejected() {
    let app = TestApp::new();
    let hotel = app.seed_hotel("Harbour View").await;
    app.seed_assignment("auth0|desk", hotel, "staff").await;
    let token = app.token("auth0|desk", None);

    let (status, body) = create(
        &app,
        &token,
        &bookings_uri(hotel),
        booking_body("101", "2025-04-28", "2025-05-02"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Check-in date cannot be in the past");
}

#[tokio::test]
async fn test_malformed_body_is_bad_request_with_error_field() {
    let app = TestApp::new();
    let hotel = app.seed_hotel("Harbour View").await;
    app.seed_assignment("auth0|desk", hotel, "staff").await;
    let token = app.token("auth0|desk", None);

    let (status, body) = create(
        &app,
        &token,
        &bookings_uri(hotel),
        serde_json::json!({ "guestName": "No Dates" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_invalid_hotel_id_is_bad_request() {
    let app = TestApp::new();
    let token = app.token("auth0|desk", None);

    let (status, body) = app
        .request(Method::GET, "/api/hotels/not-a-uuid/bookings", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

// =============================================================================
// Conflicts
// =============================================================================

#[tokio::test]
async fn test_overlapping_and_touching_stays_conflict() {
    let app = TestApp::new();
    let hotel = app.seed_hotel("Harbour View").await;
    app.seed_assignment("auth0|desk", hotel, "reception").await;
    let token = app.token("auth0|desk", None);
    let uri = bookings_uri(hotel);

    let (status, _) = create(&app, &token, &uri, booking_body("101", "2025-06-01", "2025-06-05")).await;
    assert_eq!(status, StatusCode::CREATED);

    // Overlap, then a stay starting on the existing check-out day
    for (a, b) in [("2025-06-03", "2025-06-07"), ("2025-06-05", "2025-06-08")] {
        let (status, body) = create(&app, &token, &uri, booking_body("101", a, b)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Room 101 is already booked for the selected dates");
    }

    // Other room, same dates
    let (status, _) = create(&app, &token, &uri, booking_body("102", "2025-06-03", "2025-06-07")).await;
    assert_eq!(status, StatusCode::CREATED);

    // Same room, after the existing stay
    let (status, _) = create(&app, &token, &uri, booking_body("101", "2025-06-06", "2025-06-08")).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_same_room_in_other_hotel_does_not_conflict() {
    let app = TestApp::new();
    let north = app.seed_hotel("North").await;
    let south = app.seed_hotel("South").await;
    app.seed_assignment("auth0|both", north, "staff").await;
    app.seed_assignment("auth0|both", south, "staff").await;
    let token = app.token("auth0|both", None);

    for hotel in [north, south] {
        let (status, _) = create(
            &app,
            &token,
            &bookings_uri(hotel),
            booking_body("101", "2025-06-01", "2025-06-05"),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }
}

// =============================================================================
// Authorization
// =============================================================================

#[tokio::test]
async fn test_unassigned_user_forbidden() {
    let app = TestApp::new();
    let hotel = app.seed_hotel("Harbour View").await;
    let token = app.token("auth0|stranger", None);
    let uri = bookings_uri(hotel);

    let (status, body) = app.request(Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "You don't have access to this hotel");

    let (status, _) = create(&app, &token, &uri, booking_body("101", "2025-06-01", "2025-06-02")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_assigned_guest_may_list_but_not_create() {
    let app = TestApp::new();
    let hotel = app.seed_hotel("Harbour View").await;
    app.seed_assignment("auth0|guest", hotel, "guest").await;
    let token = app.token("auth0|guest", None);
    let uri = bookings_uri(hotel);

    let (status, _) = app.request(Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = create(&app, &token, &uri, booking_body("101", "2025-06-01", "2025-06-02")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["error"],
        "Insufficient permissions. Required: staff or reception or admin. Your role: guest"
    );
}

#[tokio::test]
async fn test_hotel_admin_role_compares_case_insensitively() {
    let app = TestApp::new();
    let hotel = app.seed_hotel("Harbour View").await;
    app.seed_assignment("auth0|manager", hotel, "ADMIN").await;
    let token = app.token("auth0|manager", None);

    let (status, _) = create(
        &app,
        &token,
        &bookings_uri(hotel),
        booking_body("101", "2025-06-01", "2025-06-02"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_global_admin_still_needs_assignment() {
    let app = TestApp::new();
    let hotel = app.seed_hotel("Harbour View").await;
    let token = app.token("auth0|root", Some("admin"));

    let (status, _) = app
        .request(Method::GET, &bookings_uri(hotel), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
