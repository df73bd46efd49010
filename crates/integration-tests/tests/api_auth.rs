//! Integration tests for bearer token handling and public endpoints.

use axum::http::{Method, StatusCode};

use otelier_integration_tests::TestApp;

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new();

    let (status, body) = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "UP");
    assert_eq!(body["service"], "hotel-booking-api");
    assert!(body["timestamp"].is_string());

    let (status, body) = app.request(Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Hotel Booking API is running");
}

#[tokio::test]
async fn test_readiness_reports_up_for_memory_store() {
    let app = TestApp::new();
    let (status, body) = app.request(Method::GET, "/health/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "UP");
}

#[tokio::test]
async fn test_bad_tokens_do_not_block_public_endpoints() {
    let app = TestApp::new();
    let expired = app.expired_token("auth0|late");

    for token in ["garbage", expired.as_str()] {
        let (status, _) = app.request(Method::GET, "/health", Some(token), None).await;
        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
async fn test_protected_endpoints_require_valid_token() {
    let app = TestApp::new();
    let hotel = app.seed_hotel("Harbour View").await;
    app.seed_assignment("auth0|desk", hotel, "staff").await;
    let uri = format!("/api/hotels/{hotel}/bookings");
    let expired = app.expired_token("auth0|desk");

    for token in [None, Some("not.a.jwt"), Some(expired.as_str())] {
        let (status, body) = app.request(Method::GET, &uri, token, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "token: {token:?}");
        assert_eq!(body["error"], "Authentication required");

        let (status, _) = app
            .request(Method::GET, "/api/hotel-assignments/my-hotels", token, None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_token_from_other_issuer_rejected() {
    let app = TestApp::new();
    let mut config = otelier_integration_tests::jwt_config();
    config.issuer = "https://someone-else.test/".to_string();
    let foreign = otelier_api::auth::TokenIssuer::new(&config)
        .issue("auth0|desk", None, 3600)
        .expect("token encodes");

    let (status, _) = app
        .request(
            Method::GET,
            "/api/hotel-assignments/my-hotels",
            Some(&foreign),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
