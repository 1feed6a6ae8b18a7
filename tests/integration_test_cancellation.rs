mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use chrono::{Duration, Utc};
use common::TestApp;
use serde_json::{json, Value};
use tower::ServiceExt;

use tours_backend::domain::models::booking::{BookingStatus, CancellationRole};
use tours_backend::domain::models::notification::NotificationKind;
use tours_backend::domain::models::user::UserRole;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn date_in(days: i64) -> String {
    (Utc::now() + Duration::days(days)).format("%Y-%m-%d").to_string()
}

async fn create_booking(app: &TestApp, tour_id: &str, travel_date: &str) -> String {
    let payload = json!({
        "tour_id": tour_id,
        "travel_date": travel_date,
        "customer_name": "Test Customer",
        "customer_email": format!("customer-{}@example.com", uuid::Uuid::new_v4()),
        "pax_adults": 2
    });
    let response = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/v1/bookings")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap(),
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    parse_body(response).await["booking_id"].as_str().unwrap().to_string()
}

fn post_json(uri: String, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_admin_cancel_is_final_and_notifies_stakeholders() {
    let app = TestApp::new().await;
    let admin = app.seed_user("admin@example.com", "Admin", "pw-admin", UserRole::Admin).await;
    let supplier = app.seed_user("sup@example.com", "Sup", "pw-sup", UserRole::Supplier).await;
    let tour = app.seed_tour("reef-dive", "Reef Dive", 60.0, Some(supplier.id.clone())).await;
    let booking_id = create_booking(&app, &tour.id, &date_in(1)).await;
    let admin_token = app.login("admin@example.com", "pw-admin").await;

    // Admins bypass the approval window even this close to travel.
    let response = app.router.clone().oneshot(post_json(
        format!("/api/v1/admin/bookings/{}/cancel", booking_id),
        &admin_token,
        json!({ "reason": "operator request" }),
    )).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(parse_body(response).await["status"], "CANCELLED");

    let booking = app.state.booking_repo.find_by_id(&booking_id).await.unwrap().unwrap();
    assert_eq!(booking.status, BookingStatus::Cancelled);
    assert_eq!(booking.cancellation_by_role, Some(CancellationRole::Admin));
    assert_eq!(booking.cancellation_reason.as_deref(), Some("operator request"));
    assert!(booking.cancellation_at.is_some());

    let admin_feed = app.state.notification_sink.list_for(UserRole::Admin, &admin.id, 50).await.unwrap();
    assert_eq!(
        admin_feed.iter().filter(|n| n.kind == NotificationKind::AdminBookingCancelled).count(),
        1
    );
    let supplier_feed = app.state.notification_sink.list_for(UserRole::Supplier, &supplier.id, 50).await.unwrap();
    let cancelled: Vec<_> = supplier_feed.iter()
        .filter(|n| n.kind == NotificationKind::SupplierBookingCancelled)
        .collect();
    assert_eq!(cancelled.len(), 1);
    assert!(cancelled[0].message.contains("reason: operator request"));

    // CANCELLED is terminal: a second cancel conflicts and fans out nothing.
    let response = app.router.clone().oneshot(post_json(
        format!("/api/v1/admin/bookings/{}/cancel", booking_id),
        &admin_token,
        json!({ "reason": "again" }),
    )).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let booking = app.state.booking_repo.find_by_id(&booking_id).await.unwrap().unwrap();
    assert_eq!(booking.cancellation_reason.as_deref(), Some("operator request"));
    let admin_feed = app.state.notification_sink.list_for(UserRole::Admin, &admin.id, 50).await.unwrap();
    assert_eq!(
        admin_feed.iter().filter(|n| n.kind == NotificationKind::AdminBookingCancelled).count(),
        1
    );
}

#[tokio::test]
async fn test_admin_cancel_requires_a_reason() {
    let app = TestApp::new().await;
    app.seed_user("admin@example.com", "Admin", "pw-admin", UserRole::Admin).await;
    let tour = app.seed_tour("kayak-tour", "Kayak Tour", 30.0, None).await;
    let booking_id = create_booking(&app, &tour.id, &date_in(10)).await;
    let admin_token = app.login("admin@example.com", "pw-admin").await;

    let response = app.router.clone().oneshot(post_json(
        format!("/api/v1/admin/bookings/{}/cancel", booking_id),
        &admin_token,
        json!({ "reason": "   " }),
    )).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let booking = app.state.booking_repo.find_by_id(&booking_id).await.unwrap().unwrap();
    assert_eq!(booking.status, BookingStatus::PaymentPending);
}

#[tokio::test]
async fn test_supplier_direct_cancel_outside_window() {
    let app = TestApp::new().await;
    app.seed_user("sup@example.com", "Sup", "pw-sup", UserRole::Supplier).await;
    let tour = app.seed_tour("jungle-trek", "Jungle Trek", 45.0, None).await;
    let booking_id = create_booking(&app, &tour.id, &date_in(30)).await;
    let token = app.login("sup@example.com", "pw-sup").await;

    let response = app.router.clone().oneshot(post_json(
        format!("/api/v1/supplier/bookings/{}/cancel", booking_id),
        &token,
        json!({ "reason": "boat maintenance" }),
    )).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let booking = app.state.booking_repo.find_by_id(&booking_id).await.unwrap().unwrap();
    assert_eq!(booking.status, BookingStatus::Cancelled);
    assert_eq!(booking.cancellation_by_role, Some(CancellationRole::Supplier));
    assert_eq!(booking.cancellation_reason.as_deref(), Some("boat maintenance"));
}

#[tokio::test]
async fn test_supplier_direct_cancel_inside_window_is_rejected() {
    let app = TestApp::new().await;
    app.seed_user("sup@example.com", "Sup", "pw-sup", UserRole::Supplier).await;
    let tour = app.seed_tour("sunset-cruise", "Sunset Cruise", 55.0, None).await;
    let booking_id = create_booking(&app, &tour.id, &date_in(1)).await;
    let token = app.login("sup@example.com", "pw-sup").await;

    let response = app.router.clone().oneshot(post_json(
        format!("/api/v1/supplier/bookings/{}/cancel", booking_id),
        &token,
        json!({ "reason": "weather" }),
    )).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Nothing about the booking changed.
    let booking = app.state.booking_repo.find_by_id(&booking_id).await.unwrap().unwrap();
    assert_eq!(booking.status, BookingStatus::PaymentPending);
    assert!(booking.cancellation_by_role.is_none());
    assert!(booking.cancellation_reason.is_none());
    assert!(booking.cancellation_at.is_none());
}

#[tokio::test]
async fn test_request_then_admin_approval_preserves_requester() {
    let app = TestApp::new().await;
    let admin = app.seed_user("admin@example.com", "Admin", "pw-admin", UserRole::Admin).await;
    let supplier = app.seed_user("sup@example.com", "Sup", "pw-sup", UserRole::Supplier).await;
    let tour = app.seed_tour("wine-tasting", "Wine Tasting", 70.0, Some(supplier.id.clone())).await;
    let booking_id = create_booking(&app, &tour.id, &date_in(1)).await;
    let supplier_token = app.login("sup@example.com", "pw-sup").await;
    let admin_token = app.login("admin@example.com", "pw-admin").await;

    let response = app.router.clone().oneshot(post_json(
        format!("/api/v1/supplier/bookings/{}/request-cancellation", booking_id),
        &supplier_token,
        json!({ "reason": "guide unavailable" }),
    )).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(parse_body(response).await["status"], "CANCELLATION_REQUESTED");

    let booking = app.state.booking_repo.find_by_id(&booking_id).await.unwrap().unwrap();
    assert_eq!(booking.status, BookingStatus::CancellationRequested);
    assert_eq!(booking.cancellation_by_role, Some(CancellationRole::Supplier));
    assert_eq!(booking.cancellation_reason.as_deref(), Some("guide unavailable"));

    // Pending requests only reach the admin feed.
    let admin_feed = app.state.notification_sink.list_for(UserRole::Admin, &admin.id, 50).await.unwrap();
    assert_eq!(
        admin_feed.iter().filter(|n| n.kind == NotificationKind::AdminCancellationRequested).count(),
        1
    );
    let supplier_feed = app.state.notification_sink.list_for(UserRole::Supplier, &supplier.id, 50).await.unwrap();
    assert!(supplier_feed.iter().all(|n| n.kind != NotificationKind::SupplierBookingCancelled));

    let response = app.router.clone().oneshot(post_json(
        format!("/api/v1/admin/bookings/{}/approve-cancellation", booking_id),
        &admin_token,
        json!({}),
    )).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The approval records the original requester, not the admin.
    let booking = app.state.booking_repo.find_by_id(&booking_id).await.unwrap().unwrap();
    assert_eq!(booking.status, BookingStatus::Cancelled);
    assert_eq!(booking.cancellation_by_role, Some(CancellationRole::Supplier));
    assert_eq!(booking.cancellation_reason.as_deref(), Some("guide unavailable"));

    let admin_feed = app.state.notification_sink.list_for(UserRole::Admin, &admin.id, 50).await.unwrap();
    let cancelled: Vec<_> = admin_feed.iter()
        .filter(|n| n.kind == NotificationKind::AdminBookingCancelled)
        .collect();
    assert_eq!(cancelled.len(), 1);
    assert!(cancelled[0].message.contains("cancelled by supplier"));
    let supplier_feed = app.state.notification_sink.list_for(UserRole::Supplier, &supplier.id, 50).await.unwrap();
    assert_eq!(
        supplier_feed.iter().filter(|n| n.kind == NotificationKind::SupplierBookingCancelled).count(),
        1
    );
}

#[tokio::test]
async fn test_approval_without_pending_request_conflicts() {
    let app = TestApp::new().await;
    app.seed_user("admin@example.com", "Admin", "pw-admin", UserRole::Admin).await;
    let tour = app.seed_tour("food-tour", "Food Tour", 35.0, None).await;
    let booking_id = create_booking(&app, &tour.id, &date_in(10)).await;
    let admin_token = app.login("admin@example.com", "pw-admin").await;

    let response = app.router.clone().oneshot(post_json(
        format!("/api/v1/admin/bookings/{}/approve-cancellation", booking_id),
        &admin_token,
        json!({}),
    )).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_agency_cancel_notifies_agencies() {
    let app = TestApp::new().await;
    let agency = app.seed_user("agency@example.com", "Agency", "pw-agency", UserRole::Agency).await;
    let tour = app.seed_tour("island-hop", "Island Hop", 90.0, None).await;
    let booking_id = create_booking(&app, &tour.id, &date_in(20)).await;
    let token = app.login("agency@example.com", "pw-agency").await;

    let response = app.router.clone().oneshot(post_json(
        format!("/api/v1/agency/bookings/{}/cancel", booking_id),
        &token,
        json!({ "reason": "client changed plans" }),
    )).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let booking = app.state.booking_repo.find_by_id(&booking_id).await.unwrap().unwrap();
    assert_eq!(booking.cancellation_by_role, Some(CancellationRole::Agency));

    // An agency acting on a web booking still gets the agency fan-out.
    let agency_feed = app.state.notification_sink.list_for(UserRole::Agency, &agency.id, 50).await.unwrap();
    assert_eq!(
        agency_feed.iter().filter(|n| n.kind == NotificationKind::AgencyBookingCancelled).count(),
        1
    );
}

#[tokio::test]
async fn test_admin_cancel_of_agency_booking_reaches_agencies() {
    let app = TestApp::new().await;
    let agency = app.seed_user("agency@example.com", "Agency", "pw-agency", UserRole::Agency).await;
    app.seed_user("admin@example.com", "Admin", "pw-admin", UserRole::Admin).await;
    let tour = app.seed_tour("desert-safari", "Desert Safari", 85.0, None).await;
    let agency_token = app.login("agency@example.com", "pw-agency").await;
    let admin_token = app.login("admin@example.com", "pw-admin").await;

    // Booking placed through the agency portal carries the AGENCY source.
    let payload = json!({
        "tour_id": tour.id,
        "travel_date": date_in(20),
        "customer_name": "Portal Client",
        "customer_email": "portal-client@example.com",
        "pax_adults": 2
    });
    let response = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/v1/bookings")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {}", agency_token))
            .body(Body::from(payload.to_string()))
            .unwrap(),
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let booking_id = parse_body(response).await["booking_id"].as_str().unwrap().to_string();

    let response = app.router.clone().oneshot(post_json(
        format!("/api/v1/admin/bookings/{}/cancel", booking_id),
        &admin_token,
        json!({ "reason": "operator shutdown" }),
    )).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The source alone routes the cancellation to the agency feed, even
    // though the acting role was admin.
    let booking = app.state.booking_repo.find_by_id(&booking_id).await.unwrap().unwrap();
    assert_eq!(booking.cancellation_by_role, Some(CancellationRole::Admin));
    let agency_feed = app.state.notification_sink.list_for(UserRole::Agency, &agency.id, 50).await.unwrap();
    assert_eq!(
        agency_feed.iter().filter(|n| n.kind == NotificationKind::AgencyBookingCancelled).count(),
        1
    );
}

#[tokio::test]
async fn test_role_gating_on_cancellation_routes() {
    let app = TestApp::new().await;
    app.seed_user("agency@example.com", "Agency", "pw-agency", UserRole::Agency).await;
    let tour = app.seed_tour("quad-safari", "Quad Safari", 65.0, None).await;
    let booking_id = create_booking(&app, &tour.id, &date_in(15)).await;
    let agency_token = app.login("agency@example.com", "pw-agency").await;

    // Agency token on a supplier route.
    let response = app.router.clone().oneshot(post_json(
        format!("/api/v1/supplier/bookings/{}/cancel", booking_id),
        &agency_token,
        json!({ "reason": "x" }),
    )).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Agency token on an admin route.
    let response = app.router.clone().oneshot(post_json(
        format!("/api/v1/admin/bookings/{}/cancel", booking_id),
        &agency_token,
        json!({ "reason": "x" }),
    )).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // No token at all.
    let response = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri(format!("/api/v1/agency/bookings/{}/cancel", booking_id))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "reason": "x" }).to_string()))
            .unwrap(),
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let booking = app.state.booking_repo.find_by_id(&booking_id).await.unwrap().unwrap();
    assert_eq!(booking.status, BookingStatus::PaymentPending);
}

#[tokio::test]
async fn test_admin_status_override_allows_completion_only() {
    let app = TestApp::new().await;
    app.seed_user("admin@example.com", "Admin", "pw-admin", UserRole::Admin).await;
    let tour = app.seed_tour("lagoon-swim", "Lagoon Swim", 40.0, None).await;
    let booking_id = create_booking(&app, &tour.id, &date_in(5)).await;
    let admin_token = app.login("admin@example.com", "pw-admin").await;

    // Cancellation must go through the cancel operations.
    let response = app.router.clone().oneshot(post_json(
        format!("/api/v1/admin/bookings/{}/status", booking_id),
        &admin_token,
        json!({ "status": "CANCELLED" }),
    )).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.router.clone().oneshot(post_json(
        format!("/api/v1/admin/bookings/{}/status", booking_id),
        &admin_token,
        json!({ "status": "CONFIRMED" }),
    )).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.router.clone().oneshot(post_json(
        format!("/api/v1/admin/bookings/{}/status", booking_id),
        &admin_token,
        json!({ "status": "COMPLETED" }),
    )).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let booking = app.state.booking_repo.find_by_id(&booking_id).await.unwrap().unwrap();
    assert_eq!(booking.status, BookingStatus::Completed);

    // Once cancelled, the override is refused too.
    app.router.clone().oneshot(post_json(
        format!("/api/v1/admin/bookings/{}/cancel", booking_id),
        &admin_token,
        json!({ "reason": "no-show" }),
    )).await.unwrap();
    let response = app.router.clone().oneshot(post_json(
        format!("/api/v1/admin/bookings/{}/status", booking_id),
        &admin_token,
        json!({ "status": "CONFIRMED" }),
    )).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
