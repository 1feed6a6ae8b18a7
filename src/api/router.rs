use axum::{
    body::Body,
    extract::Request,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;

use crate::api::handlers::{auth, booking, cancellation, health, notification, payment, tour};
use crate::state::AppState;
use tower_http::{classify::ServerErrorsFailureClass, trace::TraceLayer};
use tracing::{error, info, info_span, Span};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/me", get(auth::me))

        // Public catalog
        .route("/api/v1/tours/{slug}", get(tour::get_tour_by_slug))

        // Public booking flow
        .route("/api/v1/bookings", post(booking::create_booking).get(booking::list_bookings))
        .route("/api/v1/bookings/{booking_id}", get(booking::get_booking))

        // Payment service callback
        .route("/api/v1/payments/confirm", post(payment::confirm_payment))

        // Admin cancellation & status
        .route("/api/v1/admin/bookings/{booking_id}/cancel", post(cancellation::admin_cancel))
        .route("/api/v1/admin/bookings/{booking_id}/approve-cancellation", post(cancellation::admin_approve_cancellation))
        .route("/api/v1/admin/bookings/{booking_id}/status", post(cancellation::admin_update_status))

        // Supplier cancellation
        .route("/api/v1/supplier/bookings/{booking_id}/cancel", post(cancellation::supplier_cancel))
        .route("/api/v1/supplier/bookings/{booking_id}/request-cancellation", post(cancellation::supplier_request_cancellation))

        // Agency cancellation
        .route("/api/v1/agency/bookings/{booking_id}/cancel", post(cancellation::agency_cancel))
        .route("/api/v1/agency/bookings/{booking_id}/request-cancellation", post(cancellation::agency_request_cancellation))

        // Notification feed
        .route("/api/v1/notifications", get(notification::list_notifications))
        .route("/api/v1/notifications/{notification_id}/read", post(notification::mark_notification_read))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
