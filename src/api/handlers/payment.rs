use axum::{extract::State, http::HeaderMap, response::IntoResponse, Json};
use std::sync::Arc;

use tracing::info;

use crate::api::dtos::requests::ConfirmPaymentRequest;
use crate::error::AppError;
use crate::state::AppState;

const PAID_STATUSES: &[&str] = &["paid", "succeeded"];

/// Asynchronous payment confirmation from the payment service. Guarded by a
/// shared token; promotes PAYMENT_PENDING to CONFIRMED on a paid result and
/// leaves cancelled bookings untouched.
pub async fn confirm_payment(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<ConfirmPaymentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let token = headers
        .get("X-Payment-Service-Token")
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;
    if token != state.config.payment_service_token {
        return Err(AppError::Unauthorized);
    }

    let paid = PAID_STATUSES.contains(&payload.payment_status.as_str());

    let updated = state
        .booking_repo
        .record_payment_result(&payload.booking_id, &payload.payment_status, paid)
        .await?;

    match updated {
        Some(booking) => {
            info!(
                "Payment result '{}' recorded for booking {} (status {})",
                payload.payment_status,
                booking.id,
                booking.status.as_str()
            );
            Ok(Json(booking))
        }
        None => {
            // Either unknown or already cancelled; tell the caller which.
            match state.booking_repo.find_by_id(&payload.booking_id).await? {
                Some(_) => Err(AppError::InvalidState("Booking is already cancelled".into())),
                None => Err(AppError::NotFound("Booking not found".into())),
            }
        }
    }
}
