use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

use crate::api::dtos::requests::CreateBookingRequest;
use crate::api::dtos::responses::BookingCreatedResponse;
use crate::api::extractors::auth::{AuthUser, MaybeAuthUser};
use crate::domain::models::booking::BookingSource;
use crate::domain::models::user::UserRole;
use crate::domain::services::booking_service::CreateBookingInput;
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(auth): MaybeAuthUser,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    // Agency portal bookings carry their own source so the cancellation
    // fan-out can reach the agency later.
    let source = match &auth {
        Some(user) if user.role == UserRole::Agency => BookingSource::Agency,
        _ => BookingSource::Web,
    };

    let input = CreateBookingInput {
        tour_id: payload.tour_id,
        travel_date: payload.travel_date,
        customer_name: payload.customer_name,
        customer_email: payload.customer_email,
        customer_phone: payload.customer_phone,
        pax_adults: payload.pax_adults,
        pax_children: payload.pax_children,
        hotel: payload.hotel,
        pickup_notes: payload.pickup_notes,
        start_time: payload.start_time,
        source,
    };

    let created = state
        .booking_service
        .create(input, auth.map(|u| u.id))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(BookingCreatedResponse {
            booking_id: created.booking_id,
            redirect_url: created.redirect_url,
            session_token: created.session_token,
        }),
    ))
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    if user.role != UserRole::Admin {
        return Err(AppError::Forbidden("Admin access required".into()));
    }
    let bookings = state.booking_repo.list_all().await?;
    Ok(Json(bookings))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_repo.find_by_id(&booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    let allowed = match user.role {
        UserRole::Admin | UserRole::Agency => true,
        UserRole::Customer => booking.user_id == user.id,
        UserRole::Supplier => {
            let tour = state.tour_repo.find_by_id(&booking.tour_id).await?;
            tour.and_then(|t| t.supplier_user_id).as_deref() == Some(user.id.as_str())
        }
    };
    if !allowed {
        return Err(AppError::Forbidden("Not your booking".into()));
    }

    Ok(Json(booking))
}
