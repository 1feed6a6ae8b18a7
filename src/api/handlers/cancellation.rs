use axum::{extract::{Path, State}, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::api::dtos::requests::{CancelBookingRequest, UpdateBookingStatusRequest};
use crate::api::extractors::auth::{AuthUser, AuthenticatedUser};
use crate::domain::models::booking::BookingStatus;
use crate::domain::models::user::UserRole;
use crate::error::AppError;
use crate::state::AppState;

fn require_role(user: &AuthenticatedUser, role: UserRole) -> Result<(), AppError> {
    if user.role != role {
        return Err(AppError::Forbidden(format!("{} access required", role.as_str())));
    }
    Ok(())
}

fn reason_of(payload: &CancelBookingRequest) -> &str {
    payload.reason.as_deref().unwrap_or("")
}

pub async fn admin_cancel(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(booking_id): Path<String>,
    Json(payload): Json<CancelBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_role(&user, UserRole::Admin)?;
    state.cancellation_service.admin_cancel(&booking_id, reason_of(&payload)).await?;
    Ok(Json(json!({ "status": "CANCELLED" })))
}

pub async fn admin_approve_cancellation(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    require_role(&user, UserRole::Admin)?;
    state.cancellation_service.admin_approve_cancellation(&booking_id).await?;
    Ok(Json(json!({ "status": "CANCELLED" })))
}

pub async fn admin_update_status(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(booking_id): Path<String>,
    Json(payload): Json<UpdateBookingStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_role(&user, UserRole::Admin)?;
    let status = BookingStatus::parse(&payload.status)?;
    state.cancellation_service.admin_update_status(&booking_id, status).await?;
    Ok(Json(json!({ "status": status.as_str() })))
}

pub async fn supplier_cancel(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(booking_id): Path<String>,
    Json(payload): Json<CancelBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_role(&user, UserRole::Supplier)?;
    state.cancellation_service.supplier_cancel(&booking_id, reason_of(&payload)).await?;
    Ok(Json(json!({ "status": "CANCELLED" })))
}

pub async fn supplier_request_cancellation(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(booking_id): Path<String>,
    Json(payload): Json<CancelBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_role(&user, UserRole::Supplier)?;
    state.cancellation_service.supplier_request_cancellation(&booking_id, reason_of(&payload)).await?;
    Ok(Json(json!({ "status": "CANCELLATION_REQUESTED" })))
}

pub async fn agency_cancel(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(booking_id): Path<String>,
    Json(payload): Json<CancelBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_role(&user, UserRole::Agency)?;
    state.cancellation_service.agency_cancel(&booking_id, reason_of(&payload)).await?;
    Ok(Json(json!({ "status": "CANCELLED" })))
}

pub async fn agency_request_cancellation(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(booking_id): Path<String>,
    Json(payload): Json<CancelBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_role(&user, UserRole::Agency)?;
    state.cancellation_service.agency_request_cancellation(&booking_id, reason_of(&payload)).await?;
    Ok(Json(json!({ "status": "CANCELLATION_REQUESTED" })))
}
