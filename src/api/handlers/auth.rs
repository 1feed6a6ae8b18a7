use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use tracing::info;

use crate::api::dtos::requests::LoginRequest;
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::auth::{AuthResponse, UserProfile};
use crate::error::AppError;
use crate::state::AppState;

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = payload.email.trim().to_lowercase();

    let user = state.user_repo.find_by_email(&email).await?
        .ok_or(AppError::Unauthorized)?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal)?;

    Argon2::default().verify_password(payload.password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::Unauthorized)?;

    let token = state.auth_service.issue_session(&user)?;

    info!("User logged in: {}", user.id);

    Ok(Json(AuthResponse {
        token,
        user: UserProfile {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
        },
    }))
}

/// Fresh profile for the current session. Reads the store rather than
/// echoing claims, so a role change takes effect without re-login.
pub async fn me(
    State(state): State<Arc<AppState>>,
    AuthUser(auth): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .user_repo
        .find_by_id(&auth.id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(Json(UserProfile {
        id: user.id,
        email: user.email,
        name: user.name,
        role: user.role,
    }))
}
