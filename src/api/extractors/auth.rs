use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, StatusCode},
};
use std::sync::Arc;
use tracing::Span;

use crate::domain::models::user::UserRole;
use crate::state::AppState;

#[derive(Clone)]
pub struct AuthenticatedUser {
    pub id: String,
    pub email: String,
    pub role: UserRole,
}

pub struct AuthUser(pub AuthenticatedUser);

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|t| t.to_string())
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(StatusCode::UNAUTHORIZED)?;

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        let claims = app_state
            .auth_service
            .verify(&token)
            .map_err(|_| StatusCode::UNAUTHORIZED)?;

        let user = AuthenticatedUser {
            id: claims.sub,
            email: claims.email,
            role: claims.role,
        };

        Span::current().record("user_id", &user.id);

        Ok(AuthUser(user))
    }
}

pub struct MaybeAuthUser(pub Option<AuthenticatedUser>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Ok(MaybeAuthUser(None));
        };

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        // Invalid token (expired, bad signature) -> treat as guest.
        match app_state.auth_service.verify(&token) {
            Ok(claims) => Ok(MaybeAuthUser(Some(AuthenticatedUser {
                id: claims.sub,
                email: claims.email,
                role: claims.role,
            }))),
            Err(_) => Ok(MaybeAuthUser(None)),
        }
    }
}
