use axum::{extract::{Path, State}, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::api::extractors::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

const FEED_LIMIT: i64 = 50;

pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let notifications = state
        .notification_sink
        .list_for(user.role, &user.id, FEED_LIMIT)
        .await?;
    Ok(Json(notifications))
}

pub async fn mark_notification_read(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(notification_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state
        .notification_sink
        .mark_read(&notification_id, user.role, &user.id)
        .await?;
    Ok(Json(json!({ "status": "read" })))
}
