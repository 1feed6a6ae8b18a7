use axum::{extract::{Path, State}, response::IntoResponse, Json};
use std::sync::Arc;

use crate::error::AppError;
use crate::state::AppState;

/// Public catalog lookup backing the storefront tour page.
pub async fn get_tour_by_slug(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let tour = state
        .tour_repo
        .find_by_slug(&slug)
        .await?
        .ok_or(AppError::NotFound("Tour not found".into()))?;
    Ok(Json(tour))
}
