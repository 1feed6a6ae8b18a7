use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::domain::models::user::UserRole;

#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    AdminBookingCreated,
    SupplierBookingCreated,
    AdminBookingCancelled,
    SupplierBookingCancelled,
    AgencyBookingCancelled,
    AdminCancellationRequested,
    AdminBookingModified,
    SupplierBookingModified,
    AgencyBookingModified,
}

/// A persisted notification row, rendered later by the dashboards.
/// Addressed either to a whole role or to one specific user.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Notification {
    pub id: String,
    pub kind: NotificationKind,
    pub role: UserRole,
    pub recipient_user_id: Option<String>,
    pub title: String,
    pub message: String,
    pub booking_id: Option<String>,
    pub metadata: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

pub struct NewNotification {
    pub kind: NotificationKind,
    pub role: UserRole,
    pub recipient_user_id: Option<String>,
    pub title: String,
    pub message: String,
    pub booking_id: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

impl Notification {
    pub fn from_new(params: NewNotification) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind: params.kind,
            role: params.role,
            recipient_user_id: params.recipient_user_id,
            title: params.title,
            message: params.message,
            booking_id: params.booking_id,
            metadata: params.metadata.map(|m| m.to_string()),
            is_read: false,
            created_at: Utc::now(),
        }
    }
}
