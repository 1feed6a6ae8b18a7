use crate::domain::models::notification::Notification;
use crate::domain::models::user::UserRole;
use crate::domain::ports::NotificationSink;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteNotificationRepo {
    pool: SqlitePool,
}

impl SqliteNotificationRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationSink for SqliteNotificationRepo {
    async fn send(&self, notification: &Notification) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO notifications (id, kind, role, recipient_user_id, title, message, booking_id, metadata, is_read, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        )
            .bind(&notification.id).bind(notification.kind).bind(notification.role)
            .bind(&notification.recipient_user_id).bind(&notification.title).bind(&notification.message)
            .bind(&notification.booking_id).bind(&notification.metadata)
            .bind(notification.is_read).bind(notification.created_at)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn list_for(&self, role: UserRole, user_id: &str, limit: i64) -> Result<Vec<Notification>, AppError> {
        // Role-wide rows have no recipient; targeted rows only reach their
        // recipient, never the rest of the role.
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications
              WHERE (recipient_user_id IS NULL AND role = ?) OR recipient_user_id = ?
              ORDER BY created_at DESC
              LIMIT ?"
        )
            .bind(role).bind(user_id).bind(limit)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn mark_read(&self, id: &str, role: UserRole, user_id: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = 1
              WHERE id = ? AND ((recipient_user_id IS NULL AND role = ?) OR recipient_user_id = ?)"
        )
            .bind(id).bind(role).bind(user_id)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Notification not found".into()));
        }
        Ok(())
    }
}
