use crate::domain::models::booking::{Booking, BookingStatus, CancellationRole};
use crate::domain::ports::BookingRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SqliteBookingRepo {
    pool: SqlitePool,
}

impl SqliteBookingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepo {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, tour_id, user_id, travel_date, start_time, pax_adults, pax_children,
                total_amount, source, customer_name, customer_email, customer_phone, hotel, pickup_notes,
                payment_session_id, payment_intent_id, payment_status, checkout_url,
                status, cancellation_by_role, cancellation_reason, cancellation_at, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&booking.id).bind(&booking.tour_id).bind(&booking.user_id)
            .bind(booking.travel_date).bind(&booking.start_time)
            .bind(booking.pax_adults).bind(booking.pax_children)
            .bind(booking.total_amount).bind(booking.source)
            .bind(&booking.customer_name).bind(&booking.customer_email).bind(&booking.customer_phone)
            .bind(&booking.hotel).bind(&booking.pickup_notes)
            .bind(&booking.payment_session_id).bind(&booking.payment_intent_id)
            .bind(&booking.payment_status).bind(&booking.checkout_url)
            .bind(booking.status).bind(booking.cancellation_by_role)
            .bind(&booking.cancellation_reason).bind(booking.cancellation_at)
            .bind(booking.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_all(&self) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings ORDER BY created_at DESC")
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn apply_cancellation(
        &self,
        id: &str,
        status: BookingStatus,
        role: CancellationRole,
        reason: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<Option<Booking>, AppError> {
        // Single guarded write: the terminal-state check and the mutation
        // are one statement, so a racing cancellation cannot slip between.
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings
                SET status = ?,
                    cancellation_by_role = ?,
                    cancellation_reason = COALESCE(?, cancellation_reason),
                    cancellation_at = ?
              WHERE id = ? AND status != 'CANCELLED'
              RETURNING *"
        )
            .bind(status).bind(role).bind(reason).bind(at).bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn update_status(&self, id: &str, status: BookingStatus) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = ? WHERE id = ? AND status != 'CANCELLED' RETURNING *"
        )
            .bind(status).bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn update_payment(
        &self,
        id: &str,
        session_id: &str,
        intent_id: Option<&str>,
        payment_status: Option<&str>,
        checkout_url: &str,
    ) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings
                SET payment_session_id = ?, payment_intent_id = ?, payment_status = ?, checkout_url = ?
              WHERE id = ?
              RETURNING *"
        )
            .bind(session_id).bind(intent_id).bind(payment_status).bind(checkout_url).bind(id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn record_payment_result(&self, id: &str, payment_status: &str, paid: bool) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings
                SET payment_status = ?,
                    status = CASE WHEN ? = 1 AND status = 'PAYMENT_PENDING' THEN 'CONFIRMED' ELSE status END
              WHERE id = ? AND status != 'CANCELLED'
              RETURNING *"
        )
            .bind(payment_status).bind(paid).bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
}
