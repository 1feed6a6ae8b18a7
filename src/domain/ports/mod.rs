use crate::domain::models::{
    booking::{Booking, BookingStatus, CancellationRole},
    notification::Notification,
    tour::Tour,
    user::{User, UserRole},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait TourRepository: Send + Sync {
    async fn create(&self, tour: &Tour) -> Result<Tour, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Tour>, AppError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tour>, AppError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    /// Create-if-absent by normalized email; an existing row gets its
    /// display name refreshed but keeps everything else.
    async fn upsert_by_email(&self, email: &str, name: &str, password_hash: &str) -> Result<User, AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn list_all(&self) -> Result<Vec<Booking>, AppError>;
    /// Atomically moves a non-cancelled booking into `status`, stamping the
    /// cancellation triple in the same write. A `None` reason keeps whatever
    /// reason is already stored. Returns `None` when the row is missing or
    /// the terminal-state guard rejected the write.
    async fn apply_cancellation(
        &self,
        id: &str,
        status: BookingStatus,
        role: CancellationRole,
        reason: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<Option<Booking>, AppError>;
    /// Plain status override (admin), guarded against leaving `CANCELLED`.
    async fn update_status(&self, id: &str, status: BookingStatus) -> Result<Option<Booking>, AppError>;
    async fn update_payment(
        &self,
        id: &str,
        session_id: &str,
        intent_id: Option<&str>,
        payment_status: Option<&str>,
        checkout_url: &str,
    ) -> Result<Booking, AppError>;
    /// Records the gateway's asynchronous payment result and promotes
    /// `PAYMENT_PENDING` to `CONFIRMED` on a paid status. Never touches a
    /// cancelled row.
    async fn record_payment_result(&self, id: &str, payment_status: &str, paid: bool) -> Result<Option<Booking>, AppError>;
}

#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), AppError>;
    async fn list_for(&self, role: UserRole, user_id: &str, limit: i64) -> Result<Vec<Notification>, AppError>;
    async fn mark_read(&self, id: &str, role: UserRole, user_id: &str) -> Result<(), AppError>;
}

pub struct CheckoutSessionRequest {
    pub amount: f64,
    pub currency: String,
    pub description: String,
    pub customer_email: String,
    pub booking_id: String,
    pub tour_id: String,
    pub success_url: String,
    pub cancel_url: String,
}

pub struct CheckoutSession {
    pub session_id: String,
    pub payment_intent_id: Option<String>,
    pub redirect_url: String,
    pub payment_status: Option<String>,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_checkout_session(&self, request: &CheckoutSessionRequest) -> Result<CheckoutSession, AppError>;
}
