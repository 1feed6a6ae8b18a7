use std::sync::Arc;
use crate::config::Config;
use crate::domain::ports::{BookingRepository, NotificationSink, PaymentGateway, TourRepository, UserRepository};
use crate::domain::services::auth_service::AuthService;
use crate::domain::services::booking_service::BookingService;
use crate::domain::services::cancellation::CancellationService;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub tour_repo: Arc<dyn TourRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub notification_sink: Arc<dyn NotificationSink>,
    pub payment_gateway: Arc<dyn PaymentGateway>,
    pub auth_service: Arc<AuthService>,
    pub booking_service: Arc<BookingService>,
    pub cancellation_service: Arc<CancellationService>,
}
