use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{ConnectOptions, SqlitePool};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::domain::ports::PaymentGateway;
use crate::domain::services::auth_service::AuthService;
use crate::domain::services::booking_service::BookingService;
use crate::domain::services::cancellation::CancellationService;
use crate::domain::services::cancellation_policy::CancellationPolicy;
use crate::domain::services::notification_fanout::NotificationFanout;
use crate::infra::payment::http_payment_gateway::HttpPaymentGateway;
use crate::infra::repositories::{
    sqlite_booking_repo::SqliteBookingRepo, sqlite_notification_repo::SqliteNotificationRepo,
    sqlite_tour_repo::SqliteTourRepo, sqlite_user_repo::SqliteUserRepo,
};
use crate::state::AppState;

pub async fn bootstrap_state(config: &Config) -> AppState {
    info!("Initializing SQLite connection with WAL Mode...");

    let opts = SqliteConnectOptions::from_str(&config.database_url)
        .expect("Invalid SQLite connection string")
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .log_statements(LevelFilter::Debug)
        .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await
        .expect("Failed to connect to SQLite");

    run_migrations(&pool).await;

    let payment_gateway = Arc::new(HttpPaymentGateway::new(
        config.payment_service_url.clone(),
        config.payment_service_token.clone(),
    ));

    assemble_state(config.clone(), pool, payment_gateway)
}

/// Wires repositories and services onto an existing pool. Split out so tests
/// can swap the payment gateway for a fake.
pub fn assemble_state(
    config: Config,
    pool: SqlitePool,
    payment_gateway: Arc<dyn PaymentGateway>,
) -> AppState {
    let tour_repo = Arc::new(SqliteTourRepo::new(pool.clone()));
    let user_repo = Arc::new(SqliteUserRepo::new(pool.clone()));
    let booking_repo = Arc::new(SqliteBookingRepo::new(pool.clone()));
    let notification_sink = Arc::new(SqliteNotificationRepo::new(pool));

    let auth_service = Arc::new(AuthService::new(&config));
    let fanout = Arc::new(NotificationFanout::new(tour_repo.clone(), notification_sink.clone()));
    let policy = CancellationPolicy::new(config.cancellation_approval_window_hours);

    let booking_service = Arc::new(BookingService::new(
        tour_repo.clone(),
        user_repo.clone(),
        booking_repo.clone(),
        payment_gateway.clone(),
        fanout.clone(),
        auth_service.clone(),
        config.public_base_url.clone(),
        config.currency.clone(),
    ));

    let cancellation_service = Arc::new(CancellationService::new(
        booking_repo.clone(),
        fanout,
        policy,
    ));

    AppState {
        config,
        tour_repo,
        user_repo,
        booking_repo,
        notification_sink,
        payment_gateway,
        auth_service,
        booking_service,
        cancellation_service,
    }
}

pub async fn run_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
