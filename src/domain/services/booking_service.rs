use std::sync::Arc;

use argon2::{password_hash::SaltString, Argon2, PasswordHasher};
use chrono::{NaiveDate, Utc};
use rand::rngs::OsRng;
use rand::{distributions::Alphanumeric, Rng};
use serde_json::Value;
use tracing::info;

use crate::domain::models::booking::{Booking, BookingSource, NewBookingParams};
use crate::domain::models::user::UserRole;
use crate::domain::ports::{
    BookingRepository, CheckoutSessionRequest, PaymentGateway, TourRepository, UserRepository,
};
use crate::domain::services::auth_service::AuthService;
use crate::domain::services::notification_fanout::{booking_summary, NotificationFanout};
use crate::error::AppError;

/// Validated creation input. The handler maps the raw form payload into this
/// without interpreting it; all validation lives here.
pub struct CreateBookingInput {
    pub tour_id: String,
    pub travel_date: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub pax_adults: Option<Value>,
    pub pax_children: Option<Value>,
    pub hotel: Option<String>,
    pub pickup_notes: Option<String>,
    pub start_time: Option<String>,
    pub source: BookingSource,
}

pub struct CreatedBooking {
    pub booking_id: String,
    pub redirect_url: String,
    /// Present only when the caller had no session and one was issued for
    /// the upserted guest account.
    pub session_token: Option<String>,
}

pub struct BookingService {
    tour_repo: Arc<dyn TourRepository>,
    user_repo: Arc<dyn UserRepository>,
    booking_repo: Arc<dyn BookingRepository>,
    payment: Arc<dyn PaymentGateway>,
    fanout: Arc<NotificationFanout>,
    auth_service: Arc<AuthService>,
    public_base_url: String,
    currency: String,
}

impl BookingService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tour_repo: Arc<dyn TourRepository>,
        user_repo: Arc<dyn UserRepository>,
        booking_repo: Arc<dyn BookingRepository>,
        payment: Arc<dyn PaymentGateway>,
        fanout: Arc<NotificationFanout>,
        auth_service: Arc<AuthService>,
        public_base_url: String,
        currency: String,
    ) -> Self {
        Self {
            tour_repo,
            user_repo,
            booking_repo,
            payment,
            fanout,
            auth_service,
            public_base_url,
            currency,
        }
    }

    pub async fn create(
        &self,
        input: CreateBookingInput,
        authenticated_user_id: Option<String>,
    ) -> Result<CreatedBooking, AppError> {
        let tour_id = input.tour_id.trim().to_string();
        if tour_id.is_empty() {
            return Err(AppError::Validation("Select a valid tour".into()));
        }

        let travel_date = validate_travel_date(&input.travel_date, Utc::now().date_naive())?;

        let customer_name = input.customer_name.trim().to_string();
        if customer_name.is_empty() {
            return Err(AppError::Validation("Customer name is required".into()));
        }

        let customer_email = input.customer_email.trim().to_lowercase();
        if !is_valid_email(&customer_email) {
            return Err(AppError::Validation("Invalid customer email".into()));
        }

        let pax_adults = parse_pax(input.pax_adults.as_ref(), 1);
        let pax_children = parse_pax(input.pax_children.as_ref(), 0);
        if pax_adults < 1 {
            return Err(AppError::Validation("At least one adult is required".into()));
        }
        if pax_children < 0 {
            return Err(AppError::Validation("Children count cannot be negative".into()));
        }

        let tour = self.tour_repo.find_by_id(&tour_id).await?
            .ok_or(AppError::NotFound("Tour not found".into()))?;

        let pax_total = pax_adults + pax_children;
        let total_amount = tour.price * pax_total as f64;

        // Resolve the acting party: authenticated session, or a lightweight
        // guest account keyed by normalized email.
        let mut session_token = None;
        let user_id = match authenticated_user_id {
            Some(id) => id,
            None => {
                let password_hash = random_password_hash()?;
                let customer = self
                    .user_repo
                    .upsert_by_email(&customer_email, &customer_name, &password_hash)
                    .await?;
                // Guest checkout may land on an existing staff account's
                // email; never hand out a session for anything but a
                // plain customer row.
                if customer.role == UserRole::Customer {
                    session_token = Some(self.auth_service.issue_session(&customer)?);
                }
                customer.id
            }
        };

        let booking = Booking::new(NewBookingParams {
            tour_id: tour.id.clone(),
            user_id,
            travel_date,
            start_time: normalize_optional(input.start_time),
            pax_adults,
            pax_children,
            total_amount,
            source: input.source,
            customer_name,
            customer_email: customer_email.clone(),
            customer_phone: normalize_optional(input.customer_phone),
            hotel: normalize_optional(input.hotel),
            pickup_notes: normalize_optional(input.pickup_notes),
        });

        let created = self.booking_repo.create(&booking).await?;
        info!("Booking created: {} for tour {}", created.id, tour.id);

        self.fanout.notify_creation(&created, &tour).await;

        let summary = booking_summary(
            &tour.title,
            created.travel_date,
            created.pax_total(),
            created.start_time.as_deref(),
        );

        // Payment failure is fatal to the call but the PAYMENT_PENDING row
        // stays behind for manual follow-up.
        let session = self
            .payment
            .create_checkout_session(&CheckoutSessionRequest {
                amount: total_amount,
                currency: self.currency.clone(),
                description: summary,
                customer_email,
                booking_id: created.id.clone(),
                tour_id: tour.id.clone(),
                success_url: format!("{}/booking/confirmed?bookingId={}", self.public_base_url, created.id),
                cancel_url: format!("{}/booking/cancelled?bookingId={}", self.public_base_url, created.id),
            })
            .await?;

        self.booking_repo
            .update_payment(
                &created.id,
                &session.session_id,
                session.payment_intent_id.as_deref(),
                session.payment_status.as_deref(),
                &session.redirect_url,
            )
            .await?;

        info!("Checkout session {} attached to booking {}", session.session_id, created.id);

        Ok(CreatedBooking {
            booking_id: created.id,
            redirect_url: session.redirect_url,
            session_token,
        })
    }
}

fn validate_travel_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, AppError> {
    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Past or invalid travel date".into()))?;
    if date < today {
        return Err(AppError::Validation("Past or invalid travel date".into()));
    }
    Ok(date)
}

/// Pax values arrive from form input as either a number or a string; coerce
/// with a fallback instead of rejecting, mirroring how the storefront always
/// sent something for these fields.
fn parse_pax(value: Option<&Value>, fallback: i64) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(fallback),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return fallback;
            }
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().map(|f| f.trunc() as i64))
                .unwrap_or(fallback)
        }
        _ => fallback,
    }
}

fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.contains(' ') {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn random_password_hash() -> Result<String, AppError> {
    let password: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect();
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|_| AppError::Internal)
}
