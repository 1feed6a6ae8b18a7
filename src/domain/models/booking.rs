use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    PaymentPending,
    Confirmed,
    CancellationRequested,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::PaymentPending => "PAYMENT_PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::CancellationRequested => "CANCELLATION_REQUESTED",
            BookingStatus::Cancelled => "CANCELLED",
            BookingStatus::Completed => "COMPLETED",
        }
    }

    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value {
            "PAYMENT_PENDING" => Ok(BookingStatus::PaymentPending),
            "CONFIRMED" => Ok(BookingStatus::Confirmed),
            "CANCELLATION_REQUESTED" => Ok(BookingStatus::CancellationRequested),
            "CANCELLED" => Ok(BookingStatus::Cancelled),
            "COMPLETED" => Ok(BookingStatus::Completed),
            other => Err(AppError::Validation(format!("Unknown booking status: {}", other))),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingSource {
    Web,
    Agency,
}

#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CancellationRole {
    Admin,
    Supplier,
    Agency,
}

impl CancellationRole {
    pub fn label(&self) -> &'static str {
        match self {
            CancellationRole::Admin => "admin",
            CancellationRole::Supplier => "supplier",
            CancellationRole::Agency => "agency",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub tour_id: String,
    pub user_id: String,
    pub travel_date: NaiveDate,
    pub start_time: Option<String>,
    pub pax_adults: i64,
    pub pax_children: i64,
    pub total_amount: f64,
    pub source: BookingSource,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub hotel: Option<String>,
    pub pickup_notes: Option<String>,
    pub payment_session_id: Option<String>,
    pub payment_intent_id: Option<String>,
    pub payment_status: Option<String>,
    pub checkout_url: Option<String>,
    pub status: BookingStatus,
    pub cancellation_by_role: Option<CancellationRole>,
    pub cancellation_reason: Option<String>,
    pub cancellation_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub tour_id: String,
    pub user_id: String,
    pub travel_date: NaiveDate,
    pub start_time: Option<String>,
    pub pax_adults: i64,
    pub pax_children: i64,
    pub total_amount: f64,
    pub source: BookingSource,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub hotel: Option<String>,
    pub pickup_notes: Option<String>,
}

impl Booking {
    pub fn new(params: NewBookingParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tour_id: params.tour_id,
            user_id: params.user_id,
            travel_date: params.travel_date,
            start_time: params.start_time,
            pax_adults: params.pax_adults,
            pax_children: params.pax_children,
            total_amount: params.total_amount,
            source: params.source,
            customer_name: params.customer_name,
            customer_email: params.customer_email,
            customer_phone: params.customer_phone,
            hotel: params.hotel,
            pickup_notes: params.pickup_notes,
            payment_session_id: None,
            payment_intent_id: None,
            payment_status: None,
            checkout_url: None,
            status: BookingStatus::PaymentPending,
            cancellation_by_role: None,
            cancellation_reason: None,
            cancellation_at: None,
            created_at: Utc::now(),
        }
    }

    pub fn pax_total(&self) -> i64 {
        self.pax_adults + self.pax_children
    }
}
