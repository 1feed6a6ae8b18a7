use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub tour_id: String,
    pub travel_date: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    // The storefront sends these as either strings or numbers.
    pub pax_adults: Option<Value>,
    pub pax_children: Option<Value>,
    pub hotel: Option<String>,
    pub pickup_notes: Option<String>,
    pub start_time: Option<String>,
}

#[derive(Deserialize)]
pub struct CancelBookingRequest {
    pub reason: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: String,
}

#[derive(Deserialize)]
pub struct ConfirmPaymentRequest {
    pub booking_id: String,
    pub payment_status: String,
}
