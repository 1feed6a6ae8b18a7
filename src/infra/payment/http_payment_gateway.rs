use crate::domain::ports::{CheckoutSession, CheckoutSessionRequest, PaymentGateway};
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::error;

/// Hosted-checkout client for the payment service. One POST per booking;
/// the service answers with a session id and the customer-facing redirect.
pub struct HttpPaymentGateway {
    client: Client,
    api_url: String,
    api_key: String,
}

impl HttpPaymentGateway {
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_key,
        }
    }
}

#[derive(Serialize)]
struct SessionMetadata<'a> {
    booking_id: &'a str,
    tour_id: &'a str,
}

#[derive(Serialize)]
struct SessionPayload<'a> {
    // Smallest currency unit, like every card processor wants it.
    amount: i64,
    currency: &'a str,
    description: &'a str,
    customer_email: &'a str,
    success_url: &'a str,
    cancel_url: &'a str,
    metadata: SessionMetadata<'a>,
}

#[derive(Deserialize)]
struct SessionResponse {
    session_id: String,
    payment_intent_id: Option<String>,
    redirect_url: Option<String>,
    payment_status: Option<String>,
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn create_checkout_session(&self, request: &CheckoutSessionRequest) -> Result<CheckoutSession, AppError> {
        let payload = SessionPayload {
            amount: (request.amount * 100.0).round() as i64,
            currency: &request.currency,
            description: &request.description,
            customer_email: &request.customer_email,
            success_url: &request.success_url,
            cancel_url: &request.cancel_url,
            metadata: SessionMetadata {
                booking_id: &request.booking_id,
                tour_id: &request.tour_id,
            },
        };

        let res = self.client.post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Payment service connection error: {}", e);
                error!("{}", msg);
                AppError::PaymentInitiation(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let msg = format!("Payment service failed. Status: {}, Body: {}", status, text);
            error!("{}", msg);
            return Err(AppError::PaymentInitiation(msg));
        }

        let body: SessionResponse = res.json().await.map_err(|e| {
            AppError::PaymentInitiation(format!("Malformed payment service response: {}", e))
        })?;

        let redirect_url = body.redirect_url.ok_or_else(|| {
            AppError::PaymentInitiation("Payment service returned no redirect URL".into())
        })?;

        Ok(CheckoutSession {
            session_id: body.session_id,
            payment_intent_id: body.payment_intent_id,
            redirect_url,
            payment_status: body.payment_status,
        })
    }
}
