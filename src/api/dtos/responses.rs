use serde::Serialize;

#[derive(Serialize)]
pub struct BookingCreatedResponse {
    pub booking_id: String,
    pub redirect_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
}
