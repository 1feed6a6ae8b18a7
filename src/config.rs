use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub public_base_url: String,
    pub payment_service_url: String,
    pub payment_service_token: String,
    pub currency: String,
    pub jwt_secret: String,
    pub auth_issuer: String,
    /// Hours before travel inside which a supplier/agency cancellation
    /// needs admin approval instead of taking effect directly.
    pub cancellation_approval_window_hours: i64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            public_base_url: env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string()),
            payment_service_url: env::var("PAYMENT_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8000/api/v1/checkout-sessions".to_string()),
            payment_service_token: env::var("PAYMENT_SERVICE_TOKEN").unwrap_or_else(|_| "test-token-1".to_string()),
            currency: env::var("CURRENCY").unwrap_or_else(|_| "usd".to_string()),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            auth_issuer: env::var("AUTH_ISSUER").unwrap_or_else(|_| "https://api.tours-marketplace.local".to_string()),
            cancellation_approval_window_hours: env::var("CANCELLATION_APPROVAL_WINDOW_HOURS")
                .unwrap_or_else(|_| "48".to_string())
                .parse()
                .expect("CANCELLATION_APPROVAL_WINDOW_HOURS must be a number"),
        }
    }
}
