use tours_backend::{
    api::router::create_router,
    config::Config,
    domain::models::tour::Tour,
    domain::models::user::{User, UserRole},
    domain::ports::{CheckoutSession, CheckoutSessionRequest, PaymentGateway},
    error::AppError,
    infra::factory::assemble_state,
    state::AppState,
};

use argon2::{password_hash::SaltString, Argon2, PasswordHasher};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use rand::rngs::OsRng;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use uuid::Uuid;

#[allow(dead_code)]
pub struct RecordedCheckout {
    pub booking_id: String,
    pub amount: f64,
    pub customer_email: String,
}

/// In-memory stand-in for the payment service. Records every checkout
/// attempt and can be armed to fail the next one.
#[derive(Default)]
pub struct MockPaymentGateway {
    pub calls: Mutex<Vec<RecordedCheckout>>,
    fail_next: AtomicBool,
}

#[allow(dead_code)]
impl MockPaymentGateway {
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession, AppError> {
        self.calls.lock().unwrap().push(RecordedCheckout {
            booking_id: request.booking_id.clone(),
            amount: request.amount,
            customer_email: request.customer_email.clone(),
        });

        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(AppError::PaymentInitiation(
                "Payment service unavailable".to_string(),
            ));
        }

        let session_id = format!("sess_{}", Uuid::new_v4());
        Ok(CheckoutSession {
            session_id: session_id.clone(),
            payment_intent_id: Some(format!("pi_{}", Uuid::new_v4())),
            redirect_url: format!("https://pay.example.test/checkout/{}", session_id),
            payment_status: Some("unpaid".to_string()),
        })
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub payment: Arc<MockPaymentGateway>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            public_base_url: "http://localhost:3000".to_string(),
            payment_service_url: "http://localhost:8000/api/v1/checkout-sessions".to_string(),
            payment_service_token: "payment-test-token".to_string(),
            currency: "usd".to_string(),
            jwt_secret: "test-secret".to_string(),
            auth_issuer: "test-issuer".to_string(),
            cancellation_approval_window_hours: 48,
        };

        let payment = Arc::new(MockPaymentGateway::default());
        let state = Arc::new(assemble_state(config, pool.clone(), payment.clone()));
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            payment,
        }
    }

    pub async fn seed_user(&self, email: &str, name: &str, password: &str, role: UserRole) -> User {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .expect("Failed to hash test password")
            .to_string();
        let user = User::new(email.to_string(), name.to_string(), hash, role);
        self.state
            .user_repo
            .create(&user)
            .await
            .expect("Failed to seed user")
    }

    pub async fn seed_tour(
        &self,
        slug: &str,
        title: &str,
        price: f64,
        supplier_user_id: Option<String>,
    ) -> Tour {
        let tour = Tour::new(slug.to_string(), title.to_string(), price, supplier_user_id);
        self.state
            .tour_repo
            .create(&tour)
            .await
            .expect("Failed to seed tour")
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let payload = serde_json::json!({ "email": email, "password": password });

        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        if !response.status().is_success() {
            panic!("Login failed in test helper: status {}", response.status());
        }

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        body["token"]
            .as_str()
            .expect("No token in login response")
            .to_string()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}
