use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A bookable product. The marketplace also sells transfers through the same
/// table; at this layer they behave identically.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Tour {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub price: f64,
    pub supplier_user_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Tour {
    pub fn new(slug: String, title: String, price: f64, supplier_user_id: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            slug,
            title,
            price,
            supplier_user_id,
            created_at: Utc::now(),
        }
    }
}
