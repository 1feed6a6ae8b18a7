use crate::domain::models::tour::Tour;
use crate::domain::ports::TourRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteTourRepo {
    pool: SqlitePool,
}

impl SqliteTourRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TourRepository for SqliteTourRepo {
    async fn create(&self, tour: &Tour) -> Result<Tour, AppError> {
        sqlx::query_as::<_, Tour>(
            "INSERT INTO tours (id, slug, title, price, supplier_user_id, created_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&tour.id).bind(&tour.slug).bind(&tour.title)
            .bind(tour.price).bind(&tour.supplier_user_id).bind(tour.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Tour>, AppError> {
        sqlx::query_as::<_, Tour>("SELECT * FROM tours WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tour>, AppError> {
        sqlx::query_as::<_, Tour>("SELECT * FROM tours WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
}
