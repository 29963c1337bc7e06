use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::crops::repo_types::{CropRecord, NewCrop};
use crate::error::StoreError;

#[async_trait]
pub trait CropStore: Send + Sync {
    /// Every record, in insertion order. Not scoped to any user.
    async fn list_all(&self) -> Result<Vec<CropRecord>, StoreError>;
    /// Inserts with an empty `recommended_crops`.
    async fn create(&self, new_crop: NewCrop) -> Result<CropRecord, StoreError>;
    async fn count(&self) -> Result<i64, StoreError>;
}

#[derive(Clone)]
pub struct PgCropStore {
    db: PgPool,
}

impl PgCropStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CropStore for PgCropStore {
    async fn list_all(&self) -> Result<Vec<CropRecord>, StoreError> {
        let rows = sqlx::query_as::<_, CropRecord>(
            r#"
            SELECT id, user_id, soil_type, season, location, recommended_crops,
                   created_at, updated_at
              FROM crops
             ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn create(&self, new_crop: NewCrop) -> Result<CropRecord, StoreError> {
        let row = sqlx::query_as::<_, CropRecord>(
            r#"
            INSERT INTO crops (id, user_id, soil_type, season, location)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, soil_type, season, location, recommended_crops,
                      created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new_crop.user_id) // Option<Uuid> → NULL allowed
        .bind(&new_crop.soil_type)
        .bind(&new_crop.season)
        .bind(&new_crop.location)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM crops")
            .fetch_one(&self.db)
            .await?;
        Ok(n)
    }
}
