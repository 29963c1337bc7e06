use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// A farming profile submission.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CropRecord {
    pub id: Uuid,
    #[serde(rename = "user")]
    pub user_id: Option<Uuid>,
    pub soil_type: String,
    pub season: String,
    pub location: String,
    pub recommended_crops: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewCrop {
    pub user_id: Option<Uuid>,
    pub soil_type: String,
    pub season: String,
    pub location: String,
}
