use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tracing::instrument;

use crate::{auth::extractors::AdminUser, error::ApiError, state::AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_users: i64,
    pub total_crops: i64,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/admin/stats", get(stats))
}

#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn stats(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> Result<Json<Stats>, ApiError> {
    let total_users = state.users.count().await?;
    let total_crops = state.crops.count().await?;
    Ok(Json(Stats {
        total_users,
        total_crops,
    }))
}
