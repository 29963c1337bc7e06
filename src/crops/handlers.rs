use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{CreateCropRequest, CropAdvisory},
    repo_types::CropRecord,
    services::{create_crop, crops_with_weather},
};
use crate::{
    auth::extractors::AuthUser, error::ApiError, state::AppState, weather::dto::CityQuery,
};

pub fn crop_routes() -> Router<AppState> {
    Router::new()
        .route("/crops", get(list_crops).post(create))
        .route("/crops/with-weather", get(list_with_weather))
}

#[instrument(skip(state))]
pub async fn list_crops(State(state): State<AppState>) -> Result<Json<Vec<CropRecord>>, ApiError> {
    Ok(Json(state.crops.list_all().await?))
}

/// POST /crops, bearer token required; the record is attributed to the caller.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<CreateCropRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CropRecord>), ApiError> {
    let Json(payload) = payload?;
    let crop = create_crop(state.crops.as_ref(), Some(user.id), payload).await?;
    Ok((StatusCode::CREATED, Json(crop)))
}

/// GET /crops/with-weather?city=CityName
#[instrument(skip(state))]
pub async fn list_with_weather(
    State(state): State<AppState>,
    Query(q): Query<CityQuery>,
) -> Result<Json<Vec<CropAdvisory>>, ApiError> {
    let out = crops_with_weather(state.crops.as_ref(), state.weather.as_ref(), q.city()).await?;
    Ok(Json(out))
}
