use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::{error, instrument};

use super::dto::{CityQuery, WeatherSnapshot};
use crate::{error::ApiError, state::AppState};

pub fn weather_routes() -> Router<AppState> {
    Router::new().route("/weather", get(get_weather))
}

/// GET /weather?city=Nagpur
#[instrument(skip(state))]
pub async fn get_weather(
    State(state): State<AppState>,
    Query(q): Query<CityQuery>,
) -> Result<Json<WeatherSnapshot>, ApiError> {
    let city = q
        .city()
        .ok_or_else(|| ApiError::validation("City is required"))?;

    let snapshot = state.weather.current(city).await.map_err(|e| {
        error!(error = %e, %city, "weather lookup failed");
        ApiError::Upstream {
            message: "Weather data not found".into(),
            detail: Some(e.detail()),
        }
    })?;
    Ok(Json(snapshot))
}
