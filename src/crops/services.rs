use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use super::{
    dto::{CreateCropRequest, CropAdvisory},
    repo::CropStore,
    repo_types::{CropRecord, NewCrop},
};
use crate::{
    error::{required, ApiError},
    weather::{client::WeatherProvider, dto::WeatherSnapshot},
};

const HOT_ABOVE_C: f64 = 35.0;
const COLD_BELOW_C: f64 = 15.0;

/// Care advice derived from the current temperature only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Advice {
    #[serde(rename = "Increase irrigation")]
    IncreaseIrrigation,
    #[serde(rename = "Protect crops from cold")]
    ProtectFromCold,
    #[serde(rename = "Normal care")]
    NormalCare,
}

impl Advice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Advice::IncreaseIrrigation => "Increase irrigation",
            Advice::ProtectFromCold => "Protect crops from cold",
            Advice::NormalCare => "Normal care",
        }
    }
}

/// Strict bands: exactly 35 and exactly 15 are normal.
pub fn advise(weather: Option<&WeatherSnapshot>) -> Advice {
    match weather {
        Some(w) if w.temperature > HOT_ABOVE_C => Advice::IncreaseIrrigation,
        Some(w) if w.temperature < COLD_BELOW_C => Advice::ProtectFromCold,
        _ => Advice::NormalCare,
    }
}

/// Every stored crop with one weather lookup (when a city is given) and
/// the advice that lookup implies. Any failure fails the whole request.
pub async fn crops_with_weather(
    crops: &dyn CropStore,
    weather: &dyn WeatherProvider,
    city: Option<&str>,
) -> Result<Vec<CropAdvisory>, ApiError> {
    let failed = || ApiError::Upstream {
        message: "Error fetching crops with weather".into(),
        detail: None,
    };

    let records = crops.list_all().await.map_err(|e| {
        error!(error = %e, "list crops failed");
        failed()
    })?;

    let snapshot = match city {
        Some(city) => Some(weather.current(city).await.map_err(|e| {
            error!(error = %e, %city, "weather lookup failed");
            failed()
        })?),
        None => None,
    };

    let advice = advise(snapshot.as_ref());
    info!(crops = records.len(), advice = advice.as_str(), "crop advisories built");
    Ok(records
        .into_iter()
        .map(|crop| CropAdvisory {
            crop,
            weather: snapshot.clone(),
            advice,
        })
        .collect())
}

pub async fn create_crop(
    crops: &dyn CropStore,
    owner: Option<Uuid>,
    req: CreateCropRequest,
) -> Result<CropRecord, ApiError> {
    let new_crop = NewCrop {
        user_id: owner,
        soil_type: required(req.soil_type, "soilType is required")?,
        season: required(req.season, "season is required")?,
        location: required(req.location, "location is required")?,
    };
    let crop = crops.create(new_crop).await?;
    info!(crop_id = %crop.id, user_id = ?crop.user_id, "crop created");
    Ok(crop)
}
